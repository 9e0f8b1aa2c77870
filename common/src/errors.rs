//! Application error taxonomy.
//!
//! Two classes of failure reach a client: invalid input (400) and anything
//! going wrong at the database (500). Database detail is logged server-side
//! only; the HTTP body carries a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Result alias used throughout the services.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed client input (bad batch payload, missing fields).
    #[error("{0}")]
    Validation(String),

    /// A statement failed against the backing store.
    #[error("database query failed: {0}")]
    DatabaseQuery(String),

    /// The backing store could not be reached.
    #[error("database connection failed: {0}")]
    DatabaseConnection(String),
}

impl AppError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseQuery(_) | AppError::DatabaseConnection(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::DatabaseQuery(detail) | AppError::DatabaseConnection(detail) => {
                tracing::error!(error = %detail, "store error");
                "internal server error".to_string()
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let err = AppError::Validation("request body must be a JSON array".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_errors_map_to_500() {
        assert_eq!(
            AppError::DatabaseQuery("syntax error".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::DatabaseConnection("refused".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_response_body_is_error_object() {
        let response = AppError::Validation("missing id".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "missing id" }));
    }

    #[tokio::test]
    async fn test_store_error_body_is_generic() {
        let response = AppError::DatabaseQuery("relation street does not exist".into())
            .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "internal server error");
    }
}
