//! HTTP handlers, one per endpoint.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::errors::{AppError, AppResult};
use common::models::{CreateTodoRequest, RouteIssue, Street, StreetPage, TodoItem, UpdateTodoRequest};

use crate::service::{self, RouteIssueService, StreetService, TodoService};
use crate::state::AppState;

/// Redirects the API root to the generated documentation.
pub async fn api_root() -> Redirect {
    Redirect::to("/api-docs/openapi.json")
}

/// Get all streets with geometry as stored
#[utoipa::path(
    get,
    path = "/api/getstreets",
    tag = "streets",
    responses(
        (status = 200, description = "All street rows, geometry untransformed", body = Vec<Street>),
        (status = 500, description = "Store error")
    )
)]
pub async fn get_streets(State(state): State<AppState>) -> AppResult<Json<Vec<Street>>> {
    let streets = StreetService::new(state.pool.clone()).list_all().await?;
    Ok(Json(streets))
}

/// Get all LineString streets, polyline-encoded
#[utoipa::path(
    get,
    path = "/api/allstreet",
    tag = "streets",
    responses(
        (status = 200, description = "LineString streets with encoded geometry; Point rows excluded", body = Vec<Street>),
        (status = 500, description = "Store error")
    )
)]
pub async fn all_streets(State(state): State<AppState>) -> AppResult<Json<Vec<Street>>> {
    let streets = StreetService::new(state.pool.clone()).list_encoded().await?;
    Ok(Json(streets))
}

/// Get all streets with geometry as well-known text
#[utoipa::path(
    get,
    path = "/api/loadstreets",
    tag = "streets",
    responses(
        (status = 200, description = "All street rows, geometry as WKT", body = Vec<Street>),
        (status = 500, description = "Store error")
    )
)]
pub async fn load_streets(State(state): State<AppState>) -> AppResult<Json<Vec<Street>>> {
    let streets = StreetService::new(state.pool.clone()).list_wkt().await?;
    Ok(Json(streets))
}

/// Query parameters of the paginated street listing. Kept as raw strings so
/// non-numeric input falls back to the defaults instead of a rejection.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StreetPageParams {
    /// Page size (default 50).
    pub limit: Option<String>,
    /// 1-based page number (default 1).
    pub page: Option<String>,
}

/// Get one page of GeoJSON streets
#[utoipa::path(
    get,
    path = "/api/street",
    tag = "streets",
    params(StreetPageParams),
    responses(
        (status = 200, description = "One page of LineString streets as GeoJSON; Point rows excluded", body = StreetPage),
        (status = 500, description = "Store error")
    )
)]
pub async fn street_page(
    State(state): State<AppState>,
    Query(params): Query<StreetPageParams>,
) -> AppResult<Json<StreetPage>> {
    let limit = service::sanitize_page_param(params.limit.as_deref(), service::DEFAULT_LIMIT);
    let page = service::sanitize_page_param(params.page.as_deref(), service::DEFAULT_PAGE);
    let result = StreetService::new(state.pool.clone()).list_page(limit, page).await?;
    Ok(Json(result))
}

/// Batch-update streets by id
#[utoipa::path(
    put,
    path = "/api/bulk-update",
    tag = "streets",
    request_body = Vec<Object>,
    responses(
        (status = 200, description = "All rows updated, transaction committed", body = String),
        (status = 400, description = "Body is not an array or an element is missing its id"),
        (status = 500, description = "Store error, transaction rolled back")
    )
)]
pub async fn bulk_update(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<&'static str> {
    StreetService::new(state.pool.clone()).bulk_update(&body).await?;
    Ok("OK")
}

/// Get all route issues
#[utoipa::path(
    get,
    path = "/api/load-route-issues",
    tag = "route-issues",
    responses(
        (status = 200, description = "All route issues, geometry as WKT", body = Vec<RouteIssue>),
        (status = 500, description = "Store error")
    )
)]
pub async fn load_route_issues(State(state): State<AppState>) -> AppResult<Json<Vec<RouteIssue>>> {
    let issues = RouteIssueService::new(state.pool.clone()).list().await?;
    Ok(Json(issues))
}

/// Delete one route issue by id
#[utoipa::path(
    delete,
    path = "/api/delete-route-issues/{id}",
    tag = "route-issues",
    params(("id" = i32, Path, description = "Route issue id")),
    responses(
        (status = 200, description = "Deleted (also when no such row existed)", body = String),
        (status = 500, description = "Store error")
    )
)]
pub async fn delete_route_issue(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<&'static str> {
    RouteIssueService::new(state.pool.clone()).delete(id).await?;
    Ok("OK")
}

/// Batch-upsert route issues by id
#[utoipa::path(
    post,
    path = "/api/add-route-issue",
    tag = "route-issues",
    request_body = Vec<Object>,
    responses(
        (status = 200, description = "All rows upserted, transaction committed", body = String),
        (status = 400, description = "Body is not an array or an element is missing its id"),
        (status = 500, description = "Store error, transaction rolled back")
    )
)]
pub async fn add_route_issues(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<&'static str> {
    RouteIssueService::new(state.pool.clone()).upsert(&body).await?;
    Ok("OK")
}

/// List all to-do items
#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "todos",
    responses(
        (status = 200, description = "All to-do items", body = Vec<TodoItem>),
        (status = 500, description = "Store error")
    )
)]
pub async fn list_todos(State(state): State<AppState>) -> AppResult<Json<Vec<TodoItem>>> {
    let todos = TodoService::new(state.pool.clone()).list().await?;
    Ok(Json(todos))
}

/// Create a to-do item
#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Created item with its generated id", body = TodoItem),
        (status = 400, description = "Missing or empty title"),
        (status = 500, description = "Store error")
    )
)]
pub async fn create_todo(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<TodoItem>)> {
    let req: CreateTodoRequest = serde_json::from_value(body)
        .map_err(|_| AppError::Validation("title is required".into()))?;
    req.validate()
        .map_err(|_| AppError::Validation("title is required".into()))?;

    let todo = TodoService::new(state.pool.clone())
        .create(&req.title, req.completed)
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Delete a to-do item by id
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = i32, Path, description = "To-do item id")),
    responses(
        (status = 200, description = "Deleted (also when no such row existed)", body = String),
        (status = 500, description = "Store error")
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<&'static str> {
    TodoService::new(state.pool.clone()).delete(id).await?;
    Ok("OK")
}

/// Update a to-do item's title
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = i32, Path, description = "To-do item id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Updated", body = String),
        (status = 400, description = "Missing or empty title"),
        (status = 500, description = "Store error")
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<&'static str> {
    let req: UpdateTodoRequest = serde_json::from_value(body)
        .map_err(|_| AppError::Validation("title is required".into()))?;
    req.validate()
        .map_err(|_| AppError::Validation("title is required".into()))?;

    TodoService::new(state.pool.clone())
        .update_title(id, &req.title)
        .await?;
    Ok("OK")
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}
