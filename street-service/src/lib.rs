//! Street and route-issue API service.
//!
//! Exposes CRUD over two PostGIS tables (`street`, `route_issues`) plus a
//! small to-do list surface, under the `/api` prefix. Every endpoint is a
//! pass-through to parameterized SQL; the store's spatial functions do the
//! geometry work, and the only in-process transforms are pagination glue and
//! polyline encoding of LineString geometries.

pub mod db;
pub mod handlers;
pub mod routes;
pub mod service;
pub mod state;

use axum::{middleware, routing::get, Json, Router};
use common::middleware::request_id::request_id_middleware;
use state::AppState;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub const SERVICE_NAME: &str = "street-service";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Merauke Street API",
        version = "0.1.0",
        description = "Street and route-issue API over a PostGIS store"
    ),
    paths(
        handlers::get_streets,
        handlers::all_streets,
        handlers::load_streets,
        handlers::street_page,
        handlers::bulk_update,
        handlers::load_route_issues,
        handlers::delete_route_issue,
        handlers::add_route_issues,
        handlers::list_todos,
        handlers::create_todo,
        handlers::delete_todo,
        handlers::update_todo,
        handlers::health_check,
    ),
    components(schemas(
        common::models::Street,
        common::models::StreetPage,
        common::models::GeometryRepr,
        common::models::RouteIssue,
        common::models::TodoItem,
        common::models::CreateTodoRequest,
        common::models::UpdateTodoRequest,
        handlers::HealthResponse,
    )),
    tags(
        (name = "streets", description = "Street listing and bulk update endpoints"),
        (name = "route-issues", description = "Route issue management endpoints"),
        (name = "todos", description = "To-do list endpoints"),
        (name = "health", description = "Health check endpoint")
    )
)]
pub struct ApiDoc;

/// Builds the full application router with all middleware layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
