//! Route table.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/", get(handlers::api_root))
        .route("/api/getstreets", get(handlers::get_streets))
        .route("/api/allstreet", get(handlers::all_streets))
        .route("/api/loadstreets", get(handlers::load_streets))
        .route("/api/street", get(handlers::street_page))
        .route("/api/bulk-update", put(handlers::bulk_update))
        .route("/api/load-route-issues", get(handlers::load_route_issues))
        .route("/api/delete-route-issues/{id}", delete(handlers::delete_route_issue))
        .route("/api/add-route-issue", post(handlers::add_route_issues))
        .route("/api/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route("/api/todos/{id}", delete(handlers::delete_todo).put(handlers::update_todo))
        .route("/api/health", get(handlers::health_check))
}
