//! To-do list models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One row of the `todo` table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TodoItem {
    pub id: i32,
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// Request body for creating a to-do item.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,

    /// Defaults to false when absent.
    #[serde(default)]
    pub completed: bool,
}

/// Request body for updating a to-do item's title.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
}
