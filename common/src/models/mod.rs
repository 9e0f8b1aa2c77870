//! Shared data models.

pub mod geometry;
pub mod route_issue;
pub mod street;
pub mod todo;

// Re-export commonly used types
pub use geometry::GeometryRepr;
pub use route_issue::RouteIssue;
pub use street::{Street, StreetPage};
pub use todo::{CreateTodoRequest, TodoItem, UpdateTodoRequest};
