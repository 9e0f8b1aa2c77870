//! Route issue models.

use serde::Serialize;
use utoipa::ToSchema;

/// One row of the `route_issues` table.
///
/// `id` is client-assigned and doubles as the upsert key. `street_id` points
/// at a street but is not enforced as a foreign key. Geometry is read back as
/// well-known text.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RouteIssue {
    pub id: i32,
    pub street_id: Option<i32>,

    /// Whether the street is blocked at this point.
    pub blocked: Option<bool>,

    pub notes: Option<String>,

    /// Point geometry as well-known text.
    pub geom: Option<String>,
}
