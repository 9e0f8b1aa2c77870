//! Street models.
//!
//! Field names mirror the production `street` table exactly (`nama`, `truk`,
//! `roda3`), so rows serialize to the same JSON the table would.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::geometry::GeometryRepr;

/// One row of the `street` table.
///
/// Every column except `id` is nullable; nulls pass through to JSON. The
/// `geom` representation depends on the endpoint that produced the row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Street {
    pub id: i32,

    /// Identifier in the external source (OpenStreetMap).
    pub osm_id: Option<String>,

    /// Street name.
    pub nama: Option<String>,

    /// Truck suitability flag.
    pub truk: Option<i32>,

    /// Pickup suitability flag.
    pub pickup: Option<i32>,

    /// Three-wheeler suitability flag.
    pub roda3: Option<i32>,

    pub last_modified_time: Option<DateTime<Utc>>,

    /// Free-text metadata.
    pub meta: Option<String>,

    pub geom: Option<GeometryRepr>,
}

/// Response body of the paginated street listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct StreetPage {
    /// Total number of pages, from the unfiltered row count.
    pub pages: i64,

    #[serde(rename = "currentPage")]
    pub current_page: i64,

    pub data: Vec<Street>,
}
