//! Per-endpoint geometry representation.
//!
//! There is no single geometry contract for the API: each endpoint documents
//! which representation its `geom` field carries. The variants are untagged on
//! the wire, so clients see either a string or a GeoJSON object, matching the
//! documented contract of the endpoint they called.

use serde::Serialize;
use utoipa::ToSchema;

/// Geometry value as surfaced by a specific endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum GeometryRepr {
    /// The geometry column cast to text: the store's hex-encoded EWKB.
    Raw(String),

    /// `ST_AsGeoJSON(geom)` as a typed GeoJSON geometry object.
    #[schema(value_type = Object)]
    GeoJson(geojson::Geometry),

    /// `ST_AsText(geom)`, e.g. `POINT(140.4 -8.49)`.
    Wkt(String),

    /// Encoded polyline of a LineString coordinate sequence.
    Polyline(String),
}
