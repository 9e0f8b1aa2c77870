//! Data access services.
//!
//! One service struct per table, each owning a handle to the shared pool.
//! Row structs mirror what the SQL projects; they are converted into the
//! wire models in `common::models` before leaving this module.

use chrono::{DateTime, Utc};
use common::errors::{AppError, AppResult};
use common::models::{GeometryRepr, RouteIssue, Street, StreetPage, TodoItem};
use common::utils::polyline;
use serde_json::Value;
use sqlx::PgPool;

const STREET_COLUMNS: &str = "id, osm_id, nama, truk, pickup, roda3, last_modified_time, meta";

/// Default page size for the paginated street listing.
pub const DEFAULT_LIMIT: i64 = 50;
/// Default page number for the paginated street listing.
pub const DEFAULT_PAGE: i64 = 1;

fn query_err(e: sqlx::Error) -> AppError {
    AppError::DatabaseQuery(e.to_string())
}

/// Street row with geometry projected to text (raw cast or WKT).
#[derive(sqlx::FromRow)]
struct StreetTextRow {
    id: i32,
    osm_id: Option<String>,
    nama: Option<String>,
    truk: Option<i32>,
    pickup: Option<i32>,
    roda3: Option<i32>,
    last_modified_time: Option<DateTime<Utc>>,
    meta: Option<String>,
    geom: Option<String>,
}

impl StreetTextRow {
    fn into_street(self, repr: fn(String) -> GeometryRepr) -> Street {
        Street {
            id: self.id,
            osm_id: self.osm_id,
            nama: self.nama,
            truk: self.truk,
            pickup: self.pickup,
            roda3: self.roda3,
            last_modified_time: self.last_modified_time,
            meta: self.meta,
            geom: self.geom.map(repr),
        }
    }
}

/// Street row with geometry projected through `ST_AsGeoJSON(...)::json`.
#[derive(sqlx::FromRow)]
struct StreetGeoJsonRow {
    id: i32,
    osm_id: Option<String>,
    nama: Option<String>,
    truk: Option<i32>,
    pickup: Option<i32>,
    roda3: Option<i32>,
    last_modified_time: Option<DateTime<Utc>>,
    meta: Option<String>,
    geom: Option<Value>,
}

impl StreetGeoJsonRow {
    /// Applies the geometry filter/transform; returns None when the row is
    /// dropped (Point, unknown type, missing or unparseable geometry).
    fn into_street_with(self, map_geom: fn(geojson::Geometry) -> Option<GeometryRepr>) -> Option<Street> {
        let geometry: geojson::Geometry = serde_json::from_value(self.geom?).ok()?;
        let geom = map_geom(geometry)?;
        Some(Street {
            id: self.id,
            osm_id: self.osm_id,
            nama: self.nama,
            truk: self.truk,
            pickup: self.pickup,
            roda3: self.roda3,
            last_modified_time: self.last_modified_time,
            meta: self.meta,
            geom: Some(geom),
        })
    }
}

/// LineString geometries become encoded polylines; everything else is dropped.
fn polyline_geom(geometry: geojson::Geometry) -> Option<GeometryRepr> {
    match geometry.value {
        geojson::Value::LineString(positions) => {
            Some(GeometryRepr::Polyline(polyline::encode_lonlat(&positions)))
        }
        _ => None,
    }
}

/// LineString geometries pass through as GeoJSON; everything else is dropped.
fn geojson_geom(geometry: geojson::Geometry) -> Option<GeometryRepr> {
    match geometry.value {
        geojson::Value::LineString(_) => Some(GeometryRepr::GeoJson(geometry)),
        _ => None,
    }
}

/// Sanitizes a limit/page query parameter: absent, non-numeric or non-positive
/// input falls back to the default.
pub fn sanitize_page_param(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

/// OFFSET for a 1-based page. Saturates instead of overflowing for extreme
/// (still well-formed) limit/page values; a saturated offset is simply past
/// the end of the table and yields an empty page.
fn page_offset(page: i64, limit: i64) -> i64 {
    (page - 1).saturating_mul(limit)
}

/// Validates a batch payload: must be a JSON array and every element must
/// carry a non-zero `id` representable as i32, the id column's type. Nothing
/// is written when this fails.
fn validate_batch(body: &Value) -> AppResult<&[Value]> {
    let rows = body
        .as_array()
        .ok_or_else(|| AppError::Validation("request body must be a JSON array".into()))?;
    for row in rows {
        if batch_id(row).is_none() {
            return Err(AppError::Validation("every element must carry an id".into()));
        }
    }
    Ok(rows)
}

/// The element's `id` as the store's column type, or None when it is absent,
/// non-numeric, zero or out of range.
fn batch_id(row: &Value) -> Option<i32> {
    row.get("id")
        .and_then(Value::as_i64)
        .and_then(|id| i32::try_from(id).ok())
        .filter(|id| *id != 0)
}

/// Street table access.
pub struct StreetService {
    pool: PgPool,
}

impl StreetService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All rows, geometry as stored (hex EWKB cast to text).
    pub async fn list_all(&self) -> AppResult<Vec<Street>> {
        let sql = format!("SELECT {STREET_COLUMNS}, geom::text AS geom FROM street");
        let rows: Vec<StreetTextRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_street(GeometryRepr::Raw))
            .collect())
    }

    /// All rows with geometry as WKT, unfiltered.
    pub async fn list_wkt(&self) -> AppResult<Vec<Street>> {
        let sql = format!("SELECT {STREET_COLUMNS}, ST_AsText(geom) AS geom FROM street");
        let rows: Vec<StreetTextRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_street(GeometryRepr::Wkt))
            .collect())
    }

    /// All LineString rows with geometry polyline-encoded. Points and any
    /// other geometry type are dropped.
    pub async fn list_encoded(&self) -> AppResult<Vec<Street>> {
        let sql = format!("SELECT {STREET_COLUMNS}, ST_AsGeoJSON(geom)::json AS geom FROM street");
        let rows: Vec<StreetGeoJsonRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_street_with(polyline_geom))
            .collect())
    }

    /// One page of LineString rows with geometry as GeoJSON (not encoded).
    /// The page count comes from the unfiltered table count, so a page can
    /// hold fewer than `limit` rows after Point rows are dropped.
    pub async fn list_page(&self, limit: i64, page: i64) -> AppResult<StreetPage> {
        let offset = page_offset(page, limit);
        let sql = format!(
            "SELECT {STREET_COLUMNS}, ST_AsGeoJSON(geom)::json AS geom FROM street LIMIT $1 OFFSET $2"
        );
        let rows: Vec<StreetGeoJsonRow> = sqlx::query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM street")
            .fetch_one(&self.pool)
            .await
            .map_err(query_err)?;

        Ok(StreetPage {
            pages: total_pages(total, limit),
            current_page: page,
            data: rows
                .into_iter()
                .filter_map(|row| row.into_street_with(geojson_geom))
                .collect(),
        })
    }

    /// Updates all mutable columns of each row by id, one statement per row
    /// inside a single transaction. A row whose id matches nothing affects
    /// zero rows and is not an error; any statement failure rolls back the
    /// whole batch.
    pub async fn bulk_update(&self, body: &Value) -> AppResult<usize> {
        let rows = validate_batch(body)?;

        let mut tx = self.pool.begin().await.map_err(query_err)?;
        for row in rows {
            let result = sqlx::query(
                "UPDATE street SET osm_id = $1, nama = $2, truk = $3, pickup = $4, roda3 = $5, \
                 meta = $6, last_modified_time = NOW(), geom = ST_GeomFromText($7, 4326) \
                 WHERE id = $8",
            )
            .bind(row.get("osm_id").and_then(Value::as_str))
            .bind(row.get("nama").and_then(Value::as_str))
            .bind(row.get("truk").and_then(Value::as_i64).map(|v| v as i32))
            .bind(row.get("pickup").and_then(Value::as_i64).map(|v| v as i32))
            .bind(row.get("roda3").and_then(Value::as_i64).map(|v| v as i32))
            .bind(row.get("meta").and_then(Value::as_str))
            .bind(row.get("geom").and_then(Value::as_str))
            .bind(batch_id(row).unwrap_or(0))
            .execute(&mut *tx)
            .await;

            if let Err(e) = result {
                if let Err(rb) = tx.rollback().await {
                    tracing::error!(error = %rb, "rollback failed");
                }
                return Err(query_err(e));
            }
        }
        tx.commit().await.map_err(query_err)?;

        tracing::info!(count = rows.len(), "streets updated");
        Ok(rows.len())
    }
}

/// Route issue row as read back from the store.
#[derive(sqlx::FromRow)]
struct RouteIssueRow {
    id: i32,
    street_id: Option<i32>,
    blocked: Option<bool>,
    notes: Option<String>,
    geom: Option<String>,
}

/// Route issue table access.
pub struct RouteIssueService {
    pool: PgPool,
}

impl RouteIssueService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All rows, geometry as WKT.
    pub async fn list(&self) -> AppResult<Vec<RouteIssue>> {
        let rows: Vec<RouteIssueRow> = sqlx::query_as(
            "SELECT id, street_id, blocked, notes, ST_AsText(geom) AS geom FROM route_issues",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;
        Ok(rows
            .into_iter()
            .map(|row| RouteIssue {
                id: row.id,
                street_id: row.street_id,
                blocked: row.blocked,
                notes: row.notes,
                geom: row.geom,
            })
            .collect())
    }

    /// Deletes by id. No existence check; deleting a missing id succeeds.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM route_issues WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        tracing::info!(id = %id, "route issue deleted");
        Ok(())
    }

    /// Insert-or-update by id for each element, one statement per row inside
    /// a single transaction. Duplicate ids within one batch resolve to the
    /// last element, since statements run in order.
    pub async fn upsert(&self, body: &Value) -> AppResult<usize> {
        let rows = validate_batch(body)?;

        let mut tx = self.pool.begin().await.map_err(query_err)?;
        for row in rows {
            let result = sqlx::query(
                "INSERT INTO route_issues (id, street_id, blocked, notes, geom) \
                 VALUES ($1, $2, $3, $4, ST_GeomFromText($5, 4326)) \
                 ON CONFLICT (id) DO UPDATE SET street_id = EXCLUDED.street_id, \
                 blocked = EXCLUDED.blocked, notes = EXCLUDED.notes, geom = EXCLUDED.geom",
            )
            .bind(batch_id(row).unwrap_or(0))
            .bind(row.get("street_id").and_then(Value::as_i64).map(|v| v as i32))
            .bind(row.get("blocked").and_then(Value::as_bool))
            .bind(row.get("notes").and_then(Value::as_str))
            .bind(row.get("geom").and_then(Value::as_str))
            .execute(&mut *tx)
            .await;

            if let Err(e) = result {
                if let Err(rb) = tx.rollback().await {
                    tracing::error!(error = %rb, "rollback failed");
                }
                return Err(query_err(e));
            }
        }
        tx.commit().await.map_err(query_err)?;

        tracing::info!(count = rows.len(), "route issues upserted");
        Ok(rows.len())
    }
}

/// To-do table access.
pub struct TodoService {
    pool: PgPool,
}

impl TodoService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<TodoItem>> {
        let rows: Vec<(i32, Option<String>, Option<bool>)> =
            sqlx::query_as("SELECT id, title, completed FROM todo")
                .fetch_all(&self.pool)
                .await
                .map_err(query_err)?;
        Ok(rows
            .into_iter()
            .map(|(id, title, completed)| TodoItem { id, title, completed })
            .collect())
    }

    pub async fn create(&self, title: &str, completed: bool) -> AppResult<TodoItem> {
        let (id, title, completed) = sqlx::query_as(
            "INSERT INTO todo (title, completed) VALUES ($1, $2) RETURNING id, title, completed",
        )
        .bind(title)
        .bind(completed)
        .fetch_one(&self.pool)
        .await
        .map_err(query_err)?;
        Ok(TodoItem { id, title, completed })
    }

    /// Deletes by id. No existence check, mirroring the route issue delete.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM todo WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    pub async fn update_title(&self, id: i32, title: &str) -> AppResult<()> {
        sqlx::query("UPDATE todo SET title = $1 WHERE id = $2")
            .bind(title)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(())
    }
}
