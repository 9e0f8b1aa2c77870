//! Pool construction and schema bootstrap.

use std::time::Duration;

use common::config::DatabaseConfig;
use common::errors::{AppError, AppResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Creates a connection pool and verifies connectivity.
pub async fn create_pool(config: &DatabaseConfig) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url())
        .await
        .map_err(|e| AppError::DatabaseConnection(e.to_string()))
}

/// Creates a pool without connecting. Used by tests that must exercise the
/// request path up to (but not including) the first database round-trip.
pub fn create_lazy_pool(config: &DatabaseConfig) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_lazy(&config.url())
        .map_err(|e| AppError::DatabaseConnection(e.to_string()))
}

/// Ensures the PostGIS extension and all tables exist.
pub async fn ensure_schema(pool: &PgPool) -> AppResult<()> {
    let statements = [
        "CREATE EXTENSION IF NOT EXISTS postgis",
        "CREATE TABLE IF NOT EXISTS street (
            id                 SERIAL PRIMARY KEY,
            osm_id             TEXT,
            nama               TEXT,
            truk               INTEGER,
            pickup             INTEGER,
            roda3              INTEGER,
            last_modified_time TIMESTAMPTZ DEFAULT NOW(),
            meta               TEXT,
            geom               geometry(Geometry, 4326)
        )",
        "CREATE TABLE IF NOT EXISTS route_issues (
            id        INTEGER PRIMARY KEY,
            street_id INTEGER,
            blocked   BOOLEAN,
            notes     TEXT,
            geom      geometry(Point, 4326)
        )",
        "CREATE TABLE IF NOT EXISTS todo (
            id        SERIAL PRIMARY KEY,
            title     TEXT,
            completed BOOLEAN DEFAULT FALSE
        )",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| AppError::DatabaseQuery(format!("schema bootstrap failed: {}", e)))?;
    }

    tracing::info!("schema ensured");
    Ok(())
}
