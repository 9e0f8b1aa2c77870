//! Application state for the street service.

use common::config::AppConfig;
use common::errors::AppResult;
use sqlx::PgPool;

use crate::db;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pool: PgPool,
}

impl AppState {
    /// Creates application state: connects to PostGIS and bootstraps the schema.
    pub async fn new(config: AppConfig) -> AppResult<Self> {
        let pool = db::create_pool(&config.database).await?;
        db::ensure_schema(&pool).await?;
        Ok(Self { config, pool })
    }

    /// Creates application state around an existing pool. Lets tests inject a
    /// pool of their own (lazy or pre-seeded) without touching the schema.
    pub fn with_pool(config: AppConfig, pool: PgPool) -> Self {
        Self { config, pool }
    }
}
