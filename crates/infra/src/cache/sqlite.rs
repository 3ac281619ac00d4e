//! SQLite-backed state cache.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tokio::sync::Mutex;

use super::r#trait::{CacheError, StateCache};

/// SQLite-backed durable cache for store snapshots.
///
/// Cheap to clone; clones share one lazily opened connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStateCache {
    path: PathBuf,
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteStateCache {
    /// Create a cache backed by the database file at `path`.
    ///
    /// The file (and its parent directory) is created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the database and create the table (called lazily on first use).
    async fn get_pool(&self) -> Result<SqlitePool, CacheError> {
        let mut pool_guard = self.pool.lock().await;
        if let Some(pool) = pool_guard.as_ref() {
            return Ok(pool.clone());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                context: format!("failed to create cache directory at {}", parent.display()),
                source,
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(CacheError::db("failed to open SQLite state cache"))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS store_state (
                name      TEXT PRIMARY KEY,
                data      TEXT NOT NULL,
                saved_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(CacheError::db("failed to create store_state table"))?;

        tracing::debug!(path = %self.path.display(), "state cache opened");

        *pool_guard = Some(pool.clone());
        Ok(pool)
    }
}

#[async_trait::async_trait]
impl StateCache for SqliteStateCache {
    async fn load(&self, name: &str) -> Result<Option<JsonValue>, CacheError> {
        let pool = self.get_pool().await?;

        let row = sqlx::query(
            r#"
            SELECT data
            FROM store_state
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&pool)
        .await
        .map_err(CacheError::db("failed to fetch store state"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let data: String = row
            .try_get("data")
            .map_err(CacheError::db("failed to read store state column"))?;
        let value =
            serde_json::from_str(&data).map_err(CacheError::json("failed to decode store state"))?;

        Ok(Some(value))
    }

    async fn save(&self, name: &str, state: &JsonValue) -> Result<(), CacheError> {
        let pool = self.get_pool().await?;

        let payload =
            serde_json::to_string(state).map_err(CacheError::json("failed to encode store state"))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO store_state (name, data, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name)
            DO UPDATE SET
                data = excluded.data,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(name)
        .bind(&payload)
        .bind(&now)
        .execute(&pool)
        .await
        .map_err(CacheError::db("failed to upsert store state"))?;

        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), CacheError> {
        let pool = self.get_pool().await?;

        sqlx::query(
            r#"
            DELETE FROM store_state
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .execute(&pool)
        .await
        .map_err(CacheError::db("failed to delete store state"))?;

        Ok(())
    }
}
