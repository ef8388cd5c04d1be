use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::time::Duration;

use crate::database::DatabaseError;
use crate::error::ServiceError;
use crate::files::CacheStore;

/// [`CacheStore`] backed by the `url_cache` table, shared by every process on the database.
#[derive(Debug, Clone)]
pub struct PgCacheStore {
    pool: PgPool,
}

impl PgCacheStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS url_cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS url_cache_expires_at_idx ON url_cache (expires_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete expired rows; returns how many were removed.
    pub async fn purge_expired(&self) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM url_cache WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn store_error(e: sqlx::Error) -> ServiceError {
    tracing::error!("url_cache store failure: {}", e);
    ServiceError::upstream(format!("cache store: {}", e))
}

#[async_trait]
impl CacheStore for PgCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM url_cache WHERE key = $1 AND expires_at > now()")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ServiceError> {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| ServiceError::validation(format!("cache TTL out of range: {:?}", ttl)))?;

        sqlx::query(
            r#"
            INSERT INTO url_cache (key, value, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ServiceError> {
        sqlx::query("DELETE FROM url_cache WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
