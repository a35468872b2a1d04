//! `SqliteSnapshotStorage` keeps checkout snapshots in a single SQLite table.
use std::{fmt::Debug, str::FromStr};

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    FromRow,
    SqlitePool,
};

use crate::traits::{SnapshotError, SnapshotStorage, StoredSnapshot};

#[derive(Debug, FromRow)]
struct SnapshotRow {
    key: String,
    value: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<SnapshotRow> for StoredSnapshot {
    fn from(row: SnapshotRow) -> Self {
        Self { key: row.key, value: row.value, created_at: row.created_at, expires_at: row.expires_at }
    }
}

#[derive(Clone)]
pub struct SqliteSnapshotStorage {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteSnapshotStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteSnapshotStorage ({})", self.url)
    }
}

impl SqliteSnapshotStorage {
    /// Opens (creating it if necessary) the database at `url` and brings its schema up to date.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SnapshotError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
        sqlx::migrate!("./src/snapshot/migrations").run(&pool).await?;
        debug!("🗃️ Snapshot database ready at {url}");
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), SnapshotError> {
        self.pool.close().await;
        Ok(())
    }
}

impl SnapshotStorage for SqliteSnapshotStorage {
    async fn write(&self, key: &str, value: &str, expires_at: DateTime<Utc>) -> Result<(), SnapshotError> {
        sqlx::query(
            r#"
            INSERT INTO checkout_snapshots (key, value, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                created_at = excluded.created_at,
                expires_at = excluded.expires_at;
        "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        trace!("🗃️ Snapshot '{key}' saved, expires at {expires_at}");
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<StoredSnapshot>, SnapshotError> {
        let row = sqlx::query_as::<_, SnapshotRow>(
            "SELECT key, value, created_at, expires_at FROM checkout_snapshots WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(StoredSnapshot::from))
    }

    async fn delete(&self, key: &str) -> Result<bool, SnapshotError> {
        let result = sqlx::query("DELETE FROM checkout_snapshots WHERE key = $1").bind(key).execute(&self.pool).await?;
        trace!("🗃️ Snapshot '{key}' deleted ({} rows)", result.rows_affected());
        Ok(result.rows_affected() > 0)
    }
}
