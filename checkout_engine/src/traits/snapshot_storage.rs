use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Snapshot storage error: {0}")]
    Storage(String),
    #[error("The stored snapshot could not be read: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for SnapshotError {
    fn from(e: sqlx::Error) -> Self {
        SnapshotError::Storage(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for SnapshotError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        SnapshotError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Serialization(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSnapshot {
    pub key: String,
    /// JSON-encoded payload
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StoredSnapshot {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// A durable key-value store for checkout snapshots. Writing a key that already exists replaces it.
#[allow(async_fn_in_trait)]
pub trait SnapshotStorage {
    async fn write(&self, key: &str, value: &str, expires_at: DateTime<Utc>) -> Result<(), SnapshotError>;
    /// Returns the stored entry, expired or not. Expiry is the caller's concern.
    async fn read(&self, key: &str) -> Result<Option<StoredSnapshot>, SnapshotError>;
    /// Removes the entry. Returns `true` if there was one.
    async fn delete(&self, key: &str) -> Result<bool, SnapshotError>;
}
