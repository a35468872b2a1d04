use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::traits::{SnapshotError, SnapshotStorage, StoredSnapshot};

/// A process-local [`SnapshotStorage`]. Contents are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStorage {
    entries: Arc<Mutex<HashMap<String, StoredSnapshot>>>,
}

impl MemorySnapshotStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStorage for MemorySnapshotStorage {
    async fn write(&self, key: &str, value: &str, expires_at: DateTime<Utc>) -> Result<(), SnapshotError> {
        let entry =
            StoredSnapshot { key: key.to_string(), value: value.to_string(), created_at: Utc::now(), expires_at };
        self.entries.lock().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<StoredSnapshot>, SnapshotError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool, SnapshotError> {
        Ok(self.entries.lock().await.remove(key).is_some())
    }
}
