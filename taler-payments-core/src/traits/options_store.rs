//! Settings storage abstraction trait

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::SettingsRecord;

/// Owner of the persisted [`SettingsRecord`].
///
/// Platform implementations back this with whatever key-value persistence the
/// host offers (an options table, a config file, a database row). All other
/// components receive read-only snapshots from [`get`](Self::get) or hand
/// candidate copies to [`set`](Self::set) — the single commit point. No
/// partial writes exist: `set` replaces the whole record.
#[async_trait]
pub trait OptionsStore: Send + Sync {
    /// Load the current record. A missing option is an empty record, not an
    /// error.
    async fn get(&self) -> CoreResult<SettingsRecord>;

    /// Commit a record, replacing the stored one.
    async fn set(&self, record: &SettingsRecord) -> CoreResult<()>;

    /// Load the raw stored JSON (for format inspection and export tooling).
    async fn load_raw_json(&self) -> CoreResult<String>;
}

/// In-memory store for tests, demos, and single-process deployments.
pub struct InMemoryOptionsStore {
    record: RwLock<SettingsRecord>,
}

impl InMemoryOptionsStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_record(SettingsRecord::default())
    }

    /// Store seeded with a record.
    #[must_use]
    pub fn with_record(record: SettingsRecord) -> Self {
        Self {
            record: RwLock::new(record),
        }
    }
}

impl Default for InMemoryOptionsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OptionsStore for InMemoryOptionsStore {
    async fn get(&self) -> CoreResult<SettingsRecord> {
        Ok(self.record.read().await.clone())
    }

    async fn set(&self, record: &SettingsRecord) -> CoreResult<()> {
        *self.record.write().await = record.clone();
        Ok(())
    }

    async fn load_raw_json(&self) -> CoreResult<String> {
        let record = self.record.read().await;
        serde_json::to_string(&*record).map_err(|e| CoreError::SerializationError(e.to_string()))
    }
}
