//! Key-value backed storage for tasklist.
//!
//! The whole task list lives under a single key as a JSON array.

pub mod backend;
pub mod error;

use std::sync::Arc;

use tasklist_core::TaskList;
use tracing::info;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use error::StoreError;

/// Key the task list is stored under unless configured otherwise.
pub const STORAGE_KEY: &str = "todo-list-tasks";

/// Synchronous task store over a [`KeyValueBackend`].
pub struct KvTaskStore<B> {
    backend: Arc<B>,
    key: String,
}

impl<B> Clone for KvTaskStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            key: self.key.clone(),
        }
    }
}

impl<B: KeyValueBackend> KvTaskStore<B> {
    /// Store using the default [`STORAGE_KEY`].
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    /// Store using a custom key.
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend: Arc::new(backend),
            key: key.into(),
        }
    }

    /// Storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read the persisted list; an absent key reads as an empty list.
    ///
    /// # Errors
    /// Returns [`StoreError::Corrupt`] when the value is not a task list, or the
    /// backend error when it cannot be read.
    pub fn load(&self) -> Result<TaskList, StoreError> {
        let Some(raw) = self.backend.get_item(&self.key)? else {
            return Ok(TaskList::new());
        };
        serde_json::from_str(&raw).map_err(|err| StoreError::Corrupt {
            key: self.key.clone(),
            reason: err.to_string(),
        })
    }

    /// Replace the persisted list with `tasks`.
    ///
    /// # Errors
    /// Returns the backend error when the write fails; the previous value is
    /// left in place.
    pub fn save(&self, tasks: &TaskList) -> Result<(), StoreError> {
        let body =
            serde_json::to_string(tasks).map_err(|err| StoreError::Serialize(err.to_string()))?;
        self.backend.set_item(&self.key, &body)?;
        info!(key = %self.key, tasks = tasks.len(), "Saved task list");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::{Task, TaskId};

    fn sample() -> TaskList {
        let mut done = Task::new(TaskId::random(), "done");
        done.completed = true;
        TaskList::from(vec![Task::new(TaskId::random(), "open"), done])
    }

    #[test]
    fn absent_key_loads_empty() -> anyhow::Result<()> {
        let store = KvTaskStore::new(MemoryBackend::new());
        assert!(store.load()?.is_empty());
        Ok(())
    }

    #[test]
    fn save_then_load_round_trips() -> anyhow::Result<()> {
        let store = KvTaskStore::new(MemoryBackend::new());
        let tasks = sample();
        store.save(&tasks)?;
        assert_eq!(store.load()?, tasks);
        Ok(())
    }

    #[test]
    fn value_is_a_plain_json_array_under_the_key() -> anyhow::Result<()> {
        let store = KvTaskStore::new(MemoryBackend::new());
        let tasks = sample();
        store.save(&tasks)?;
        let raw = store.backend().get_item(STORAGE_KEY)?.unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        assert!(value.is_array());
        assert_eq!(value[1]["completed"], serde_json::Value::Bool(true));
        assert_eq!(value[0]["text"], "open");
        Ok(())
    }

    #[test]
    fn unparseable_value_is_corrupt() -> anyhow::Result<()> {
        let store = KvTaskStore::with_key(MemoryBackend::new(), "custom");
        store.backend().set_item("custom", "{\"nope\":1}")?;
        assert!(matches!(store.load(), Err(StoreError::Corrupt { key, .. }) if key == "custom"));
        Ok(())
    }

    #[test]
    fn failed_save_keeps_previous_value() -> anyhow::Result<()> {
        let store = KvTaskStore::new(MemoryBackend::with_quota(256));
        let tasks = sample();
        store.save(&tasks)?;

        let huge: TaskList = (0..32).map(|n| Task::new(TaskId::random(), format!("task {n}"))).collect();
        assert!(matches!(store.save(&huge), Err(StoreError::QuotaExceeded { .. })));
        assert_eq!(store.load()?, tasks);
        Ok(())
    }
}
