//! Async task store with artificial latency.
//!
//! Wraps the synchronous [`KvTaskStore`] so that every read and write goes
//! through the same async path a networked backend would.

use std::future::Future;
use std::time::Duration;

use tasklist_core::TaskList;
use tasklist_store::{KeyValueBackend, KvTaskStore, StoreError};
use tracing::warn;

/// Delay applied to every store call unless configured otherwise.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(100);

/// Async storage contract used by the query cache and mutation coordinator.
pub trait AsyncTaskStore: Send + Sync + 'static {
    /// Read the whole task list.
    ///
    /// Never fails: unreadable or missing data yields an empty list.
    fn fetch_all(&self) -> impl Future<Output = TaskList> + Send;

    /// Replace the whole task list and hand it back.
    ///
    /// # Errors
    /// Returns the [`StoreError`] raised by the backend; the previously
    /// persisted list is left in place.
    fn write_all(&self, tasks: TaskList) -> impl Future<Output = Result<TaskList, StoreError>> + Send;
}

/// [`AsyncTaskStore`] over a [`KvTaskStore`], delaying every call by a fixed latency.
pub struct DelayedTaskStore<B> {
    store: KvTaskStore<B>,
    latency: Duration,
}

impl<B: KeyValueBackend + 'static> DelayedTaskStore<B> {
    /// Wrap `store` with the given latency.
    pub const fn new(store: KvTaskStore<B>, latency: Duration) -> Self {
        Self { store, latency }
    }

    /// Wrap `store` with [`DEFAULT_LATENCY`].
    pub const fn with_default_latency(store: KvTaskStore<B>) -> Self {
        Self::new(store, DEFAULT_LATENCY)
    }

    /// Borrow the synchronous store.
    pub const fn inner(&self) -> &KvTaskStore<B> {
        &self.store
    }

    /// Configured latency.
    pub const fn latency(&self) -> Duration {
        self.latency
    }

    async fn load_blocking(&self) -> Result<TaskList, StoreError> {
        // Clone the store so the blocking task owns its handle
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| StoreError::Other(format!("Task join error: {e}")))?
    }

    async fn save_blocking(&self, tasks: TaskList) -> Result<TaskList, StoreError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.save(&tasks).map(|()| tasks))
            .await
            .map_err(|e| StoreError::Other(format!("Task join error: {e}")))?
    }
}

impl<B: KeyValueBackend + 'static> AsyncTaskStore for DelayedTaskStore<B> {
    async fn fetch_all(&self) -> TaskList {
        let tasks = match self.load_blocking().await {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(key = %self.store.key(), error = %err, "Unreadable task list, starting empty");
                TaskList::new()
            }
        };
        tokio::time::sleep(self.latency).await;
        tasks
    }

    async fn write_all(&self, tasks: TaskList) -> Result<TaskList, StoreError> {
        let result = self.save_blocking(tasks).await;
        if let Err(err) = &result {
            warn!(key = %self.store.key(), error = %err, "Failed to write task list");
        }
        tokio::time::sleep(self.latency).await;
        result
    }
}
