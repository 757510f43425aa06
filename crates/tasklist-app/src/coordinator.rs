//! Serialized read-transform-write mutations of the task list.

use std::sync::Arc;

use tasklist_core::{FilterMode, IdGenerator, Mutation, RandomIdGenerator, TaskId, TaskList};
use tasklist_store::StoreError;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinError;
use tracing::{debug, info};

use crate::async_store::AsyncTaskStore;
use crate::query_cache::{QueryCache, QueryKey};

/// Errors surfaced by [`MutationCoordinator`].
#[derive(Debug, Error)]
pub enum MutationError {
    /// The new list could not be written; nothing was committed.
    #[error("failed to persist tasks: {0}")]
    Storage(#[from] StoreError),
    /// The task running the mutation panicked or was aborted.
    #[error("mutation task failed: {0}")]
    Join(#[from] JoinError),
}

/// Applies [`Mutation`]s one at a time against the cache and store.
///
/// Each mutation reads the cached list (loading it first if the cache is
/// empty), computes the new list, writes it, then seeds the cache with the
/// written list and invalidates it. The gate is a fair mutex, so queued
/// mutations run in dispatch order and always see the previous write.
///
/// Once a mutation holds the gate it runs on its own task, so dropping the
/// caller's future does not stop the write or the cache refresh after it.
pub struct MutationCoordinator<S> {
    cache: QueryCache<S>,
    ids: Arc<dyn IdGenerator>,
    gate: Arc<Mutex<()>>,
}

impl<S: AsyncTaskStore> MutationCoordinator<S> {
    /// Coordinator drawing random task ids.
    pub fn new(cache: QueryCache<S>) -> Self {
        Self::with_id_generator(cache, Arc::new(RandomIdGenerator))
    }

    /// Coordinator drawing task ids from `ids`.
    pub fn with_id_generator(cache: QueryCache<S>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            cache,
            ids,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Cache the coordinator reads from and refreshes.
    pub const fn cache(&self) -> &QueryCache<S> {
        &self.cache
    }

    /// Apply `mutation` and return the list that was persisted.
    ///
    /// # Errors
    /// Returns [`MutationError::Storage`] when the write fails; the store and
    /// the cache keep their previous contents. Returns
    /// [`MutationError::Join`] if the task running the mutation panics.
    pub async fn apply(&self, mutation: Mutation) -> Result<TaskList, MutationError> {
        let turn = Arc::clone(&self.gate).lock_owned().await;
        let cache = self.cache.clone();
        let ids = Arc::clone(&self.ids);

        tokio::spawn(async move {
            let _turn = turn;
            commit(&cache, ids.as_ref(), mutation).await
        })
        .await?
    }

    /// Append a task; blank text is ignored.
    ///
    /// # Errors
    /// See [`apply`](Self::apply).
    pub async fn add(&self, text: impl Into<String>) -> Result<TaskList, MutationError> {
        self.apply(Mutation::Add { text: text.into() }).await
    }

    /// Flip the completion flag of `id`.
    ///
    /// # Errors
    /// See [`apply`](Self::apply).
    pub async fn toggle(&self, id: TaskId) -> Result<TaskList, MutationError> {
        self.apply(Mutation::Toggle { id }).await
    }

    /// Replace the text of `id`.
    ///
    /// # Errors
    /// See [`apply`](Self::apply).
    pub async fn edit_text(&self, id: TaskId, text: impl Into<String>) -> Result<TaskList, MutationError> {
        self.apply(Mutation::EditText { id, text: text.into() }).await
    }

    /// Remove `id`.
    ///
    /// # Errors
    /// See [`apply`](Self::apply).
    pub async fn delete(&self, id: TaskId) -> Result<TaskList, MutationError> {
        self.apply(Mutation::Delete { id }).await
    }

    /// Remove every completed task.
    ///
    /// # Errors
    /// See [`apply`](Self::apply).
    pub async fn delete_completed(&self) -> Result<TaskList, MutationError> {
        self.apply(Mutation::DeleteCompleted).await
    }

    /// Remove every task.
    ///
    /// # Errors
    /// See [`apply`](Self::apply).
    pub async fn delete_all(&self) -> Result<TaskList, MutationError> {
        self.apply(Mutation::DeleteAll).await
    }

    /// Move `from` to the position of `to` within the `filter` view.
    ///
    /// # Errors
    /// See [`apply`](Self::apply).
    pub async fn reorder(
        &self,
        from: TaskId,
        to: TaskId,
        filter: FilterMode,
    ) -> Result<TaskList, MutationError> {
        self.apply(Mutation::Reorder { from, to, filter }).await
    }
}

async fn commit<S: AsyncTaskStore>(
    cache: &QueryCache<S>,
    ids: &dyn IdGenerator,
    mutation: Mutation,
) -> Result<TaskList, MutationError> {
    let base = cache.ensure(QueryKey::Tasks).await;
    if mutation.is_dropped() {
        debug!(kind = mutation.kind(), "Dropped blank mutation");
        return Ok(base);
    }

    let next = mutation.apply(&base, ids);
    let written = cache.store().write_all(next).await?;

    cache.set(QueryKey::Tasks, written.clone());
    drop(cache.invalidate(QueryKey::Tasks));
    info!(kind = mutation.kind(), tasks = written.len(), "Mutation persisted");
    Ok(written)
}
