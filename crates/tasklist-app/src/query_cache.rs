//! In-memory query cache in front of the async task store.
//!
//! Each key moves through `Empty -> Populated -> Stale -> Populated`. Every
//! `set` and `invalidate` bumps the entry generation; a fetch started under an
//! older generation is discarded instead of overwriting newer data.

use std::fmt;
use std::sync::Arc;

use tasklist_core::TaskList;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::async_store::AsyncTaskStore;

/// Logical resource cached by [`QueryCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full task list.
    Tasks,
}

impl QueryKey {
    const COUNT: usize = 1;

    /// Name of the resource.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Tasks => 0,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a cache entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing fetched yet.
    #[default]
    Empty,
    /// Holds data that has not been invalidated since.
    Populated,
    /// Holds data that was invalidated; a refetch is pending.
    Stale,
}

/// Snapshot of one cache entry, as seen by subscribers.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    data: Option<TaskList>,
    state: CacheState,
    generation: u64,
}

impl CacheEntry {
    /// Cached list, possibly stale.
    #[must_use]
    pub const fn data(&self) -> Option<&TaskList> {
        self.data.as_ref()
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> CacheState {
        self.state
    }

    /// Number of `set`/`invalidate` calls seen so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Cache of store queries, shared by cloning.
pub struct QueryCache<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    store: Arc<S>,
    entries: [watch::Sender<CacheEntry>; QueryKey::COUNT],
}

impl<S> Clone for QueryCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> Inner<S> {
    const fn entry(&self, key: QueryKey) -> &watch::Sender<CacheEntry> {
        &self.entries[key.index()]
    }

    fn land(&self, key: QueryKey, generation: u64, tasks: TaskList) -> bool {
        self.entry(key).send_if_modified(|entry| {
            if entry.generation != generation {
                debug!(%key, generation, current = entry.generation, "Discarding outdated fetch");
                return false;
            }
            entry.data = Some(tasks);
            entry.state = CacheState::Populated;
            true
        })
    }
}

impl<S: AsyncTaskStore> QueryCache<S> {
    /// Empty cache reading through `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                entries: std::array::from_fn(|_| watch::channel(CacheEntry::default()).0),
            }),
        }
    }

    /// Store the cache reads through.
    pub fn store(&self) -> &Arc<S> {
        &self.inner.store
    }

    /// Cached value for `key`, even if stale.
    pub fn get(&self, key: QueryKey) -> Option<TaskList> {
        self.inner.entry(key).borrow().data.clone()
    }

    /// Lifecycle state of `key`.
    pub fn state(&self, key: QueryKey) -> CacheState {
        self.inner.entry(key).borrow().state
    }

    /// Replace the cached value for `key`.
    pub fn set(&self, key: QueryKey, tasks: TaskList) {
        self.inner.entry(key).send_modify(|entry| {
            entry.data = Some(tasks);
            entry.state = CacheState::Populated;
            entry.generation += 1;
        });
        debug!(%key, "Cache entry set");
    }

    /// Mark `key` stale and refetch it in the background.
    ///
    /// The returned handle resolves once the refetch has landed (or was
    /// discarded in favour of newer data). Must be called inside a Tokio runtime.
    pub fn invalidate(&self, key: QueryKey) -> JoinHandle<()> {
        let mut generation = 0;
        self.inner.entry(key).send_modify(|entry| {
            entry.generation += 1;
            generation = entry.generation;
            if entry.data.is_some() {
                entry.state = CacheState::Stale;
            }
        });
        debug!(%key, generation, "Cache entry invalidated");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let tasks = inner.store.fetch_all().await;
            if inner.land(key, generation, tasks) {
                debug!(%key, generation, "Cache entry refetched");
            }
        })
    }

    /// Cached value for `key`, fetching it first when the entry is empty.
    pub async fn ensure(&self, key: QueryKey) -> TaskList {
        if let Some(tasks) = self.get(key) {
            return tasks;
        }
        let generation = self.inner.entry(key).borrow().generation;
        let tasks = self.inner.store.fetch_all().await;
        if self.inner.land(key, generation, tasks.clone()) {
            return tasks;
        }
        self.get(key).unwrap_or(tasks)
    }

    /// Watch every change of the `key` entry.
    pub fn subscribe(&self, key: QueryKey) -> watch::Receiver<CacheEntry> {
        self.inner.entry(key).subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::async_store::DelayedTaskStore;
    use tasklist_core::{Task, TaskId};
    use tasklist_store::{KvTaskStore, MemoryBackend};

    type Store = DelayedTaskStore<MemoryBackend>;

    fn cache() -> QueryCache<Store> {
        let store = DelayedTaskStore::with_default_latency(KvTaskStore::new(MemoryBackend::new()));
        QueryCache::new(Arc::new(store))
    }

    fn one(text: &str) -> TaskList {
        TaskList::from(vec![Task::new(TaskId::random(), text)])
    }

    #[tokio::test(start_paused = true)]
    async fn starts_empty_until_first_fetch() {
        let cache = cache();
        assert_eq!(cache.state(QueryKey::Tasks), CacheState::Empty);
        assert!(cache.get(QueryKey::Tasks).is_none());

        let tasks = cache.ensure(QueryKey::Tasks).await;
        assert!(tasks.is_empty());
        assert_eq!(cache.state(QueryKey::Tasks), CacheState::Populated);
        assert_eq!(cache.get(QueryKey::Tasks), Some(TaskList::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_refetches_from_store() -> Result<(), tasklist_store::StoreError> {
        let cache = cache();
        cache.set(QueryKey::Tasks, one("optimistic"));

        let persisted = one("persisted");
        cache.store().write_all(persisted.clone()).await?;

        let refetch = cache.invalidate(QueryKey::Tasks);
        assert_eq!(cache.state(QueryKey::Tasks), CacheState::Stale);
        assert_ne!(cache.get(QueryKey::Tasks), Some(persisted.clone()));

        let _ = refetch.await;
        assert_eq!(cache.state(QueryKey::Tasks), CacheState::Populated);
        assert_eq!(cache.get(QueryKey::Tasks), Some(persisted));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn outdated_refetch_does_not_clobber_newer_set() {
        let cache = cache();
        let refetch = cache.invalidate(QueryKey::Tasks);
        let newer = one("newer");
        cache.set(QueryKey::Tasks, newer.clone());

        let _ = refetch.await;
        assert_eq!(cache.get(QueryKey::Tasks), Some(newer));
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_observe_refetch() {
        let cache = cache();
        let mut rx = cache.subscribe(QueryKey::Tasks);
        let _refetch = cache.invalidate(QueryKey::Tasks);

        let entry = rx
            .wait_for(|entry| entry.state() == CacheState::Populated)
            .await
            .map(|entry| entry.clone());
        assert!(matches!(entry, Ok(entry) if entry.data().is_some_and(TaskList::is_empty)));
    }

    #[test]
    fn key_names() {
        assert_eq!(QueryKey::Tasks.to_string(), "tasks");
    }
}
