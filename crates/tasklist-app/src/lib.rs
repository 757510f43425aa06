//! Application layer logic for tasklist.
//!
//! This crate provides the async store, the query cache, the mutation
//! coordinator, the location-based filter state, and configuration shared by
//! front ends.

pub mod async_store;
pub mod config;
pub mod coordinator;
pub mod filter_state;
pub mod query_cache;

// Re-exports for convenience
pub use async_store::{AsyncTaskStore, DEFAULT_LATENCY, DelayedTaskStore};
pub use config::{ProjectConfig, StorageConfig};
pub use coordinator::{MutationCoordinator, MutationError};
pub use filter_state::{DEFAULT_LOCATION, FILTER_PARAM, FilterState, LocationError};
pub use query_cache::{CacheEntry, CacheState, QueryCache, QueryKey};
