//! Domain types for tasklist: tasks, filtered views and list mutations.

/// Filter modes and view projection.
pub mod filter;
/// Identifier types.
pub mod id;
/// Whole-list edits.
pub mod mutation;
/// Moving tasks inside a filtered view.
pub mod reorder;
/// Task and task list.
pub mod task;

pub use filter::{FilterMode, ParseFilterModeError, project};
pub use id::{IdGenerator, ParseTaskIdError, RandomIdGenerator, TaskId};
pub use mutation::Mutation;
pub use reorder::reorder;
pub use task::{Task, TaskList};
