use serde::{Deserialize, Serialize};

use crate::filter::FilterMode;
use crate::id::{IdGenerator, TaskId};

/// Attempts made against the generator before falling back to suffixing.
const MAX_FRESH_ID_ATTEMPTS: usize = 64;

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier, unique within its list.
    pub id: TaskId,
    /// Free-form text shown to the user.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
}

impl Task {
    /// Create an open task.
    #[must_use]
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// Ordered task collection; the unit of persistence.
///
/// Serialized as a plain JSON array of [`Task`] objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the list holds no task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Tasks as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Index of the task with `id`.
    #[must_use]
    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    /// Task with `id`.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Whether a task with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Subsequence matching `mode`, in list order.
    #[must_use]
    pub fn project(&self, mode: FilterMode) -> Vec<&Task> {
        crate::filter::project(self, mode)
    }

    /// Produce an identifier not yet used in this list.
    ///
    /// Candidates come from `ids`; if it keeps returning taken ids a numeric
    /// suffix is appended until the result is free.
    #[must_use]
    pub fn fresh_id(&self, ids: &dyn IdGenerator) -> TaskId {
        let mut candidate = ids.next_id();
        for _ in 1..MAX_FRESH_ID_ATTEMPTS {
            if !self.contains(&candidate) {
                return candidate;
            }
            candidate = ids.next_id();
        }
        let base = candidate.to_string();
        (1_usize..)
            .filter_map(|n| format!("{base}-{n}").parse::<TaskId>().ok())
            .find(|id| !self.contains(id))
            .unwrap_or(candidate)
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    /// Consume the list into its tasks.
    #[must_use]
    pub fn into_vec(self) -> Vec<Task> {
        self.tasks
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl FromIterator<Task> for TaskList {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TaskList {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
