use crate::filter::FilterMode;
use crate::id::{IdGenerator, TaskId};
use crate::reorder::reorder;
use crate::task::{Task, TaskList};

/// Edit applied to a whole task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Append an open task. Blank text is dropped.
    Add {
        /// Task text; trimmed before it is stored.
        text: String,
    },
    /// Flip the completion flag.
    Toggle {
        /// Target task.
        id: TaskId,
    },
    /// Replace the text verbatim.
    EditText {
        /// Target task.
        id: TaskId,
        /// New text.
        text: String,
    },
    /// Remove one task.
    Delete {
        /// Target task.
        id: TaskId,
    },
    /// Remove every completed task.
    DeleteCompleted,
    /// Remove everything.
    DeleteAll,
    /// Move a task within the filtered view.
    Reorder {
        /// Task being moved.
        from: TaskId,
        /// Task whose position it takes.
        to: TaskId,
        /// View the positions refer to.
        filter: FilterMode,
    },
}

impl Mutation {
    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Toggle { .. } => "toggle",
            Self::EditText { .. } => "edit_text",
            Self::Delete { .. } => "delete",
            Self::DeleteCompleted => "delete_completed",
            Self::DeleteAll => "delete_all",
            Self::Reorder { .. } => "reorder",
        }
    }

    /// Whether applying this mutation can be skipped without writing.
    ///
    /// Only an `Add` with blank text qualifies; everything else is written
    /// even when it leaves the list as it was.
    #[must_use]
    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Add { text } if text.trim().is_empty())
    }

    /// Compute the list that results from applying this mutation to `tasks`.
    #[must_use]
    pub fn apply(&self, tasks: &TaskList, ids: &dyn IdGenerator) -> TaskList {
        match self {
            Self::Add { text } => {
                let text = text.trim();
                if text.is_empty() {
                    return tasks.clone();
                }
                let mut next = tasks.clone();
                let id = tasks.fresh_id(ids);
                next.tasks_mut().push(Task::new(id, text));
                next
            }
            Self::Toggle { id } => map_task(tasks, id, |task| task.completed = !task.completed),
            Self::EditText { id, text } => map_task(tasks, id, |task| task.text.clone_from(text)),
            Self::Delete { id } => tasks.iter().filter(|task| &task.id != id).cloned().collect(),
            Self::DeleteCompleted => tasks.iter().filter(|task| !task.completed).cloned().collect(),
            Self::DeleteAll => TaskList::new(),
            Self::Reorder { from, to, filter } => reorder(tasks, *filter, from, to),
        }
    }
}

fn map_task(tasks: &TaskList, id: &TaskId, edit: impl FnOnce(&mut Task)) -> TaskList {
    let mut next = tasks.clone();
    if let Some(task) = next.tasks_mut().iter_mut().find(|task| &task.id == id) {
        edit(task);
    }
    next
}
