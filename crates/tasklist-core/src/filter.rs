use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::task::{Task, TaskList};

/// Which tasks a view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Every task.
    #[default]
    All,
    /// Completed tasks only.
    Done,
    /// Open tasks only.
    Todo,
}

impl FilterMode {
    /// Every mode, in menu order.
    pub const ALL: [Self; 3] = [Self::All, Self::Done, Self::Todo];

    /// Value used in the `filter` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Done => "done",
            Self::Todo => "todo",
        }
    }

    /// Resolve a raw query value; missing or unknown values mean [`FilterMode::All`].
    #[must_use]
    pub fn from_query_value(value: Option<&str>) -> Self {
        value.and_then(|raw| raw.parse().ok()).unwrap_or_default()
    }

    /// Whether `task` is visible under this mode.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Done => task.completed,
            Self::Todo => !task.completed,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for filter names other than `all`, `done` and `todo`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter mode: {0}")]
pub struct ParseFilterModeError(pub String);

impl FromStr for FilterMode {
    type Err = ParseFilterModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ParseFilterModeError(s.to_owned()))
    }
}

/// Filtered view of `tasks`, preserving order.
#[must_use]
pub fn project(tasks: &TaskList, mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|task| mode.matches(task)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> TaskList {
        ["a", "b", "c", "d"]
            .into_iter()
            .enumerate()
            .map(|(idx, id)| Task {
                id: id.parse().unwrap_or_else(|err| panic!("valid id: {err}")),
                text: format!("task {id}"),
                completed: idx % 2 == 1,
            })
            .collect()
    }

    fn ids(view: &[&Task]) -> Vec<String> {
        view.iter().map(|task| task.id.to_string()).collect()
    }

    #[test]
    fn projection_keeps_order() {
        let tasks = list();
        assert_eq!(ids(&project(&tasks, FilterMode::All)), ["a", "b", "c", "d"]);
        assert_eq!(ids(&project(&tasks, FilterMode::Done)), ["b", "d"]);
        assert_eq!(ids(&project(&tasks, FilterMode::Todo)), ["a", "c"]);
    }

    #[test]
    fn query_values_fall_back_to_all() {
        assert_eq!(FilterMode::from_query_value(None), FilterMode::All);
        assert_eq!(FilterMode::from_query_value(Some("bogus")), FilterMode::All);
        assert_eq!(FilterMode::from_query_value(Some("done")), FilterMode::Done);
        assert_eq!(FilterMode::from_query_value(Some("todo")), FilterMode::Todo);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(
            "Done".parse::<FilterMode>(),
            Err(ParseFilterModeError("Done".to_owned()))
        );
    }
}
