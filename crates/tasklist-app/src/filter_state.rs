//! View filter stored in the `filter` query parameter of the current location.

use std::mem;

use tasklist_core::{FilterMode, Task, TaskList};
use thiserror::Error;
use url::Url;

/// Query parameter holding the filter mode.
pub const FILTER_PARAM: &str = "filter";
/// Location used when none is given.
pub const DEFAULT_LOCATION: &str = "tasklist:///";

/// Errors raised when a location cannot carry a filter.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The location is not a URL.
    #[error("invalid location: {0}")]
    Parse(#[from] url::ParseError),
    /// The URL has no hierarchical path (e.g. `mailto:`), so no query either.
    #[error("location cannot carry query parameters: {0}")]
    Opaque(Url),
}

/// Current location plus the locations navigated away from.
#[derive(Debug, Clone)]
pub struct FilterState {
    current: Url,
    history: Vec<Url>,
}

impl FilterState {
    /// Start at `location`.
    ///
    /// # Errors
    /// Returns [`LocationError::Opaque`] for URLs that cannot have a query.
    pub fn new(location: Url) -> Result<Self, LocationError> {
        if location.cannot_be_a_base() {
            return Err(LocationError::Opaque(location));
        }
        Ok(Self {
            current: location,
            history: Vec::new(),
        })
    }

    /// Parse `location` and start there.
    ///
    /// # Errors
    /// Returns [`LocationError`] when `location` is not a usable URL.
    pub fn parse(location: &str) -> Result<Self, LocationError> {
        Self::new(Url::parse(location)?)
    }

    /// Current location.
    pub const fn current(&self) -> &Url {
        &self.current
    }

    /// Filter mode selected by the current location; absent means `all`.
    pub fn mode(&self) -> FilterMode {
        let raw = self
            .current
            .query_pairs()
            .find(|(name, _)| name == FILTER_PARAM)
            .map(|(_, value)| value);
        FilterMode::from_query_value(raw.as_deref())
    }

    /// Navigate to a copy of the current location with `filter=<mode>`.
    ///
    /// Other query parameters are kept; the previous location goes onto the
    /// history.
    pub fn set_filter(&mut self, mode: FilterMode) -> &Url {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut replaced = false;
        for (name, value) in self.current.query_pairs() {
            if name == FILTER_PARAM {
                if !replaced {
                    pairs.push((name.into_owned(), mode.as_str().to_owned()));
                    replaced = true;
                }
            } else {
                pairs.push((name.into_owned(), value.into_owned()));
            }
        }
        if !replaced {
            pairs.push((FILTER_PARAM.to_owned(), mode.as_str().to_owned()));
        }

        let mut next = self.current.clone();
        next.query_pairs_mut().clear().extend_pairs(pairs);
        self.history.push(mem::replace(&mut self.current, next));
        &self.current
    }

    /// Return to the previous location. Returns false when there is none.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    /// Number of locations that [`back`](Self::back) can return to.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Tasks visible at the current location.
    pub fn project<'a>(&self, tasks: &'a TaskList) -> Vec<&'a Task> {
        tasks.project(self.mode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::TaskId;

    fn state(location: &str) -> FilterState {
        FilterState::parse(location).unwrap_or_else(|err| panic!("valid location: {err}"))
    }

    #[test]
    fn missing_or_unknown_filter_means_all() {
        assert_eq!(state(DEFAULT_LOCATION).mode(), FilterMode::All);
        assert_eq!(state("https://todo.test/?filter=bogus").mode(), FilterMode::All);
        assert_eq!(state("https://todo.test/?filter=done").mode(), FilterMode::Done);
    }

    #[test]
    fn set_filter_pushes_a_new_location() {
        let mut filter = state("https://todo.test/list?page=2&filter=done");
        let next = filter.set_filter(FilterMode::Todo).clone();
        assert_eq!(next.as_str(), "https://todo.test/list?page=2&filter=todo");
        assert_eq!(filter.mode(), FilterMode::Todo);
        assert_eq!(filter.history_len(), 1);

        assert!(filter.back());
        assert_eq!(filter.mode(), FilterMode::Done);
        assert!(!filter.back());
    }

    #[test]
    fn set_filter_appends_when_absent() {
        let mut filter = state(DEFAULT_LOCATION);
        filter.set_filter(FilterMode::Done);
        assert_eq!(filter.current().query(), Some("filter=done"));
    }

    #[test]
    fn opaque_urls_are_rejected() {
        assert!(matches!(
            FilterState::parse("mailto:someone@example.invalid"),
            Err(LocationError::Opaque(_))
        ));
        assert!(matches!(FilterState::parse("not a url"), Err(LocationError::Parse(_))));
    }

    #[test]
    fn projection_follows_location() {
        let mut done = Task::new(TaskId::random(), "done");
        done.completed = true;
        let tasks = TaskList::from(vec![Task::new(TaskId::random(), "open"), done]);

        let mut filter = state(DEFAULT_LOCATION);
        assert_eq!(filter.project(&tasks).len(), 2);
        filter.set_filter(FilterMode::Done);
        let view = filter.project(&tasks);
        assert_eq!(view.len(), 1);
        assert!(view[0].completed);
    }
}
