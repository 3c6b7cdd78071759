use thiserror::Error;

use crate::models::{Category, Stats, Task};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Task text must not be empty")]
    EmptyText,
    #[error("No task selected")]
    NoSelection,
    #[error("No task at position {index} (list has {len} tasks)")]
    NotFound { index: usize, len: usize },
}

impl StoreError {
    /// True for the not-found family (missing selection or stale index)
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NoSelection | StoreError::NotFound { .. })
    }
}

/// Ordered, in-memory task list. Positions in this list are the only task identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Append a new open task and return its full-list index
    pub fn add(&mut self, text: &str, category: Category, priority: i64) -> Result<usize, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyText);
        }
        self.tasks.push(Task::new(text.to_string(), category, priority));
        Ok(self.tasks.len() - 1)
    }

    /// Remove the task at a full-list index
    pub fn delete(&mut self, index: Option<usize>) -> Result<Task, StoreError> {
        let index = self.check_index(index)?;
        Ok(self.tasks.remove(index))
    }

    /// Flip `done` on the task at a full-list index and return the new value
    pub fn toggle_done(&mut self, index: Option<usize>) -> Result<bool, StoreError> {
        let index = self.check_index(index)?;
        let task = &mut self.tasks[index];
        task.done = !task.done;
        Ok(task.done)
    }

    /// Tasks whose text contains `query` (trimmed, case-insensitive), paired with their
    /// full-list index, in list order. An empty query matches everything.
    pub fn search<'a>(&'a self, query: &str) -> Search<'a> {
        Search {
            inner: self.tasks.iter().enumerate(),
            needle: query.trim().to_lowercase(),
        }
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total: self.tasks.len(),
            done: self.tasks.iter().filter(|t| t.done).count(),
        }
    }

    fn check_index(&self, index: Option<usize>) -> Result<usize, StoreError> {
        let index = index.ok_or(StoreError::NoSelection)?;
        if index >= self.tasks.len() {
            return Err(StoreError::NotFound {
                index,
                len: self.tasks.len(),
            });
        }
        Ok(index)
    }
}

/// Lazy search results; clone it to restart from the beginning.
#[derive(Debug, Clone)]
pub struct Search<'a> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, Task>>,
    needle: String,
}

impl<'a> Iterator for Search<'a> {
    type Item = (usize, &'a Task);

    fn next(&mut self) -> Option<Self::Item> {
        let needle = &self.needle;
        self.inner.by_ref().find(|(_, task)| task.matches(needle))
    }
}

/// A search result frozen into a display-row -> full-list index mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    query: String,
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn build(store: &TaskStore, query: &str) -> Self {
        Self {
            query: query.to_string(),
            indices: store.search(query).map(|(idx, _)| idx).collect(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Translate a display row into the full-list index it shows
    pub fn full_index(&self, display_index: usize) -> Option<usize> {
        self.indices.get(display_index).copied()
    }

    /// Rows paired with the tasks they show
    pub fn rows<'a>(&'a self, store: &'a TaskStore) -> impl Iterator<Item = (usize, &'a Task)> + 'a {
        self.indices
            .iter()
            .filter_map(move |&idx| store.get(idx).map(|task| (idx, task)))
    }
}
