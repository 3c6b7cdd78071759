use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{Category, Task, DEFAULT_PRIORITY};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Could not serialize tasks: {0}")]
    SerializeError(#[from] serde_json::Error),
}

impl StorageError {
    /// True when the file exists but is not valid JSON
    pub fn is_parse_error(&self) -> bool {
        matches!(self, StorageError::ParseError { .. })
    }
}

/// JSON file holding the task list
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the task list. A missing file is an empty list; records are defaulted
    /// field by field rather than rejected.
    pub fn load(&self) -> Result<Vec<Task>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No task file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StorageError::ReadError {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let value: Value =
            serde_json::from_str(&contents).map_err(|source| StorageError::ParseError {
                path: self.path.clone(),
                source,
            })?;

        let tasks = tasks_from_json(value);
        log::debug!("Loaded {} tasks from {}", tasks.len(), self.path.display());
        Ok(tasks)
    }

    /// Overwrite the file with the full task list
    pub fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        // Serialize before touching the file so a failure leaves it intact
        let json = serde_json::to_string_pretty(tasks)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| StorageError::WriteError {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(&self.path, json).map_err(|source| StorageError::WriteError {
            path: self.path.clone(),
            source,
        })?;

        log::debug!("Saved {} tasks to {}", tasks.len(), self.path.display());
        Ok(())
    }
}

/// Turn a parsed document into tasks. Anything but a top-level array yields no tasks.
pub fn tasks_from_json(value: Value) -> Vec<Task> {
    let Value::Array(items) = value else {
        log::warn!("Task file does not contain a JSON array, ignoring its contents");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(pos, item)| match item {
            Value::Object(record) => Some(task_from_record(&record)),
            _ => {
                log::warn!("Skipping task entry {} that is not an object", pos);
                None
            }
        })
        .collect()
}

fn task_from_record(record: &Map<String, Value>) -> Task {
    let text = record
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let category = record
        .get("category")
        .and_then(Value::as_str)
        .map(Category::from_stored)
        .unwrap_or(Category::Other);

    let priority = record
        .get("priority")
        .and_then(integer_value)
        .unwrap_or(DEFAULT_PRIORITY);

    let done = record.get("done").and_then(Value::as_bool).unwrap_or(false);

    Task {
        text,
        category,
        priority,
        done,
    }
}

/// Integers and integral floats (`3.0`) count; everything else does not
fn integer_value(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn non_array_document_is_empty() {
        assert!(tasks_from_json(json!({"not": "an array"})).is_empty());
        assert!(tasks_from_json(json!("text")).is_empty());
        assert!(tasks_from_json(Value::Null).is_empty());
    }

    #[test]
    fn non_object_elements_are_skipped() {
        let tasks = tasks_from_json(json!([1, "two", {"text": "three"}, null, []]));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "three");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let tasks = tasks_from_json(json!([{"text": "x"}]));
        assert_eq!(
            tasks,
            vec![Task {
                text: "x".to_string(),
                category: Category::Other,
                priority: 2,
                done: false,
            }]
        );
    }

    #[test]
    fn wrongly_typed_fields_take_defaults() {
        let tasks = tasks_from_json(json!([
            {"text": 5, "category": "Chores", "priority": "1", "done": "yes"}
        ]));
        assert_eq!(tasks[0].text, "");
        assert_eq!(tasks[0].category, Category::Other);
        assert_eq!(tasks[0].priority, 2);
        assert!(!tasks[0].done);
    }

    #[test]
    fn priority_is_not_range_checked() {
        let tasks = tasks_from_json(json!([
            {"text": "a", "priority": 7},
            {"text": "b", "priority": 3.0},
            {"text": "c", "priority": 1.5}
        ]));
        let priorities: Vec<i64> = tasks.iter().map(|t| t.priority).collect();
        assert_eq!(priorities, vec![7, 3, 2]);
    }
}
