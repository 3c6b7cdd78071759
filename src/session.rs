use thiserror::Error;

use crate::models::{Category, Stats, Task};
use crate::storage::{Storage, StorageError};
use crate::store::{Search, StoreError, TaskStore};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The change was applied in memory but writing the file failed
    #[error("Auto-save failed: {0}")]
    AutoSave(StorageError),
}

/// A task list bound to the file it is persisted in. Every mutation is written
/// through immediately.
#[derive(Debug)]
pub struct Session {
    store: TaskStore,
    storage: Storage,
}

impl Session {
    /// Load the task file, failing on unreadable or malformed content
    pub fn open(storage: Storage) -> Result<Self, StorageError> {
        let tasks = storage.load()?;
        Ok(Self {
            store: TaskStore::from_tasks(tasks),
            storage,
        })
    }

    /// Load the task file; on failure start with an empty list and hand the error back
    pub fn open_lenient(storage: Storage) -> (Self, Option<StorageError>) {
        match storage.load() {
            Ok(tasks) => (
                Self {
                    store: TaskStore::from_tasks(tasks),
                    storage,
                },
                None,
            ),
            Err(e) => {
                log::error!("Failed to load tasks: {}", e);
                (
                    Self {
                        store: TaskStore::new(),
                        storage,
                    },
                    Some(e),
                )
            }
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn add(&mut self, text: &str, category: Category, priority: i64) -> Result<usize, SessionError> {
        let index = self.store.add(text, category, priority)?;
        self.autosave()?;
        Ok(index)
    }

    pub fn delete(&mut self, index: Option<usize>) -> Result<Task, SessionError> {
        let removed = self.store.delete(index)?;
        self.autosave()?;
        Ok(removed)
    }

    pub fn toggle_done(&mut self, index: Option<usize>) -> Result<bool, SessionError> {
        let done = self.store.toggle_done(index)?;
        self.autosave()?;
        Ok(done)
    }

    pub fn search<'a>(&'a self, query: &str) -> Search<'a> {
        self.store.search(query)
    }

    pub fn stats(&self) -> Stats {
        self.store.stats()
    }

    /// Manual save
    pub fn save(&self) -> Result<(), StorageError> {
        self.storage.save(self.store.tasks())
    }

    fn autosave(&self) -> Result<(), SessionError> {
        self.save().map_err(|e| {
            log::error!("Auto-save failed: {}", e);
            SessionError::AutoSave(e)
        })
    }
}
