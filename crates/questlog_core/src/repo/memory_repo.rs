//! In-process state repository.
//!
//! Holds values in a map for the lifetime of the repository. Writes can be
//! switched off to exercise persistence-failure handling.

use crate::repo::state_repo::{RepoError, RepoResult, StateRepository};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Map-backed state repository.
#[derive(Debug, Default)]
pub struct MemoryStateRepository {
    values: RefCell<HashMap<String, String>>,
    reject_writes: Cell<bool>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with `value` under `key`.
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let repo = Self::new();
        repo.values
            .borrow_mut()
            .insert(key.to_string(), value.into());
        repo
    }

    /// When `true`, every following write fails with `RepoError::Unavailable`.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Returns the raw stored value for `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl StateRepository for MemoryStateRepository {
    fn read_state(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn write_state(&self, key: &str, value: &str) -> RepoResult<()> {
        if self.reject_writes.get() {
            return Err(RepoError::Unavailable("writes rejected".to_string()));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
