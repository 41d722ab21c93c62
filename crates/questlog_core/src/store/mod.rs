//! Live state store.
//!
//! # Responsibility
//! - Own the single live `StateAggregate` and the repository it persists to.
//! - Provide the `init -> mutate -> persist -> teardown` lifecycle.
//!
//! # Invariants
//! - `replace` swaps the whole root; no partial import is ever visible.
//! - `persist` reports failures to the caller; the in-memory aggregate stays
//!   authoritative for the session either way.
//! - Stored text that cannot be decoded is copied to `STATE_BACKUP_KEY`
//!   before defaults take over, so the next `persist` never erases it.
//! - Calls are serialized by `&mut self`; an import cannot interleave with
//!   another mutation.

pub mod codec;
pub mod merge;

use crate::ledger::enforce_limit;
use crate::model::state::StateAggregate;
use crate::repo::state_repo::{
    RepoError, StateRepository, STATE_BACKUP_KEY, STATE_STORAGE_KEY,
};
use self::codec::{decode_merged, encode_compact};
use log::{debug, error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Failure to persist the live aggregate.
#[derive(Debug)]
pub enum StoreError {
    Encode(serde_json::Error),
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode state: {err}"),
            Self::Repo(err) => write!(f, "failed to write state: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Owner of the live aggregate.
pub struct StateStore<R: StateRepository> {
    repo: R,
    state: StateAggregate,
    backed_up_unreadable: bool,
}

impl<R: StateRepository> StateStore<R> {
    /// Loads the stored aggregate merged onto defaults.
    ///
    /// Missing stored text and repository read errors yield fresh defaults.
    /// Stored text that does not decode also yields defaults, after it is
    /// copied to `STATE_BACKUP_KEY`.
    pub fn init(repo: R) -> Self {
        let raw = match repo.read_state(STATE_STORAGE_KEY) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=state_load module=store status=error error_code=state_read_failed error={}",
                    err
                );
                None
            }
        };

        let mut backed_up_unreadable = false;
        let state = match raw.as_deref() {
            None => StateAggregate::default(),
            Some(text) => match decode_merged(text) {
                Ok(state) => state,
                Err(err) => {
                    warn!(
                        "event=state_load module=store status=fallback reason=decode_failed error={}",
                        err
                    );
                    backed_up_unreadable = back_up_unreadable(&repo, text);
                    StateAggregate::default()
                }
            },
        };
        debug!(
            "event=state_load module=store status=ok stored={} tasks={} log={}",
            raw.is_some(),
            state.tasks.len(),
            state.log.len()
        );
        Self {
            repo,
            state,
            backed_up_unreadable,
        }
    }

    /// Whether `init` found undecodable stored text and saved it under
    /// `STATE_BACKUP_KEY`.
    pub fn backed_up_unreadable(&self) -> bool {
        self.backed_up_unreadable
    }

    /// Read access to the live aggregate.
    pub fn state(&self) -> &StateAggregate {
        &self.state
    }

    /// Mutable access for action handlers; callers persist afterwards.
    pub fn state_mut(&mut self) -> &mut StateAggregate {
        &mut self.state
    }

    /// Replaces the live aggregate wholesale.
    ///
    /// The history limit of the incoming aggregate is enforced on its log.
    pub fn replace(&mut self, mut state: StateAggregate) {
        enforce_limit(&mut state.log, state.systems.history_limit);
        self.state = state;
    }

    /// Writes the live aggregate to the repository.
    pub fn persist(&self) -> Result<(), StoreError> {
        let started_at = Instant::now();
        let encoded = encode_compact(&self.state).map_err(StoreError::Encode)?;
        match self.repo.write_state(STATE_STORAGE_KEY, &encoded) {
            Ok(()) => {
                debug!(
                    "event=state_persist module=store status=ok bytes={} duration_ms={}",
                    encoded.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=state_persist module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Persists one last time and hands the repository back.
    pub fn teardown(self) -> (R, Result<(), StoreError>) {
        let result = self.persist();
        (self.repo, result)
    }

    /// Borrow of the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }
}

fn back_up_unreadable<R: StateRepository>(repo: &R, text: &str) -> bool {
    match repo.write_state(STATE_BACKUP_KEY, text) {
        Ok(()) => {
            warn!(
                "event=state_backup module=store status=ok key={} bytes={}",
                STATE_BACKUP_KEY,
                text.len()
            );
            true
        }
        Err(err) => {
            error!(
                "event=state_backup module=store status=error key={} error={}",
                STATE_BACKUP_KEY, err
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StateStore;
    use crate::model::state::StateAggregate;
    use crate::repo::memory_repo::MemoryStateRepository;
    use crate::repo::state_repo::{STATE_BACKUP_KEY, STATE_STORAGE_KEY};

    #[test]
    fn init_on_empty_repository_uses_defaults() {
        let store = StateStore::init(MemoryStateRepository::new());
        assert_eq!(store.state(), &StateAggregate::default());
    }

    #[test]
    fn persist_then_init_restores_state() {
        let mut store = StateStore::init(MemoryStateRepository::new());
        store.state_mut().profile.gems = 42;
        store.persist().unwrap();

        let (repo, result) = store.teardown();
        result.unwrap();
        assert!(repo.raw(STATE_STORAGE_KEY).is_some());

        let reopened = StateStore::init(repo);
        assert_eq!(reopened.state().profile.gems, 42);
    }

    #[test]
    fn persist_failure_is_reported_and_memory_state_kept() {
        let repo = MemoryStateRepository::new();
        repo.set_reject_writes(true);
        let mut store = StateStore::init(repo);
        store.state_mut().profile.gems = 7;

        assert!(store.persist().is_err());
        assert_eq!(store.state().profile.gems, 7);
    }

    #[test]
    fn init_keeps_undecodable_text_under_backup_key() {
        let stored = r#"{"profile": {"level": 0}}"#;
        let repo = MemoryStateRepository::with_value(STATE_STORAGE_KEY, stored);
        let store = StateStore::init(repo);

        assert_eq!(store.state(), &StateAggregate::default());
        assert!(store.backed_up_unreadable());
        assert_eq!(
            store.repository().raw(STATE_BACKUP_KEY).as_deref(),
            Some(stored)
        );
    }

    #[test]
    fn init_with_decodable_text_writes_no_backup() {
        let store = StateStore::init(MemoryStateRepository::with_value(
            STATE_STORAGE_KEY,
            r#"{"profile": {"gems": 3}}"#,
        ));
        assert!(!store.backed_up_unreadable());
        assert_eq!(store.repository().raw(STATE_BACKUP_KEY), None);
    }
}
