//! Core progression engine for Questlog.
//! This crate is the single source of truth for reward, leveling, history and
//! persistence invariants; UI layers call into `ProgressService` and re-render
//! from `ProgressService::state`.

pub mod db;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod progression;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::catalog::{
    IntensityCatalog, IntensityKey, IntensityTier, Routine, ShopItem, UnknownIntensity,
};
pub use model::history::HistoryEntry;
pub use model::profile::{Profile, DEFAULT_PROFILE_NAME};
pub use model::state::{StateAggregate, StateValidationError, Systems};
pub use model::task::Task;
pub use progression::{
    award, progress_percent, title_for_level, xp_needed, LevelUp, LEVEL_UP_BONUS_GEMS,
};
pub use repo::memory_repo::MemoryStateRepository;
pub use repo::state_repo::{
    RepoError, RepoResult, SqliteStateRepository, StateRepository, STATE_BACKUP_KEY,
    STATE_STORAGE_KEY,
};
pub use service::progress_service::{
    ActionOutcome, ExportDocument, Notice, ProgressService, ServiceError,
};
pub use store::codec::{decode_merged, DecodeError};
pub use store::{StateStore, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
