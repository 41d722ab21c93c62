//! Progress use-case service.
//!
//! # Responsibility
//! - Task add/complete/delete, routine completion, shop purchase.
//! - Profile rename, import, reset and export of the whole aggregate.
//!
//! # Invariants
//! - Rejected actions leave the aggregate untouched and do not persist.
//! - Every accepted mutation is followed by exactly one `persist` call.
//! - Completions append one history entry with the granted reward only;
//!   purchases never touch history.
//! - No handler panics or propagates a persistence failure; it becomes a
//!   `Notice::PersistenceFailed` on the outcome.

use crate::ledger;
use crate::model::catalog::IntensityKey;
use crate::model::history::HistoryEntry;
use crate::model::state::StateAggregate;
use crate::model::task::Task;
use crate::progression::award;
use crate::repo::state_repo::StateRepository;
use crate::store::codec::{decode_merged, encode_pretty, export_file_name, DecodeError};
use crate::store::{StateStore, StoreError};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejections and failures surfaced to the caller.
#[derive(Debug)]
pub enum ServiceError {
    /// Task title is blank after trim.
    EmptyTitle,
    /// Purchase costs more than the current balance.
    InsufficientGems { available: u64, cost: u64 },
    /// No shop item with this id.
    ShopItemNotFound(String),
    /// Imported text could not become an aggregate; live state untouched.
    ImportFailed(DecodeError),
    /// Live aggregate could not be encoded for export.
    ExportFailed(serde_json::Error),
}

impl ServiceError {
    /// Whether this is a validation rejection (as opposed to an I/O-like failure).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::EmptyTitle | Self::InsufficientGems { .. } | Self::ShopItemNotFound(_)
        )
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::InsufficientGems { available, cost } => {
                write!(f, "not enough gems: have {available}, need {cost}")
            }
            Self::ShopItemNotFound(id) => write!(f, "shop item not found: {id}"),
            Self::ImportFailed(err) => write!(f, "invalid import file: {err}"),
            Self::ExportFailed(err) => write!(f, "export failed: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ImportFailed(err) => Some(err),
            Self::ExportFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// User-facing message produced by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    TaskAdded { task_id: String, title: String },
    TaskDeleted { task_id: String },
    RewardGranted { source_id: String, title: String, xp: u64, gems: u64 },
    LevelReached { level: u32, bonus_gems: u64 },
    Purchased { item_id: String, label: String, cost: u64 },
    ProfileRenamed { name: String },
    StateImported,
    StateReset,
    /// State changed in memory but may be lost on reload.
    PersistenceFailed { message: String },
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskAdded { title, .. } => write!(f, "Task added: {title}"),
            Self::TaskDeleted { .. } => write!(f, "Task deleted"),
            Self::RewardGranted { title, xp, gems, .. } => {
                write!(f, "{title}: +{xp} XP / +{gems} gems")
            }
            Self::LevelReached { level, bonus_gems } => {
                write!(f, "Level {level} reached! +{bonus_gems} gems")
            }
            Self::Purchased { label, cost, .. } => write!(f, "Purchased: {label} (-{cost} gems)"),
            Self::ProfileRenamed { name } => write!(f, "Profile renamed to {name}"),
            Self::StateImported => write!(f, "Import succeeded"),
            Self::StateReset => write!(f, "Local data reset"),
            Self::PersistenceFailed { message } => write!(
                f,
                "Could not save progress ({message}); changes may be lost on restart"
            ),
        }
    }
}

/// Result of one action handler call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Whether the live aggregate was mutated.
    pub changed: bool,
    pub notices: Vec<Notice>,
}

impl ActionOutcome {
    fn unchanged() -> Self {
        Self::default()
    }

    fn mutated(notices: Vec<Notice>) -> Self {
        Self {
            changed: true,
            notices,
        }
    }

    /// Level-ups reported by this outcome, in ascending order.
    pub fn levels_reached(&self) -> Vec<u32> {
        self.notices
            .iter()
            .filter_map(|notice| match notice {
                Notice::LevelReached { level, .. } => Some(*level),
                _ => None,
            })
            .collect()
    }

    /// Whether the mutation could not be written to storage.
    pub fn persistence_failed(&self) -> bool {
        self.notices
            .iter()
            .any(|notice| matches!(notice, Notice::PersistenceFailed { .. }))
    }
}

/// Export payload: pretty-printed aggregate plus suggested file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub contents: String,
}

/// Action handler facade over a state store.
pub struct ProgressService<R: StateRepository> {
    store: StateStore<R>,
}

impl<R: StateRepository> ProgressService<R> {
    /// Loads state from `repo` (or defaults) and wraps it.
    pub fn new(repo: R) -> Self {
        Self::from_store(StateStore::init(repo))
    }

    pub fn from_store(store: StateStore<R>) -> Self {
        Self { store }
    }

    /// Read access to the full live aggregate.
    pub fn state(&self) -> &StateAggregate {
        self.store.state()
    }

    /// Borrow of the underlying store.
    pub fn store(&self) -> &StateStore<R> {
        &self.store
    }

    /// Final persist; returns the repository.
    pub fn teardown(self) -> (R, Result<(), StoreError>) {
        self.store.teardown()
    }

    /// Creates a task at the front of the task list.
    pub fn add_task(
        &mut self,
        title: &str,
        intensity: IntensityKey,
    ) -> Result<ActionOutcome, ServiceError> {
        let title = title.trim();
        if title.is_empty() {
            info!("event=task_add module=service status=rejected reason=empty_title");
            return Err(ServiceError::EmptyTitle);
        }

        let task = Task::new(title, intensity, Utc::now());
        let notice = Notice::TaskAdded {
            task_id: task.id.clone(),
            title: task.title.clone(),
        };
        info!(
            "event=task_add module=service status=ok task_id={} intensity={}",
            task.id, intensity
        );
        self.store.state_mut().tasks.insert(0, task);
        Ok(self.commit(vec![notice]))
    }

    /// Rewards one completion of a task. Unknown ids are a no-op.
    ///
    /// The task stays in the list; tasks are repeatable.
    pub fn complete_task(&mut self, task_id: &str) -> ActionOutcome {
        let Some(task) = self.store.state().task(task_id) else {
            info!("event=task_complete module=service status=noop task_id={task_id}");
            return ActionOutcome::unchanged();
        };
        let (title, intensity) = (task.title.clone(), task.intensity);
        let notices = self.grant_reward(task_id, &title, intensity);
        info!("event=task_complete module=service status=ok task_id={task_id}");
        self.commit(notices)
    }

    /// Removes a task. Unknown ids are a no-op.
    pub fn delete_task(&mut self, task_id: &str) -> ActionOutcome {
        let tasks = &mut self.store.state_mut().tasks;
        let before = tasks.len();
        tasks.retain(|task| task.id != task_id);
        if tasks.len() == before {
            info!("event=task_delete module=service status=noop task_id={task_id}");
            return ActionOutcome::unchanged();
        }
        info!("event=task_delete module=service status=ok task_id={task_id}");
        self.commit(vec![Notice::TaskDeleted {
            task_id: task_id.to_string(),
        }])
    }

    /// Rewards one completion of a catalog routine. Unknown ids are a no-op.
    pub fn complete_routine(&mut self, routine_id: &str) -> ActionOutcome {
        let Some(routine) = self.store.state().routine(routine_id) else {
            info!(
                "event=routine_complete module=service status=noop routine_id={routine_id}"
            );
            return ActionOutcome::unchanged();
        };
        let (title, intensity) = (routine.title.clone(), routine.intensity);
        let notices = self.grant_reward(routine_id, &title, intensity);
        info!("event=routine_complete module=service status=ok routine_id={routine_id}");
        self.commit(notices)
    }

    /// Spends gems on a shop item.
    ///
    /// Purchases are not recorded in history.
    pub fn purchase(&mut self, item_id: &str) -> Result<ActionOutcome, ServiceError> {
        let Some(item) = self.store.state().shop_item(item_id).cloned() else {
            info!(
                "event=purchase module=service status=rejected reason=unknown_item item_id={item_id}"
            );
            return Err(ServiceError::ShopItemNotFound(item_id.to_string()));
        };

        let profile = &mut self.store.state_mut().profile;
        if profile.gems < item.cost {
            info!(
                "event=purchase module=service status=rejected reason=insufficient_gems item_id={} gems={} cost={}",
                item.id, profile.gems, item.cost
            );
            return Err(ServiceError::InsufficientGems {
                available: profile.gems,
                cost: item.cost,
            });
        }
        profile.gems -= item.cost;
        info!(
            "event=purchase module=service status=ok item_id={} cost={}",
            item.id, item.cost
        );
        Ok(self.commit(vec![Notice::Purchased {
            item_id: item.id,
            label: item.label,
            cost: item.cost,
        }]))
    }

    /// Sets the profile name; blank input restores the default name.
    pub fn rename_profile(&mut self, name: &str) -> ActionOutcome {
        let profile = &mut self.store.state_mut().profile;
        profile.rename(name);
        let name = profile.name.clone();
        info!("event=profile_rename module=service status=ok");
        self.commit(vec![Notice::ProfileRenamed { name }])
    }

    /// Replaces live state with `text` merged onto defaults.
    ///
    /// On failure the live aggregate is untouched.
    pub fn import_state(&mut self, text: &str) -> Result<ActionOutcome, ServiceError> {
        let state = match decode_merged(text) {
            Ok(state) => state,
            Err(err) => {
                warn!("event=state_import module=service status=rejected error={err}");
                return Err(ServiceError::ImportFailed(err));
            }
        };
        info!(
            "event=state_import module=service status=ok tasks={} log={}",
            state.tasks.len(),
            state.log.len()
        );
        self.store.replace(state);
        Ok(self.commit(vec![Notice::StateImported]))
    }

    /// Replaces live state with fresh defaults.
    ///
    /// Destructive; callers obtain user confirmation first.
    pub fn reset_state(&mut self) -> ActionOutcome {
        info!("event=state_reset module=service status=ok");
        self.store.replace(StateAggregate::default());
        self.commit(vec![Notice::StateReset])
    }

    /// Pretty-printed export of the live aggregate, named for `today`.
    pub fn export_state(&self, today: NaiveDate) -> Result<ExportDocument, ServiceError> {
        let contents = encode_pretty(self.store.state()).map_err(ServiceError::ExportFailed)?;
        let file_name = export_file_name(today);
        info!(
            "event=state_export module=service status=ok bytes={} file_name={}",
            contents.len(),
            file_name
        );
        Ok(ExportDocument {
            file_name,
            contents,
        })
    }

    fn grant_reward(
        &mut self,
        source_id: &str,
        title: &str,
        intensity: IntensityKey,
    ) -> Vec<Notice> {
        let state = self.store.state_mut();
        let tier = state.systems.intensity.lookup(intensity);
        let entry = HistoryEntry::for_reward(source_id, title, intensity, tier, Utc::now());
        let (xp, gems) = (tier.base_xp, tier.gems);

        let level_ups = award(&mut state.profile, xp, gems, state.systems.xp_curve_base);
        ledger::record(&mut state.log, entry, state.systems.history_limit);

        let mut notices = vec![Notice::RewardGranted {
            source_id: source_id.to_string(),
            title: title.to_string(),
            xp,
            gems,
        }];
        for level_up in level_ups {
            info!(
                "event=level_up module=service status=ok level={} bonus_gems={}",
                level_up.level, level_up.bonus_gems
            );
            notices.push(Notice::LevelReached {
                level: level_up.level,
                bonus_gems: level_up.bonus_gems,
            });
        }
        notices
    }

    fn commit(&mut self, mut notices: Vec<Notice>) -> ActionOutcome {
        if let Err(err) = self.store.persist() {
            notices.push(Notice::PersistenceFailed {
                message: err.to_string(),
            });
        }
        ActionOutcome::mutated(notices)
    }
}
