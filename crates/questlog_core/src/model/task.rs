//! User-created repeatable task.
//!
//! # Invariants
//! - `id` is generated once and never reused for another task.
//! - Completing a task never removes it; only explicit deletion does.

use crate::model::catalog::IntensityKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task owned by the state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub intensity: IntensityKey,
    pub created_at: DateTime<Utc>,
    /// Carried for storage compatibility; completions do not change it.
    pub done_count_today: u32,
}

impl Task {
    /// Creates a task with a freshly generated id.
    ///
    /// Callers validate `title` first; this constructor stores it verbatim.
    pub fn new(
        title: impl Into<String>,
        intensity: IntensityKey,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::with_id(generate_task_id(), title, intensity, created_at)
    }

    /// Creates a task with a caller-provided id.
    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        intensity: IntensityKey,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            intensity,
            created_at,
            done_count_today: 0,
        }
    }
}

fn generate_task_id() -> String {
    format!("t_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::Task;
    use crate::model::catalog::IntensityKey;
    use chrono::Utc;

    #[test]
    fn new_tasks_get_distinct_prefixed_ids() {
        let now = Utc::now();
        let first = Task::new("a", IntensityKey::Light, now);
        let second = Task::new("a", IntensityKey::Light, now);
        assert!(first.id.starts_with("t_"));
        assert_ne!(first.id, second.id);
        assert_eq!(first.done_count_today, 0);
    }

    #[test]
    fn task_serializes_with_camel_case_fields() {
        let task = Task::with_id("t_1", "stretch", IntensityKey::Intense, Utc::now());
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["intensity"], "intense");
        assert_eq!(value["doneCountToday"], 0);
        assert!(value.get("createdAt").is_some());
    }
}
