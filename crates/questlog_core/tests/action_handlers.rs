use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use questlog_core::{
    xp_needed, IntensityKey, MemoryStateRepository, Notice, ProgressService, ServiceError,
    StateAggregate, STATE_STORAGE_KEY,
};

fn service() -> ProgressService<MemoryStateRepository> {
    ProgressService::new(MemoryStateRepository::new())
}

fn service_with(stored: &str) -> ProgressService<MemoryStateRepository> {
    ProgressService::new(MemoryStateRepository::with_value(STATE_STORAGE_KEY, stored))
}

fn stored_raw(service: &ProgressService<MemoryStateRepository>) -> Option<String> {
    service.store().repository().raw(STATE_STORAGE_KEY)
}

#[test]
fn add_task_prepends_and_persists() {
    let mut service = service();
    service.add_task("First", IntensityKey::Light).unwrap();
    let outcome = service.add_task("  Second  ", IntensityKey::Epic).unwrap();

    let titles = service
        .state()
        .tasks
        .iter()
        .map(|task| task.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Second", "First"]);
    assert_eq!(service.state().tasks[0].done_count_today, 0);
    assert!(matches!(&outcome.notices[0], Notice::TaskAdded { title, .. } if title == "Second"));
    assert!(stored_raw(&service).unwrap().contains("Second"));
}

#[test]
fn add_task_with_blank_title_is_rejected_without_mutation() {
    let mut service = service();
    let err = service.add_task("   ", IntensityKey::Light).unwrap_err();

    assert!(matches!(err, ServiceError::EmptyTitle));
    assert!(err.is_rejection());
    assert!(service.state().tasks.is_empty());
    assert_eq!(stored_raw(&service), None);
}

#[test]
fn complete_task_rewards_records_history_and_keeps_task() {
    let mut service = service();
    service.add_task("Deep clean", IntensityKey::Intense).unwrap();
    let task_id = service.state().tasks[0].id.clone();

    let outcome = service.complete_task(&task_id);
    service.complete_task(&task_id);

    assert!(outcome.changed);
    let state = service.state();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.profile.xp, 380);
    assert_eq!(state.profile.gems, 6);
    assert_eq!(state.log.len(), 2);
    assert_eq!(state.log[0].id, task_id);
    assert_eq!(state.log[0].title, "Deep clean");
    assert_eq!(state.log[0].intensity, IntensityKey::Intense);
    assert_eq!((state.log[0].xp, state.log[0].gems), (190, 3));
}

#[test]
fn complete_unknown_task_is_a_silent_noop() {
    let mut service = service();
    let outcome = service.complete_task("t_missing");

    assert!(!outcome.changed);
    assert!(outcome.notices.is_empty());
    assert_eq!(service.state(), &StateAggregate::default());
}

#[test]
fn delete_task_removes_only_the_matching_task() {
    let mut service = service();
    service.add_task("Keep", IntensityKey::Light).unwrap();
    service.add_task("Drop", IntensityKey::Light).unwrap();
    let drop_id = service.state().tasks[0].id.clone();

    let outcome = service.delete_task(&drop_id);

    assert!(outcome.changed);
    assert_eq!(service.state().tasks.len(), 1);
    assert_eq!(service.state().tasks[0].title, "Keep");
}

#[test]
fn delete_nonexistent_task_leaves_list_unchanged() {
    let mut service = service();
    service.add_task("Keep", IntensityKey::Light).unwrap();
    let before = service.state().tasks.clone();

    let outcome = service.delete_task("t_nope");

    assert!(!outcome.changed);
    assert_eq!(service.state().tasks, before);
}

#[test]
fn complete_routine_rewards_and_never_removes_routine() {
    let mut service = service();
    let routines_before = service.state().systems.routines.clone();

    let outcome = service.complete_routine("rt_focus25");

    assert_eq!(
        outcome.notices,
        vec![Notice::RewardGranted {
            source_id: "rt_focus25".to_string(),
            title: "Focus 25 min (1 pomodoro)".to_string(),
            xp: 130,
            gems: 2,
        }]
    );
    assert_eq!(service.state().systems.routines, routines_before);
    assert_eq!(service.state().log[0].id, "rt_focus25");
}

#[test]
fn complete_unknown_routine_is_a_noop() {
    let mut service = service();
    assert!(!service.complete_routine("rt_unknown").changed);
    assert!(service.state().log.is_empty());
}

#[test]
fn reward_crossing_two_levels_reports_both_and_logs_only_granted_amounts() {
    let mut service = service_with(r#"{"profile": {"xp": 1900}}"#);
    service.add_task("Marathon", IntensityKey::Epic).unwrap();
    let task_id = service.state().tasks[0].id.clone();

    let outcome = service.complete_task(&task_id);

    assert_eq!(outcome.levels_reached(), vec![2, 3]);
    let state = service.state();
    assert_eq!(state.profile.level, 3);
    assert_eq!(state.profile.xp, 1900 + 260 - 500 - 1414);
    assert!(state.profile.xp < xp_needed(3, 500));
    assert_eq!(state.profile.gems, 4 + 10);
    assert_eq!((state.log[0].xp, state.log[0].gems), (260, 4));
}

#[test]
fn history_is_bounded_most_recent_first() {
    let mut service = service();
    for _ in 0..10 {
        service.complete_routine("rt_dishes");
    }
    assert_eq!(service.state().log.len(), 10);

    service.complete_routine("rt_read15");

    let log = &service.state().log;
    assert_eq!(log.len(), 10);
    assert_eq!(log[0].id, "rt_read15");
    assert_eq!(log.iter().filter(|entry| entry.id == "rt_dishes").count(), 9);
}

#[test]
fn purchase_with_insufficient_gems_is_rejected() {
    let mut service = service_with(r#"{"profile": {"gems": 9}}"#);
    let err = service.purchase("sh_coffee").unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InsufficientGems {
            available: 9,
            cost: 10
        }
    ));
    assert_eq!(service.state().profile.gems, 9);
}

#[test]
fn purchase_deducts_exact_cost() {
    let mut service = service_with(r#"{"profile": {"gems": 30}}"#);
    let outcome = service.purchase("sh_movie").unwrap();

    assert_eq!(service.state().profile.gems, 5);
    assert!(matches!(&outcome.notices[0], Notice::Purchased { cost: 25, .. }));
}

#[test]
fn purchase_with_exact_balance_is_accepted() {
    let mut service = service_with(r#"{"profile": {"gems": 10}}"#);
    service.purchase("sh_coffee").unwrap();
    assert_eq!(service.state().profile.gems, 0);
}

#[test]
fn purchases_are_not_recorded_in_history() {
    let mut service = service_with(r#"{"profile": {"gems": 100}}"#);
    service.purchase("sh_restaurant").unwrap();
    assert!(service.state().log.is_empty());
}

#[test]
fn purchase_of_unknown_item_is_rejected() {
    let mut service = service_with(r#"{"profile": {"gems": 100}}"#);
    let err = service.purchase("sh_yacht").unwrap_err();
    assert!(matches!(err, ServiceError::ShopItemNotFound(id) if id == "sh_yacht"));
    assert_eq!(service.state().profile.gems, 100);
}

#[test]
fn rename_profile_trims_and_defaults() {
    let mut service = service();
    service.rename_profile("  Ada ");
    assert_eq!(service.state().profile.name, "Ada");
    service.rename_profile("");
    assert_eq!(service.state().profile.name, "Player");
}

#[test]
fn export_then_import_reproduces_the_aggregate() {
    let mut source = service_with(r#"{"profile": {"gems": 50}}"#);
    source.add_task("Plan week", IntensityKey::Moderate).unwrap();
    let task_id = source.state().tasks[0].id.clone();
    source.complete_task(&task_id);
    source.complete_routine("rt_mobility");
    source.purchase("sh_coffee").unwrap();
    let before = source.state().clone();

    let export = source
        .export_state(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
        .unwrap();
    assert_eq!(export.file_name, "questlog-2026-10-17.json");
    assert!(export.contents.contains("\n  \"profile\""));

    let mut other = service();
    other.import_state(&export.contents).unwrap();
    assert_eq!(other.state(), &before);
}

#[test]
fn invalid_import_leaves_state_untouched() {
    let mut service = service();
    service.add_task("Keep me", IntensityKey::Light).unwrap();
    let before = service.state().clone();
    let raw_before = stored_raw(&service);

    let err = service.import_state("{ not json").unwrap_err();

    assert!(matches!(err, ServiceError::ImportFailed(_)));
    assert!(!err.is_rejection());
    assert_eq!(service.state(), &before);
    assert_eq!(stored_raw(&service), raw_before);
}

#[test]
fn partial_import_yields_full_aggregate() {
    let mut service = service();
    let outcome = service
        .import_state(r#"{"profile": {"name": "Imported", "gems": 3}}"#)
        .unwrap();

    assert_eq!(outcome.notices, vec![Notice::StateImported]);
    assert_eq!(service.state().profile.name, "Imported");
    assert_eq!(service.state().systems.shop.len(), 4);
}

#[test]
fn reset_restores_fresh_defaults() {
    let mut service = service();
    service.add_task("Temp", IntensityKey::Light).unwrap();
    service.complete_routine("rt_tidy_15");

    service.reset_state();

    assert_eq!(service.state(), &StateAggregate::default());
    let stored = stored_raw(&service).unwrap();
    assert!(!stored.contains("Temp"));
}

#[test]
fn persistence_failure_keeps_memory_state_and_notifies() {
    let mut service = service();
    service.store().repository().set_reject_writes(true);

    let outcome = service.complete_routine("rt_walk20");

    assert!(outcome.changed);
    assert!(outcome.persistence_failed());
    assert_eq!(service.state().profile.xp, 130);
    assert_eq!(stored_raw(&service), None);
}
