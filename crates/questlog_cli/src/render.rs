//! Plain-text views over the live aggregate.

use chrono::Local;
use questlog_core::{progress_percent, title_for_level, xp_needed, Notice, StateAggregate};
use std::fmt::Write;

const XP_BAR_WIDTH: usize = 20;

pub fn profile(state: &StateAggregate) -> String {
    let profile = &state.profile;
    let base = state.systems.xp_curve_base;
    let needed = xp_needed(profile.level, base);
    let percent = progress_percent(profile, base);
    let filled = usize::from(percent) * XP_BAR_WIDTH / 100;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} | Level {} ({})",
        profile.name,
        profile.level,
        title_for_level(profile.level)
    );
    let _ = writeln!(
        out,
        "XP   {} / {} [{}{}] {}%",
        profile.xp,
        needed,
        "#".repeat(filled),
        ".".repeat(XP_BAR_WIDTH - filled),
        percent
    );
    let _ = writeln!(out, "Gems {}", profile.gems);
    out
}

pub fn tasks(state: &StateAggregate) -> String {
    if state.tasks.is_empty() {
        return "No tasks yet. Add one with `questlog task add <title>`.\n".to_string();
    }
    let mut out = String::new();
    for task in &state.tasks {
        let tier = state.systems.intensity.lookup(task.intensity);
        let _ = writeln!(
            out,
            "{}  {} [{}]  +{} XP / +{} gems",
            task.id, task.title, tier.label, tier.base_xp, tier.gems
        );
    }
    out
}

pub fn routines(state: &StateAggregate) -> String {
    let mut out = String::new();
    for routine in &state.systems.routines {
        let tier = state.systems.intensity.lookup(routine.intensity);
        let _ = writeln!(
            out,
            "{}  {} [{}]  +{} XP / +{} gems",
            routine.id, routine.title, tier.label, tier.base_xp, tier.gems
        );
    }
    out
}

pub fn shop(state: &StateAggregate) -> String {
    let mut out = String::new();
    for item in &state.systems.shop {
        let _ = writeln!(out, "{}  {}  {} gems", item.id, item.label, item.cost);
    }
    out
}

pub fn history(state: &StateAggregate) -> String {
    if state.log.is_empty() {
        return "No history yet.\n".to_string();
    }
    let mut out = String::new();
    for entry in &state.log {
        let _ = writeln!(
            out,
            "{}  {}  +{} XP / +{} gems",
            entry.date_iso.with_timezone(&Local).format("%d/%m %H:%M"),
            entry.title,
            entry.xp,
            entry.gems
        );
    }
    out
}

pub fn notices(notices: &[Notice]) -> String {
    notices.iter().map(|notice| format!("{notice}\n")).collect()
}
