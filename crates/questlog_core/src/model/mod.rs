//! Domain model for the progression engine.
//!
//! # Responsibility
//! - Define the canonical persisted shapes (profile, catalogs, tasks, history).
//! - Own default configuration and aggregate-level validation.
//!
//! # Invariants
//! - Every intensity key has exactly one tier in the catalog.
//! - `StateAggregate::log.len() <= systems.history_limit` after any mutation.
//! - A fresh default aggregate is built on every call and shares nothing with
//!   previously returned aggregates.

pub mod catalog;
pub mod history;
pub mod profile;
pub mod state;
pub mod task;
