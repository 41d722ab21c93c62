//! Action handlers.
//!
//! # Responsibility
//! - Orchestrate progression rules, history ledger and state store into
//!   use-case entry points for UI layers.
//! - Translate persistence failures into user-facing notices.

pub mod progress_service;
