//! Raw state storage contracts and implementations.
//!
//! # Responsibility
//! - Read and write the serialized aggregate under a storage key.
//! - Isolate SQLite details from the state store and action handlers.
//!
//! # Invariants
//! - Repositories store text verbatim; decoding and merging live in `store`.
//! - Write failures are returned, never swallowed.

pub mod memory_repo;
pub mod state_repo;
