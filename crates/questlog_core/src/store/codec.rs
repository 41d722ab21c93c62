//! Decoding, merging and encoding of stored aggregates.
//!
//! # Responsibility
//! - Turn stored/imported text into a validated `StateAggregate`.
//! - Produce the pretty-printed export document and its file name.
//!
//! # Invariants
//! - Decoding works on a temporary value; callers only see a complete,
//!   validated aggregate or an error.
//! - Decoded aggregates respect `log.len() <= history_limit`.

use crate::ledger::enforce_limit;
use crate::model::state::{StateAggregate, StateValidationError};
use crate::store::merge::merge_onto;
use chrono::NaiveDate;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Prefix of exported file names (`questlog-YYYY-MM-DD.json`).
pub const EXPORT_FILE_PREFIX: &str = "questlog";

/// Reason stored or imported text cannot become an aggregate.
#[derive(Debug)]
pub enum DecodeError {
    /// Text is not JSON.
    Syntax(serde_json::Error),
    /// Top-level JSON value is not an object.
    NotAnObject,
    /// Merged document does not fit the aggregate schema.
    Schema(serde_json::Error),
    Invalid(StateValidationError),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(err) => write!(f, "malformed JSON: {err}"),
            Self::NotAnObject => write!(f, "top-level JSON value must be an object"),
            Self::Schema(err) => write!(f, "unexpected state shape: {err}"),
            Self::Invalid(err) => write!(f, "invalid state: {err}"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Syntax(err) | Self::Schema(err) => Some(err),
            Self::NotAnObject => None,
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<StateValidationError> for DecodeError {
    fn from(value: StateValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Decodes `text` merged onto a fresh default aggregate.
///
/// Keys missing from `text` keep their default values; keys present replace
/// or merge into them (see `merge_onto`).
pub fn decode_merged(text: &str) -> Result<StateAggregate, DecodeError> {
    let incoming: Value = serde_json::from_str(text).map_err(DecodeError::Syntax)?;
    if !incoming.is_object() {
        return Err(DecodeError::NotAnObject);
    }

    let mut merged =
        serde_json::to_value(StateAggregate::default()).map_err(DecodeError::Schema)?;
    merge_onto(&mut merged, incoming);

    let mut state: StateAggregate =
        serde_json::from_value(merged).map_err(DecodeError::Schema)?;
    state.validate()?;
    enforce_limit(&mut state.log, state.systems.history_limit);
    Ok(state)
}

/// Compact encoding used for storage writes.
pub fn encode_compact(state: &StateAggregate) -> serde_json::Result<String> {
    serde_json::to_string(state)
}

/// Pretty-printed encoding used for exports.
pub fn encode_pretty(state: &StateAggregate) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}

/// File name for an export produced on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}-{}.json", date.format("%Y-%m-%d"))
}
