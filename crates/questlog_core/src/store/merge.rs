//! Merge of stored documents onto current defaults.
//!
//! `serde_json::Value` is the tagged union the rule is written against:
//! objects merge key-wise, every other shape (array, string, number, bool,
//! null) replaces the default wholesale.

use serde_json::Value;

/// Merges `incoming` onto `base` in place.
///
/// - Both objects: recurse per incoming key; keys only in `base` are kept.
/// - Anything else: `incoming` replaces `base`. Arrays are never merged
///   element-wise, and an object replacing a non-object is taken as-is.
pub fn merge_onto(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (Value::Object(base_fields), Value::Object(incoming_fields)) => {
            for (key, incoming_value) in incoming_fields {
                match base_fields.get_mut(&key) {
                    Some(base_value) => merge_onto(base_value, incoming_value),
                    None => {
                        base_fields.insert(key, incoming_value);
                    }
                }
            }
        }
        (base, incoming) => *base = incoming,
    }
}
