//! Reply decoding for the engine's JSON-encoded pattern values
//!
//! The engine's JSON encoder cannot tell an empty array from an empty table
//! and writes `{}` for both, so an empty object is accepted wherever a list
//! is expected.

use qmore_core::domain::{IdentifierGroupPatterns, PriorityPattern};
use qmore_core::error::Result;
use serde_json::Value;
use std::collections::HashMap;

/// `{}` -> `[]`, anything else untouched
fn normalize_list(value: Value) -> Value {
    match value {
        Value::Object(map) if map.is_empty() => Value::Array(Vec::new()),
        other => other,
    }
}

/// Decode one group's JSON member list
pub fn decode_member_list(raw: &str) -> Result<Vec<String>> {
    let value = normalize_list(serde_json::from_str(raw)?);
    Ok(serde_json::from_value(value)?)
}

/// Decode the whole groups hash (field = group name, value = JSON list)
pub fn decode_identifier_groups(
    fields: HashMap<String, String>,
) -> Result<IdentifierGroupPatterns> {
    fields
        .into_iter()
        .map(|(name, raw)| Ok((name, decode_member_list(&raw)?)))
        .collect()
}

/// Decode one priority list element
pub fn decode_priority_pattern(raw: &str) -> Result<PriorityPattern> {
    let mut value: Value = serde_json::from_str(raw)?;
    if let Some(pattern) = value.get_mut("pattern") {
        *pattern = normalize_list(pattern.take());
    }
    Ok(serde_json::from_value(value)?)
}

/// Decode the priority list, preserving order
pub fn decode_priority_patterns(elements: Vec<String>) -> Result<Vec<PriorityPattern>> {
    elements
        .iter()
        .map(|raw| decode_priority_pattern(raw))
        .collect()
}

pub fn encode_member_list(members: &[String]) -> Result<String> {
    Ok(serde_json::to_string(members)?)
}

pub fn encode_priority_pattern(pattern: &PriorityPattern) -> Result<String> {
    Ok(serde_json::to_string(pattern)?)
}
