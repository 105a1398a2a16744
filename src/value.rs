//! The generic document tree.
//!
//! Documents are `serde_json::Value` trees built with `preserve_order`, so a
//! `Map` iterates in the order its keys appeared in the source YAML.

pub use serde_json::{Map, Number, Value};

/// Short name of a value's kind, used in navigation errors.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Canonical text of a value.
///
/// Scalars render as their literal text (`10`, `true`, `5.3`); lists and maps
/// render as compact JSON. Null has no text.
pub fn canonical_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Render a value for error messages.
pub fn describe(value: &Value) -> String {
    canonical_string(value).unwrap_or_else(|| "null".to_string())
}
