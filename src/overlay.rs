//! Environment overlay for `key@env` map entries.
//!
//! A map may carry several variants of one key, each suffixed with the
//! environment it applies to:
//!
//! ```yaml
//! url: http://localhost
//! url@staging: https://staging.example.com
//! url@prod: https://example.com
//! ```
//!
//! Given an ordered environment list (first = highest priority), the overlay
//! promotes the variant of the first environment that has one to the plain
//! key. Variants of lower-priority environments for an already promoted key
//! stay in the map untouched. Keys with no matching variant keep their
//! original value. A promoted key that was not in the map before lands after
//! all existing keys.

use crate::value::{Map, Value};
use regex_lite::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

static ENV_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+@.+$").expect("environment key pattern is valid"));

/// Apply the environment overlay to a map, returning a new map.
///
/// The input map is never modified, so one parsed document can be read
/// repeatedly and from several threads. A promoted key keeps the position of
/// an existing plain key; a plain key that did not exist before is appended
/// after the original entries.
///
/// # Example
/// ```
/// use serde_json::json;
/// use typed_yaml::overlay::apply;
///
/// let map = json!({"v@A": "A", "v@B": "B", "v": "default"});
/// let map = map.as_object().unwrap();
///
/// let result = apply(map, &["B".to_string(), "A".to_string()]);
/// assert_eq!(result["v"], json!("B"));
/// assert_eq!(result["v@A"], json!("A"));
/// ```
pub fn apply(map: &Map<String, Value>, environments: &[String]) -> Map<String, Value> {
    entries(map, environments)
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Apply the overlay to an optional map; `None` passes through.
pub fn apply_opt(
    map: Option<&Map<String, Value>>,
    environments: &[String],
) -> Option<Map<String, Value>> {
    map.map(|m| apply(m, environments))
}

/// The entries [`apply`] would produce, borrowed from `map`.
pub fn entries<'m>(
    map: &'m Map<String, Value>,
    environments: &[String],
) -> Vec<(&'m str, &'m Value)> {
    let promoted = promotions(map, environments);
    if promoted.is_empty() {
        return map.iter().map(|(key, value)| (key.as_str(), value)).collect();
    }

    let sources: HashSet<&str> = promoted.iter().map(|(_, source)| *source).collect();
    let by_base: HashMap<&str, &str> = promoted.iter().copied().collect();
    let mut result = Vec::with_capacity(map.len());
    for (key, value) in map {
        if sources.contains(key.as_str()) {
            continue;
        }
        match by_base.get(key.as_str()) {
            Some(source) => result.push((key.as_str(), &map[*source])),
            None => result.push((key.as_str(), value)),
        }
    }
    for (base, source) in &promoted {
        if !map.contains_key(*base) || sources.contains(base) {
            result.push((*base, &map[*source]));
        }
    }
    result
}

/// Find the entry that holds the overlaid value of `key`.
///
/// Gives the same answer as looking `key` up in [`apply`]'s result, but
/// reads `map` in place. The returned key is the one stored in `map`, which
/// is `key@env` when a variant won.
pub fn effective_entry<'m>(
    map: &'m Map<String, Value>,
    key: &str,
    environments: &[String],
) -> Option<(&'m String, &'m Value)> {
    if let Some(environment) = winning_environment(map, key, environments) {
        return map.get_key_value(format!("{key}@{environment}").as_str());
    }
    if is_promoted_source(map, key, environments) {
        return None;
    }
    map.get_key_value(key)
}

/// Base key and the variant it takes its value from, in promotion order.
fn promotions<'m>(map: &'m Map<String, Value>, environments: &[String]) -> Vec<(&'m str, &'m str)> {
    let candidates: Vec<&String> = map.keys().filter(|k| ENV_KEY.is_match(k)).collect();
    let mut promoted = Vec::new();
    if candidates.is_empty() {
        return promoted;
    }

    let mut bases = HashSet::new();
    for environment in environments.iter().filter(|e| !e.is_empty()) {
        let suffix = format!("@{environment}");
        for key in &candidates {
            let Some(base) = key.strip_suffix(suffix.as_str()) else {
                continue;
            };
            if base.is_empty() || !bases.insert(base) {
                continue;
            }
            debug!(key = %key, base = %base, "promoting environment key");
            promoted.push((base, key.as_str()));
        }
    }
    promoted
}

/// The highest-priority environment with a `base@env` variant in `map`.
fn winning_environment<'e>(
    map: &Map<String, Value>,
    base: &str,
    environments: &'e [String],
) -> Option<&'e str> {
    if base.is_empty() {
        return None;
    }
    environments
        .iter()
        .filter(|e| !e.is_empty())
        .map(String::as_str)
        .find(|environment| {
            let variant = format!("{base}@{environment}");
            ENV_KEY.is_match(&variant) && map.contains_key(&variant)
        })
}

/// Whether `key` is a variant that the overlay moves onto its base key.
fn is_promoted_source(map: &Map<String, Value>, key: &str, environments: &[String]) -> bool {
    if !ENV_KEY.is_match(key) {
        return false;
    }
    environments.iter().filter(|e| !e.is_empty()).any(|environment| {
        key.strip_suffix(format!("@{environment}").as_str())
            .is_some_and(|base| {
                winning_environment(map, base, environments) == Some(environment.as_str())
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn overlay(value: Value, environments: &[&str]) -> Value {
        Value::Object(apply(value.as_object().unwrap(), &envs(environments)))
    }

    #[test]
    fn test_first_environment_wins() {
        let map = json!({"v@A": "A", "v@B": "B", "v@C": "C"});
        let result = overlay(map, &["A", "B", "C"]);
        assert_eq!(result["v"], json!("A"));
    }

    #[test]
    fn test_priority_order_decides() {
        let map = json!({"v@A": "A", "v@B": "B", "v@C": "C"});
        let result = overlay(map, &["B", "C", "A"]);
        assert_eq!(result["v"], json!("B"));
    }

    #[test]
    fn test_falls_through_to_next_environment() {
        let map = json!({"v@B": "B", "v@C": "C"});
        let result = overlay(map, &["A", "B", "C"]);
        assert_eq!(result["v"], json!("B"));
    }

    #[test]
    fn test_environment_overrides_plain_key() {
        let map = json!({"v@A": "A", "v@B": "B", "v": "default"});
        let result = overlay(map, &["A", "B", "C"]);
        assert_eq!(result["v"], json!("A"));
    }

    #[test]
    fn test_plain_key_kept_when_no_environment_matches() {
        let map = json!({"v@D": "D", "v": "default"});
        let result = overlay(map, &["A", "B", "C"]);
        assert_eq!(result["v"], json!("default"));
        assert_eq!(result["v@D"], json!("D"));
    }

    #[test]
    fn test_promoted_key_removed_lower_priority_kept() {
        let map = json!({"v@A": "A", "v@B": "B"});
        let result = overlay(map, &["A", "B"]);
        let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["v@B", "v"]);
    }

    #[test]
    fn test_new_plain_key_appended_existing_keeps_position() {
        let map = json!({"a@prod": 1, "b": 2, "c": 3, "c@prod": 4, "d": 5});
        let result = overlay(map, &["prod"]);
        let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "c", "d", "a"]);
        assert_eq!(result["a"], json!(1));
        assert_eq!(result["c"], json!(4));
    }

    #[test]
    fn test_effective_entry_matches_apply() {
        let map = json!({
            "v@A": "A", "v@B": "B", "v": "default",
            "w@B": "wB", "plain": 1, "x@D": "D",
        });
        let object = map.as_object().unwrap();
        let environments = envs(&["A", "B"]);
        let applied = apply(object, &environments);

        for key in ["v", "v@A", "v@B", "w", "w@B", "plain", "x", "x@D", "missing", ""] {
            let found = effective_entry(object, key, &environments).map(|(_, value)| value);
            assert_eq!(found, applied.get(key), "key {key:?}");
        }
    }

    #[test]
    fn test_effective_entry_reports_stored_key() {
        let map = json!({"v@B": "B", "v": "default"});
        let (key, value) = effective_entry(map.as_object().unwrap(), "v", &envs(&["A", "B"])).unwrap();
        assert_eq!(key, "v@B");
        assert_eq!(value, &json!("B"));
    }

    #[test]
    fn test_entries_borrow_input() {
        let map = json!({"v@A": "A", "other": 1});
        let object = map.as_object().unwrap();
        let entries = entries(object, &envs(&["A"]));
        assert_eq!(entries.len(), 2);
        assert!(std::ptr::eq(entries[1].1, &object["v@A"]));
    }

    #[test]
    fn test_multiple_keys_and_environments() {
        let map = json!({"key1@dev": "value1", "key2@prod": "value2", "key3@dev": "value3"});
        let result = overlay(map, &["dev", "prod"]);
        assert_eq!(
            result,
            json!({"key1": "value1", "key2": "value2", "key3": "value3"})
        );
    }

    #[test]
    fn test_no_environments_is_noop() {
        let map = json!({"v@A": "A", "v": "default"});
        let result = overlay(map.clone(), &[]);
        assert_eq!(result, map);
    }

    #[test]
    fn test_no_suffixed_keys_is_noop() {
        let map = json!({"key1": "value1", "key2": "value2"});
        let result = overlay(map.clone(), &["dev", "prod"]);
        assert_eq!(result, map);
    }

    #[test]
    fn test_input_map_untouched() {
        let map = json!({"v@A": "A"});
        let object = map.as_object().unwrap();
        let _ = apply(object, &envs(&["A"]));
        assert!(object.contains_key("v@A"));
        assert!(!object.contains_key("v"));
    }

    #[test]
    fn test_absent_map_passes_through() {
        assert!(apply_opt(None, &envs(&["A"])).is_none());
    }
}
