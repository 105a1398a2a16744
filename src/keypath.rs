//! Key paths and document navigation.
//!
//! A key path is a dot-separated list of segments. A segment is a map key,
//! a chain of list indices, or a map key followed by indices:
//!
//! - `server.port` - two map lookups
//! - `[0][1]` - two list lookups
//! - `hosts[2].name` - map lookup, list lookup, map lookup
//!
//! Each map lookup applies the environment overlay first when enabled, so
//! `url` resolves to `url@prod` when `prod` is the active environment.

use crate::error::{Error, Result};
use crate::overlay;
use crate::value::{Map, Value, describe, kind_name};
use regex_lite::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static INDEXED_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)((?:\[\d+\])+)$").expect("indexed segment pattern is valid")
});

static INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("index pattern is valid"));

/// One navigation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Field(String),
    Index(usize),
}

/// A parsed key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    steps: Vec<Step>,
}

impl KeyPath {
    /// Parse a key path.
    ///
    /// Fails on an empty path, an empty segment (`a..b`, `a.`) or an index
    /// that does not fit in `usize`.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::invalid_key("key can't be null or empty"));
        }

        let mut steps = Vec::new();
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(Error::invalid_key(format!(
                    "key [{path}] contains an empty segment"
                )));
            }

            match INDEXED_SEGMENT.captures(segment) {
                Some(caps) => {
                    let field = caps.get(1).map_or("", |m| m.as_str());
                    if !field.is_empty() {
                        steps.push(Step::Field(field.to_string()));
                    }
                    let indices = caps.get(2).map_or("", |m| m.as_str());
                    for index in INDEX.captures_iter(indices) {
                        let digits = &index[1];
                        let index = digits.parse::<usize>().map_err(|_| {
                            Error::invalid_key(format!("index [{digits}] is too large"))
                        })?;
                        steps.push(Step::Index(index));
                    }
                }
                None => steps.push(Step::Field(segment.to_string())),
            }
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Field(name) if i == 0 => write!(f, "{name}")?,
                Step::Field(name) => write!(f, ".{name}")?,
                Step::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Walks a document along a key path.
#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
    environments: &'a [String],
    overlay: bool,
}

#[derive(Debug)]
enum Missing {
    Key(String, String),
    Index(usize, String),
}

impl<'a> Navigator<'a> {
    pub fn new(environments: &'a [String]) -> Self {
        Self {
            environments,
            overlay: true,
        }
    }

    /// Enable or disable the environment overlay at map lookups.
    pub fn with_overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }

    /// Resolve a key path against `root`.
    pub fn resolve(&self, root: &Value, path: &str) -> Result<Value> {
        let path = KeyPath::parse(path)?;
        self.resolve_path(root, &path)
    }

    /// Resolve an already parsed key path.
    pub fn resolve_path(&self, root: &Value, path: &KeyPath) -> Result<Value> {
        match self.walk(root, path)? {
            Ok(value) => Ok(value.into_owned()),
            Err(Missing::Key(key, map)) => Err(Error::invalid_key(format!(
                "this key [{key}] does not exist in [{map}]"
            ))),
            Err(Missing::Index(index, list)) => Err(Error::invalid_key(format!(
                "this index [{index}] is out of the boundary of [{list}]"
            ))),
        }
    }

    /// Like [`resolve`](Self::resolve), but a missing key or index is `None`.
    ///
    /// Malformed paths and steps applied to the wrong kind of value are
    /// still errors.
    pub fn lookup(&self, root: &Value, path: &str) -> Result<Option<Value>> {
        let path = KeyPath::parse(path)?;
        Ok(self.walk(root, &path)?.ok().map(Cow::into_owned))
    }

    fn walk<'v>(
        &self,
        root: &'v Value,
        path: &KeyPath,
    ) -> Result<std::result::Result<Cow<'v, Value>, Missing>> {
        let mut current: Cow<'v, Value> = Cow::Borrowed(root);

        for step in path.steps() {
            debug!(step = ?step, "navigating");
            current = match step {
                Step::Field(key) => match self.field(current, key)? {
                    Ok(next) => next,
                    Err(missing) => return Ok(Err(missing)),
                },
                Step::Index(index) => match index_into(current, *index)? {
                    Ok(next) => next,
                    Err(missing) => return Ok(Err(missing)),
                },
            };
        }

        Ok(Ok(current))
    }

    fn field<'v>(
        &self,
        current: Cow<'v, Value>,
        key: &str,
    ) -> Result<std::result::Result<Cow<'v, Value>, Missing>> {
        let Some(map) = current.as_object() else {
            return Err(Error::invalid_key(format!(
                "can't look up [{key}]: this object [{}] can't be Map",
                describe(&current)
            )));
        };

        let Some((found, _)) = self.entry(map, key) else {
            return Ok(Err(Missing::Key(key.to_string(), self.render(map))));
        };
        let found = found.clone();

        Ok(Ok(match current {
            Cow::Borrowed(Value::Object(map)) => Cow::Borrowed(&map[&found]),
            Cow::Owned(Value::Object(mut map)) => Cow::Owned(map.remove(&found).unwrap_or_default()),
            _ => unreachable!("checked to be a map above"),
        }))
    }

    /// The stored entry holding `key`, read in place.
    fn entry<'m>(&self, map: &'m Map<String, Value>, key: &str) -> Option<(&'m String, &'m Value)> {
        if self.overlay {
            overlay::effective_entry(map, key, self.environments)
        } else {
            map.get_key_value(key)
        }
    }

    fn render(&self, map: &Map<String, Value>) -> String {
        if self.overlay && !self.environments.is_empty() {
            describe(&Value::Object(overlay::apply(map, self.environments)))
        } else {
            render_map(map)
        }
    }
}

fn index_into<'v>(
    current: Cow<'v, Value>,
    index: usize,
) -> Result<std::result::Result<Cow<'v, Value>, Missing>> {
    let len = match current.as_array() {
        Some(list) => list.len(),
        None => {
            return Err(Error::invalid_key(format!(
                "can't take index [{index}]: this object [{}] can't be list ({})",
                describe(&current),
                kind_name(&current)
            )));
        }
    };

    if index >= len {
        return Ok(Err(Missing::Index(index, describe(&current))));
    }

    Ok(Ok(match current {
        Cow::Borrowed(Value::Array(list)) => Cow::Borrowed(&list[index]),
        Cow::Owned(Value::Array(mut list)) => Cow::Owned(list.swap_remove(index)),
        _ => unreachable!("checked to be a list above"),
    }))
}

fn render_map(map: &Map<String, Value>) -> String {
    describe(&Value::Object(map.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_field_and_index_segments() {
        let path = KeyPath::parse("a.list[2][0].name").unwrap();
        assert_eq!(
            path.steps(),
            &[
                Step::Field("a".into()),
                Step::Field("list".into()),
                Step::Index(2),
                Step::Index(0),
                Step::Field("name".into()),
            ]
        );
        assert_eq!(path.to_string(), "a.list[2][0].name");
    }

    #[test]
    fn test_parse_pure_index_segment() {
        let path = KeyPath::parse("[0].a").unwrap();
        assert_eq!(path.steps(), &[Step::Index(0), Step::Field("a".into())]);
    }

    #[test]
    fn test_parse_rejects_empty_path_and_segments() {
        assert!(matches!(KeyPath::parse(""), Err(Error::InvalidKey { .. })));
        assert!(matches!(KeyPath::parse("a..b"), Err(Error::InvalidKey { .. })));
        assert!(matches!(KeyPath::parse("a."), Err(Error::InvalidKey { .. })));
    }

    #[test]
    fn test_parse_brackets_not_at_end_are_a_field_name() {
        let path = KeyPath::parse("a[0]b").unwrap();
        assert_eq!(path.steps(), &[Step::Field("a[0]b".into())]);
    }

    #[test]
    fn test_parse_rejects_huge_index() {
        let result = KeyPath::parse("a[99999999999999999999999]");
        assert!(matches!(result, Err(Error::InvalidKey { .. })));
    }

    #[test]
    fn test_resolve_map_then_list() {
        let doc = json!({"a": [10, 20, 30]});
        let nav = Navigator::new(&[]);
        assert_eq!(nav.resolve(&doc, "a.[1]").unwrap(), json!(20));
        assert_eq!(nav.resolve(&doc, "a[2]").unwrap(), json!(30));
    }

    #[test]
    fn test_resolve_list_then_map() {
        let doc = json!([{"a": "A"}]);
        let nav = Navigator::new(&[]);
        assert_eq!(nav.resolve(&doc, "[0].a").unwrap(), json!("A"));
    }

    #[test]
    fn test_resolve_nested_indices() {
        let doc = json!({"grid": [[1, 2], [3, 4]]});
        let nav = Navigator::new(&[]);
        assert_eq!(nav.resolve(&doc, "grid[1][0]").unwrap(), json!(3));
    }

    #[test]
    fn test_resolve_out_of_range() {
        let doc = json!({"a": [1, 2]});
        let nav = Navigator::new(&[]);
        let err = nav.resolve(&doc, "a.[5]").unwrap_err();
        assert!(matches!(err, Error::InvalidKey { .. }));
        assert!(err.to_string().contains("out of the boundary"));
    }

    #[test]
    fn test_resolve_missing_key() {
        let doc = json!({"text": "t"});
        let nav = Navigator::new(&[]);
        let err = nav.resolve(&doc, "missing").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_field_on_non_map() {
        let doc = json!({"a": 1});
        let nav = Navigator::new(&[]);
        let err = nav.resolve(&doc, "a.b").unwrap_err();
        assert!(matches!(err, Error::InvalidKey { .. }));
        assert!(err.to_string().contains("can't be Map"));
    }

    #[test]
    fn test_resolve_index_on_non_list() {
        let doc = json!({"a": {"b": 1}});
        let nav = Navigator::new(&[]);
        let err = nav.resolve(&doc, "a[0]").unwrap_err();
        assert!(matches!(err, Error::InvalidKey { .. }));
    }

    #[test]
    fn test_resolve_applies_overlay_at_every_level() {
        let doc = json!({
            "db@prod": {"host": "prod-db", "port@prod": 5433, "port": 5432},
            "db": {"host": "localhost", "port": 5432}
        });
        let environments = envs(&["prod"]);
        let nav = Navigator::new(&environments);
        assert_eq!(nav.resolve(&doc, "db.host").unwrap(), json!("prod-db"));
        assert_eq!(nav.resolve(&doc, "db.port").unwrap(), json!(5433));
    }

    #[test]
    fn test_overlay_walk_borrows_from_document() {
        let doc = json!({
            "db@prod": {"hosts": ["prod-a", "prod-b"]},
            "db": {"hosts": ["local"]},
            "filler": (0..1000).map(|i| json!({"n": i})).collect::<Vec<_>>(),
        });
        let environments = envs(&["prod"]);
        let nav = Navigator::new(&environments);
        let path = KeyPath::parse("db.hosts[1]").unwrap();

        let found = nav.walk(&doc, &path).unwrap().unwrap();
        assert!(matches!(found, Cow::Borrowed(_)));
        assert!(std::ptr::eq(found.as_ref(), &doc["db@prod"]["hosts"][1]));
    }

    #[test]
    fn test_overlay_hides_promoted_variant() {
        let doc = json!({"v@A": "A", "v@B": "B"});
        let environments = envs(&["A", "B"]);
        let nav = Navigator::new(&environments);
        assert_eq!(nav.resolve(&doc, "v").unwrap(), json!("A"));
        assert_eq!(nav.lookup(&doc, "v@A").unwrap(), None);
        assert_eq!(nav.resolve(&doc, "v@B").unwrap(), json!("B"));
    }

    #[test]
    fn test_resolve_without_overlay_sees_raw_keys() {
        let doc = json!({"v@A": "A", "v": "default"});
        let environments = envs(&["A"]);
        let nav = Navigator::new(&environments).with_overlay(false);
        assert_eq!(nav.resolve(&doc, "v").unwrap(), json!("default"));
        assert_eq!(nav.resolve(&doc, "v@A").unwrap(), json!("A"));
    }

    #[test]
    fn test_lookup_missing_is_none() {
        let doc = json!({"a": [1]});
        let nav = Navigator::new(&[]);
        assert_eq!(nav.lookup(&doc, "b").unwrap(), None);
        assert_eq!(nav.lookup(&doc, "a[3]").unwrap(), None);
        assert_eq!(nav.lookup(&doc, "a[0]").unwrap(), Some(json!(1)));
        assert!(nav.lookup(&doc, "a.b").is_err());
    }
}
