//! Typed accessors over a document.
//!
//! [`YamlReader`] resolves key paths against a [`Document`] and hands out
//! [`YamlNode`]s; each node converts its value on request. Every accessor
//! returns `Ok(None)` for a null value.
//!
//! ```
//! use std::sync::Arc;
//! use typed_yaml::{CoercionContext, Document, YamlReader};
//!
//! let doc = Document::from_yaml_str("server:\n  port: '8080'\n  hosts: [a, b]").unwrap();
//! let reader = YamlReader::new(doc, Arc::new(CoercionContext::default()));
//!
//! assert_eq!(reader.get("server.port").unwrap().as_int().unwrap(), Some(8080));
//! let hosts: Option<Vec<String>> = reader.get("server.hosts").unwrap().as_list().unwrap();
//! assert_eq!(hosts.unwrap(), ["a", "b"]);
//! ```

use crate::coerce::{Coerced, Coercer, ScalarKind, TemporalKind, TypeDescriptor};
use crate::context::CoercionContext;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::keypath::Navigator;
use crate::overlay;
use crate::typed::{FromYaml, from_value};
use crate::value::{Value, describe};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;
use std::sync::Arc;

/// Entry point for reading typed values out of a document.
#[derive(Debug, Clone)]
pub struct YamlReader {
    document: Arc<Document>,
    ctx: Arc<CoercionContext>,
    overlay: bool,
}

impl YamlReader {
    pub fn new(document: Document, ctx: Arc<CoercionContext>) -> Self {
        Self {
            document: Arc::new(document),
            ctx,
            overlay: true,
        }
    }

    /// Enable or disable the environment overlay for navigation and records.
    pub fn with_overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn context(&self) -> &CoercionContext {
        &self.ctx
    }

    fn navigator(&self) -> Navigator<'_> {
        Navigator::new(self.ctx.environments()).with_overlay(self.overlay)
    }

    /// The whole document, without navigation.
    pub fn root(&self) -> YamlNode {
        self.node(self.document.root().clone())
    }

    /// Resolve `path`; a missing key or index is an error.
    pub fn get(&self, path: &str) -> Result<YamlNode> {
        let value = self.navigator().resolve(self.document.root(), path)?;
        Ok(self.node(value))
    }

    /// Resolve `path`; a missing key or index is `None`.
    pub fn lookup(&self, path: &str) -> Result<Option<YamlNode>> {
        let value = self.navigator().lookup(self.document.root(), path)?;
        Ok(value.map(|value| self.node(value)))
    }

    fn node(&self, value: Value) -> YamlNode {
        YamlNode {
            value,
            ctx: Arc::clone(&self.ctx),
            overlay: self.overlay,
        }
    }
}

/// A resolved value, ready to be converted.
#[derive(Debug, Clone)]
pub struct YamlNode {
    value: Value,
    ctx: Arc<CoercionContext>,
    overlay: bool,
}

impl YamlNode {
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// The raw value.
    pub fn as_value(&self) -> Result<Option<Value>> {
        Ok((!self.value.is_null()).then(|| self.value.clone()))
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    fn coercer(&self) -> Coercer<'_> {
        Coercer::new(&self.ctx).with_overlay(self.overlay)
    }

    fn typed<T: FromYaml>(&self, target: TypeDescriptor) -> Result<Option<T>> {
        if self.value.is_null() {
            return Ok(None);
        }
        match self.coercer().coerce(&self.value, &target)? {
            Coerced::Null => Ok(None),
            coerced => T::from_coerced(coerced).map(Some),
        }
    }

    fn scalar<T: FromYaml>(&self, kind: ScalarKind) -> Result<Option<T>> {
        self.typed(TypeDescriptor::Scalar(kind))
    }

    fn temporal<T: FromYaml>(&self, kind: TemporalKind, pattern: Option<&str>) -> Result<Option<T>> {
        self.typed(TypeDescriptor::temporal_with(kind, pattern))
    }

    pub fn as_string(&self) -> Result<Option<String>> {
        self.scalar(ScalarKind::String)
    }

    pub fn as_bool(&self) -> Result<Option<bool>> {
        self.scalar(ScalarKind::Bool)
    }

    pub fn as_byte(&self) -> Result<Option<i8>> {
        self.scalar(ScalarKind::Byte)
    }

    pub fn as_short(&self) -> Result<Option<i16>> {
        self.scalar(ScalarKind::Short)
    }

    pub fn as_int(&self) -> Result<Option<i32>> {
        self.scalar(ScalarKind::Int)
    }

    pub fn as_long(&self) -> Result<Option<i64>> {
        self.scalar(ScalarKind::Long)
    }

    pub fn as_float(&self) -> Result<Option<f32>> {
        self.scalar(ScalarKind::Float)
    }

    pub fn as_double(&self) -> Result<Option<f64>> {
        self.scalar(ScalarKind::Double)
    }

    /// Parse as a date, with `pattern` taking precedence over the context.
    pub fn as_local_date(&self, pattern: Option<&str>) -> Result<Option<NaiveDate>> {
        self.temporal(TemporalKind::Date, pattern)
    }

    pub fn as_local_time(&self, pattern: Option<&str>) -> Result<Option<NaiveTime>> {
        self.temporal(TemporalKind::Time, pattern)
    }

    pub fn as_local_date_time(&self, pattern: Option<&str>) -> Result<Option<NaiveDateTime>> {
        self.temporal(TemporalKind::DateTime, pattern)
    }

    pub fn as_zoned_date_time(&self, pattern: Option<&str>) -> Result<Option<DateTime<FixedOffset>>> {
        self.temporal(TemporalKind::ZonedDateTime, pattern)
    }

    pub fn as_list<T: FromYaml>(&self) -> Result<Option<Vec<T>>> {
        self.as_()
    }

    pub fn as_map<T: FromYaml>(&self) -> Result<Option<HashMap<String, T>>> {
        self.as_()
    }

    pub fn as_array<T: FromYaml>(&self) -> Result<Option<Box<[T]>>> {
        self.as_()
    }

    /// Convert to any [`FromYaml`] type, records and enums included.
    ///
    /// The target is validated before the value is inspected, so an
    /// unsupported type fails even for a null value.
    pub fn as_<T: FromYaml>(&self) -> Result<Option<T>> {
        let target = T::type_descriptor();
        crate::coerce::validate(&target)?;
        if self.value.is_null() {
            return Ok(None);
        }
        from_value::<T>(&self.value, &self.ctx, self.overlay).map(Some)
    }

    /// Coerce to a target described at runtime.
    pub fn coerce(&self, target: &TypeDescriptor) -> Result<Coerced> {
        self.coercer().coerce(&self.value, target)
    }

    /// Keys of the map at this node, after the overlay.
    pub fn keys(&self) -> Result<Vec<String>> {
        match &self.value {
            Value::Object(map) if self.overlay => Ok(overlay::entries(map, self.ctx.environments())
                .into_iter()
                .map(|(key, _)| key.to_string())
                .collect()),
            Value::Object(map) => Ok(map.keys().cloned().collect()),
            Value::Null => Ok(Vec::new()),
            other => Err(Error::coercion(describe(other), "Map")),
        }
    }
}
