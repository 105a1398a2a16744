//! Type-directed coercion of document values.
//!
//! The engine takes a [`Value`] and a [`TypeDescriptor`] and produces a
//! [`Coerced`] result:
//! - Null converts to null for every target, never an error
//! - scalars follow lenient conversion rules (see [`ScalarKind`])
//! - dates and times resolve patterns in a fixed order (see `temporal`)
//! - lists, maps and arrays convert element by element
//! - enums match member spellings exactly
//! - records pick each field from its alias or its name, after applying
//!   the environment overlay to the record's map
//!
//! Unsupported targets are rejected by [`validate`] before any value is
//! looked at.

mod coerced;
mod descriptor;
mod scalar;
mod temporal;

pub use coerced::Coerced;
pub use descriptor::{
    EnumDescriptor, FieldDescriptor, FieldSource, RecordDescriptor, ScalarKind, TemporalKind,
    TypeDescriptor,
};

use crate::context::CoercionContext;
use crate::error::{Error, Result};
use crate::overlay;
use crate::value::{Value, canonical_string, describe};
use std::collections::HashSet;
use tracing::trace;

/// Coerce `value` to `target` with the environment overlay enabled.
pub fn coerce(value: &Value, target: &TypeDescriptor, ctx: &CoercionContext) -> Result<Coerced> {
    Coercer::new(ctx).coerce(value, target)
}

/// Reject targets that can never be produced.
///
/// Tuples and interface-like collections are unsupported. Records may not
/// declare non-nullable primitive fields. Element and field types are
/// checked recursively; each registered record is visited once.
pub fn validate(target: &TypeDescriptor) -> Result<()> {
    validate_inner(target, &mut HashSet::new())
}

fn validate_inner(target: &TypeDescriptor, seen: &mut HashSet<usize>) -> Result<()> {
    match target {
        TypeDescriptor::Tuple(_) => Err(Error::validation(
            target.to_string(),
            "tuples and record values are not supported",
        )),
        TypeDescriptor::Abstract(name) => Err(Error::validation(
            name.as_str(),
            "interfaces other than List and Map can not be initialized",
        )),
        TypeDescriptor::ListOf(elem) | TypeDescriptor::MapOf(elem) | TypeDescriptor::ArrayOf(elem) => {
            validate_inner(elem, seen)
        }
        TypeDescriptor::Record(record) => {
            // Registered records can refer to themselves; inline ones can't.
            if let Some(identity) = record.identity() {
                if !seen.insert(identity) {
                    return Ok(());
                }
            }
            for field in record.fields() {
                if field.is_non_nullable_primitive() {
                    return Err(primitive_field_error(record, &field));
                }
                validate_inner(&field.declared_type, seen)?;
            }
            Ok(())
        }
        TypeDescriptor::Any
        | TypeDescriptor::Scalar(_)
        | TypeDescriptor::Temporal { .. }
        | TypeDescriptor::Enum(_) => Ok(()),
    }
}

fn primitive_field_error(record: &RecordDescriptor, field: &FieldDescriptor) -> Error {
    Error::validation(
        format!("{}.{}", record.name, field.name),
        format!(
            "primitive types are not supported, declare [{} {}] as nullable",
            field.name, field.declared_type
        ),
    )
}

/// Coercion engine bound to a context.
#[derive(Debug, Clone, Copy)]
pub struct Coercer<'a> {
    ctx: &'a CoercionContext,
    overlay: bool,
}

impl<'a> Coercer<'a> {
    pub fn new(ctx: &'a CoercionContext) -> Self {
        Self { ctx, overlay: true }
    }

    /// Enable or disable the environment overlay on record maps.
    pub fn with_overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }

    /// Validate `target`, then coerce `value` to it.
    pub fn coerce(&self, value: &Value, target: &TypeDescriptor) -> Result<Coerced> {
        validate(target)?;
        self.convert(value, target)
    }

    fn convert(&self, value: &Value, target: &TypeDescriptor) -> Result<Coerced> {
        if value.is_null() {
            return Ok(Coerced::Null);
        }
        trace!(target = %target, "coercing");

        match target {
            TypeDescriptor::Any => Ok(Coerced::Raw(value.clone())),
            TypeDescriptor::Scalar(kind) => scalar::coerce_scalar(value, *kind),
            TypeDescriptor::Temporal { kind, pattern } => {
                temporal::coerce_temporal(value, *kind, pattern.as_deref(), self.ctx)
            }
            TypeDescriptor::ListOf(elem) => self.convert_items(value, target, elem).map(Coerced::List),
            TypeDescriptor::ArrayOf(elem) => self
                .convert_items(value, target, elem)
                .map(|items| Coerced::Array(items.into_boxed_slice())),
            TypeDescriptor::MapOf(elem) => self.convert_map(value, target, elem),
            TypeDescriptor::Enum(desc) => convert_enum(value, desc),
            TypeDescriptor::Record(record) => self.convert_record(value, record),
            TypeDescriptor::Tuple(_) | TypeDescriptor::Abstract(_) => {
                // validate() rejects these before conversion starts
                validate(target).map(|_| Coerced::Null)
            }
        }
    }

    fn convert_items(
        &self,
        value: &Value,
        target: &TypeDescriptor,
        elem: &TypeDescriptor,
    ) -> Result<Vec<Coerced>> {
        let Some(items) = value.as_array() else {
            return Err(Error::coercion(describe(value), "list"));
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                self.convert(item, elem).map_err(|e| {
                    Error::coercion_caused_by(describe(item), format!("element [{i}] of {target}"), e)
                })
            })
            .collect()
    }

    fn convert_map(
        &self,
        value: &Value,
        target: &TypeDescriptor,
        elem: &TypeDescriptor,
    ) -> Result<Coerced> {
        let Some(map) = value.as_object() else {
            return Err(Error::coercion(describe(value), "Map"));
        };

        let mut entries = Vec::with_capacity(map.len());
        for (key, item) in map {
            let coerced = self.convert(item, elem).map_err(|e| {
                Error::coercion_caused_by(describe(item), format!("entry [{key}] of {target}"), e)
            })?;
            entries.push((key.clone(), coerced));
        }
        Ok(Coerced::Map(entries))
    }

    /// Fields are collected into a fresh vector; a failing field discards
    /// everything converted so far.
    fn convert_record(&self, value: &Value, record: &RecordDescriptor) -> Result<Coerced> {
        let Some(map) = value.as_object() else {
            return Err(Error::coercion(describe(value), record.name.as_str()));
        };

        let environments = self.ctx.environments();
        let entry = |key: &str| {
            if self.overlay {
                overlay::effective_entry(map, key, environments)
            } else {
                map.get_key_value(key)
            }
        };

        let mut fields = Vec::new();
        for field in record.fields() {
            let found = field
                .alias
                .as_deref()
                .and_then(&entry)
                .or_else(|| entry(field.name.as_str()));
            let Some((_, source)) = found else {
                continue;
            };

            if field.is_non_nullable_primitive() {
                return Err(primitive_field_error(record, &field));
            }

            let coerced = self.convert(source, &field.declared_type).map_err(|e| {
                Error::coercion_caused_by(
                    describe(source),
                    format!(
                        "field [{} {}] of {}",
                        field.name, field.declared_type, record.name
                    ),
                    e,
                )
            })?;

            // Null leaves a non-nullable field at its default.
            if coerced.is_null() && !field.nullable {
                continue;
            }
            fields.push((field.name.clone(), coerced));
        }

        Ok(Coerced::Record {
            name: record.name.clone(),
            fields,
        })
    }
}

fn convert_enum(value: &Value, desc: &EnumDescriptor) -> Result<Coerced> {
    let text = canonical_string(value).unwrap_or_default();
    if desc.members.iter().any(|m| *m == text) {
        Ok(Coerced::Enum {
            name: desc.name.clone(),
            member: text,
        })
    } else {
        Err(Error::enum_mismatch(desc.name.as_str(), text))
    }
}
