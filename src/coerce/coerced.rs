//! Dynamically typed coercion results.

use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// The result of coercing a value to a [`TypeDescriptor`](super::TypeDescriptor).
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
    List(Vec<Coerced>),
    Array(Box<[Coerced]>),
    /// Entries in document order.
    Map(Vec<(String, Coerced)>),
    Enum {
        name: String,
        member: String,
    },
    /// Fields present in the source map, keyed by field name.
    Record {
        name: String,
        fields: Vec<(String, Coerced)>,
    },
    Raw(Value),
}

impl Coerced {
    pub fn is_null(&self) -> bool {
        matches!(self, Coerced::Null)
    }

    /// Short name of the result kind, for conversion errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Coerced::Null => "null",
            Coerced::Bool(_) => "Boolean",
            Coerced::Byte(_) => "Byte",
            Coerced::Short(_) => "Short",
            Coerced::Int(_) => "Integer",
            Coerced::Long(_) => "Long",
            Coerced::Float(_) => "Float",
            Coerced::Double(_) => "Double",
            Coerced::Text(_) => "String",
            Coerced::Date(_) => "LocalDate",
            Coerced::Time(_) => "LocalTime",
            Coerced::DateTime(_) => "LocalDateTime",
            Coerced::Zoned(_) => "ZonedDateTime",
            Coerced::List(_) => "List",
            Coerced::Array(_) => "Array",
            Coerced::Map(_) => "Map",
            Coerced::Enum { .. } => "Enum",
            Coerced::Record { .. } => "Record",
            Coerced::Raw(_) => "Object",
        }
    }
}

impl Serialize for Coerced {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Coerced::Null => serializer.serialize_none(),
            Coerced::Bool(b) => serializer.serialize_bool(*b),
            Coerced::Byte(n) => serializer.serialize_i8(*n),
            Coerced::Short(n) => serializer.serialize_i16(*n),
            Coerced::Int(n) => serializer.serialize_i32(*n),
            Coerced::Long(n) => serializer.serialize_i64(*n),
            Coerced::Float(n) => serializer.serialize_f32(*n),
            Coerced::Double(n) => serializer.serialize_f64(*n),
            Coerced::Text(s) => serializer.serialize_str(s),
            Coerced::Date(d) => d.serialize(serializer),
            Coerced::Time(t) => t.serialize(serializer),
            Coerced::DateTime(dt) => dt.serialize(serializer),
            Coerced::Zoned(dt) => dt.serialize(serializer),
            Coerced::List(items) => serialize_items(items, serializer),
            Coerced::Array(items) => serialize_items(items, serializer),
            Coerced::Map(entries) | Coerced::Record { fields: entries, .. } => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Coerced::Enum { member, .. } => serializer.serialize_str(member),
            Coerced::Raw(value) => value.serialize(serializer),
        }
    }
}

fn serialize_items<S: Serializer>(items: &[Coerced], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}
