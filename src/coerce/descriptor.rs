//! Target shapes requested from the engine.

use std::fmt;

/// Scalar targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl ScalarKind {
    /// Whether the kind has no null representation of its own.
    pub fn is_primitive(self) -> bool {
        !matches!(self, ScalarKind::String)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Bool => "Boolean",
            ScalarKind::Byte => "Byte",
            ScalarKind::Short => "Short",
            ScalarKind::Int => "Integer",
            ScalarKind::Long => "Long",
            ScalarKind::Float => "Float",
            ScalarKind::Double => "Double",
            ScalarKind::String => "String",
        }
    }
}

/// Date and time targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    Date,
    Time,
    DateTime,
    ZonedDateTime,
}

impl TemporalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TemporalKind::Date => "LocalDate",
            TemporalKind::Time => "LocalTime",
            TemporalKind::DateTime => "LocalDateTime",
            TemporalKind::ZonedDateTime => "ZonedDateTime",
        }
    }
}

/// An enumeration: its name and the exact member spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumDescriptor {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// Where a record's field list comes from.
///
/// Statically registered records hand out a function so that a record
/// containing itself (a `Person` with `children: Vec<Person>`) describes
/// itself without recursing forever.
#[derive(Clone)]
pub enum FieldSource {
    Static(fn() -> Vec<FieldDescriptor>),
    Inline(Vec<FieldDescriptor>),
}

impl fmt::Debug for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSource::Static(_) => f.write_str("Static(..)"),
            FieldSource::Inline(fields) => f.debug_tuple("Inline").field(fields).finish(),
        }
    }
}

/// A record type: a name and its ordered fields.
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    pub name: String,
    source: FieldSource,
}

impl RecordDescriptor {
    /// Address of the field function of a registered record. Two
    /// descriptors with the same name but different fields differ here.
    pub(crate) fn identity(&self) -> Option<usize> {
        match &self.source {
            FieldSource::Static(fields) => Some(*fields as usize),
            FieldSource::Inline(_) => None,
        }
    }

    /// A record whose fields are produced on demand.
    pub fn registered(name: impl Into<String>, fields: fn() -> Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Static(fields),
        }
    }

    /// A record with an explicit field list.
    pub fn inline(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Inline(fields),
        }
    }

    pub fn fields(&self) -> Vec<FieldDescriptor> {
        match &self.source {
            FieldSource::Static(fields) => fields(),
            FieldSource::Inline(fields) => fields.clone(),
        }
    }
}

/// One field of a record.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Key used when the alias is absent from the map.
    pub name: String,
    /// Preferred key; wins whenever present in the map.
    pub alias: Option<String>,
    pub declared_type: TypeDescriptor,
    pub nullable: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            alias: None,
            declared_type,
            nullable: true,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Non-nullable primitives can't represent an absent value.
    pub fn is_non_nullable_primitive(&self) -> bool {
        !self.nullable && matches!(self.declared_type, TypeDescriptor::Scalar(kind) if kind.is_primitive())
    }
}

/// The shape a value is coerced into.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    /// The value itself, untouched.
    Any,
    Scalar(ScalarKind),
    Temporal {
        kind: TemporalKind,
        pattern: Option<String>,
    },
    ListOf(Box<TypeDescriptor>),
    MapOf(Box<TypeDescriptor>),
    ArrayOf(Box<TypeDescriptor>),
    Enum(EnumDescriptor),
    Record(RecordDescriptor),
    /// Fixed-arity value tuples; never supported.
    Tuple(Vec<TypeDescriptor>),
    /// Interface-like collections other than lists and maps; never supported.
    Abstract(String),
}

impl TypeDescriptor {
    pub fn temporal(kind: TemporalKind) -> Self {
        TypeDescriptor::Temporal {
            kind,
            pattern: None,
        }
    }

    pub fn temporal_with(kind: TemporalKind, pattern: Option<&str>) -> Self {
        TypeDescriptor::Temporal {
            kind,
            pattern: pattern.map(str::to_string),
        }
    }

    pub fn list_of(elem: TypeDescriptor) -> Self {
        TypeDescriptor::ListOf(Box::new(elem))
    }

    pub fn map_of(elem: TypeDescriptor) -> Self {
        TypeDescriptor::MapOf(Box::new(elem))
    }

    pub fn array_of(elem: TypeDescriptor) -> Self {
        TypeDescriptor::ArrayOf(Box::new(elem))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Any => f.write_str("Object"),
            TypeDescriptor::Scalar(kind) => f.write_str(kind.as_str()),
            TypeDescriptor::Temporal { kind, .. } => f.write_str(kind.as_str()),
            TypeDescriptor::ListOf(elem) => write!(f, "List<{elem}>"),
            TypeDescriptor::MapOf(elem) => write!(f, "Map<String, {elem}>"),
            TypeDescriptor::ArrayOf(elem) => write!(f, "{elem}[]"),
            TypeDescriptor::Enum(desc) => f.write_str(&desc.name),
            TypeDescriptor::Record(desc) => f.write_str(&desc.name),
            TypeDescriptor::Tuple(elems) => {
                f.write_str("(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                f.write_str(")")
            }
            TypeDescriptor::Abstract(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested() {
        let desc = TypeDescriptor::map_of(TypeDescriptor::list_of(TypeDescriptor::Scalar(
            ScalarKind::Int,
        )));
        assert_eq!(desc.to_string(), "Map<String, List<Integer>>");
        assert_eq!(
            TypeDescriptor::array_of(TypeDescriptor::temporal(TemporalKind::Date)).to_string(),
            "LocalDate[]"
        );
    }

    #[test]
    fn test_non_nullable_primitive() {
        let int = FieldDescriptor::new("age", TypeDescriptor::Scalar(ScalarKind::Int));
        assert!(!int.is_non_nullable_primitive());
        assert!(int.clone().with_nullable(false).is_non_nullable_primitive());

        let text = FieldDescriptor::new("name", TypeDescriptor::Scalar(ScalarKind::String))
            .with_nullable(false);
        assert!(!text.is_non_nullable_primitive());
    }

    #[test]
    fn test_registered_record_fields_are_lazy() {
        fn fields() -> Vec<FieldDescriptor> {
            vec![FieldDescriptor::new(
                "children",
                TypeDescriptor::list_of(TypeDescriptor::Record(RecordDescriptor::registered(
                    "Node", fields,
                ))),
            )]
        }
        let node = RecordDescriptor::registered("Node", fields);
        let children = node.fields();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].declared_type.to_string(), "List<Node>");
    }
}
