//! Typed bridge from coercion results to Rust values.
//!
//! [`FromYaml`] ties a Rust type to the [`TypeDescriptor`] it is coerced
//! through and converts the engine's [`Coerced`] result back into the type.
//! Records and enums declare their shape with [`yaml_record!`] and
//! [`yaml_enum!`].
//!
//! Nullability follows `Option`: `Option<T>` turns null into `None`, while a
//! bare `T` rejects null at the top level. Inside records a null simply
//! leaves a non-`Option` field at its default.
//!
//! [`yaml_record!`]: crate::yaml_record
//! [`yaml_enum!`]: crate::yaml_enum

mod macros;

use crate::coerce::{Coerced, Coercer, FieldDescriptor, ScalarKind, TemporalKind, TypeDescriptor};
use crate::context::CoercionContext;
use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

/// A type that can be produced by the coercion engine.
pub trait FromYaml: Sized {
    /// The shape requested from the engine.
    fn type_descriptor() -> TypeDescriptor;

    /// Whether the type has a null representation.
    fn nullable() -> bool {
        false
    }

    /// Convert the engine result into `Self`.
    fn from_coerced(coerced: Coerced) -> Result<Self>;
}

/// Validate, coerce and convert `value` into `T`.
pub fn from_value<T: FromYaml>(value: &Value, ctx: &CoercionContext, overlay: bool) -> Result<T> {
    let coerced = Coercer::new(ctx)
        .with_overlay(overlay)
        .coerce(value, &T::type_descriptor())?;
    T::from_coerced(coerced)
}

/// Error for an engine result of the wrong shape.
#[doc(hidden)]
pub fn unexpected(found: &Coerced, target: impl Into<String>) -> Error {
    let found = match found {
        Coerced::Null => "null".to_string(),
        other => serde_json::to_string(other).unwrap_or_else(|_| other.kind_name().to_string()),
    };
    Error::coercion(found, target)
}

impl FieldDescriptor {
    /// Describe a record field from an accessor, inferring its type.
    ///
    /// ```
    /// use typed_yaml::coerce::FieldDescriptor;
    ///
    /// struct Pet {
    ///     name: Option<String>,
    /// }
    ///
    /// let field = FieldDescriptor::of("name", |p: &Pet| &p.name);
    /// assert_eq!(field.declared_type.to_string(), "String");
    /// assert!(field.nullable);
    /// ```
    pub fn of<R, T, F>(name: &str, _accessor: F) -> Self
    where
        T: FromYaml,
        F: Fn(&R) -> &T,
    {
        FieldDescriptor::new(name, T::type_descriptor()).with_nullable(T::nullable())
    }
}

macro_rules! scalar_impl {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl FromYaml for $ty {
            fn type_descriptor() -> TypeDescriptor {
                TypeDescriptor::Scalar(ScalarKind::$kind)
            }

            fn from_coerced(coerced: Coerced) -> Result<Self> {
                match coerced {
                    Coerced::$kind(v) => Ok(v),
                    other => Err(unexpected(&other, ScalarKind::$kind.as_str())),
                }
            }
        }
    )*};
}

scalar_impl! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
}

impl FromYaml for String {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::String)
    }

    fn from_coerced(coerced: Coerced) -> Result<Self> {
        match coerced {
            Coerced::Text(s) => Ok(s),
            other => Err(unexpected(&other, ScalarKind::String.as_str())),
        }
    }
}

macro_rules! temporal_impl {
    ($($ty:ty => $kind:ident / $variant:ident),* $(,)?) => {$(
        impl FromYaml for $ty {
            fn type_descriptor() -> TypeDescriptor {
                TypeDescriptor::temporal(TemporalKind::$kind)
            }

            fn from_coerced(coerced: Coerced) -> Result<Self> {
                match coerced {
                    Coerced::$variant(v) => Ok(v),
                    other => Err(unexpected(&other, TemporalKind::$kind.as_str())),
                }
            }
        }
    )*};
}

temporal_impl! {
    NaiveDate => Date / Date,
    NaiveTime => Time / Time,
    NaiveDateTime => DateTime / DateTime,
    DateTime<FixedOffset> => ZonedDateTime / Zoned,
}

impl FromYaml for Value {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Any
    }

    fn nullable() -> bool {
        true
    }

    fn from_coerced(coerced: Coerced) -> Result<Self> {
        match coerced {
            Coerced::Raw(value) => Ok(value),
            Coerced::Null => Ok(Value::Null),
            other => Err(unexpected(&other, "Object")),
        }
    }
}

impl<T: FromYaml> FromYaml for Option<T> {
    fn type_descriptor() -> TypeDescriptor {
        T::type_descriptor()
    }

    fn nullable() -> bool {
        true
    }

    fn from_coerced(coerced: Coerced) -> Result<Self> {
        match coerced {
            Coerced::Null => Ok(None),
            other => T::from_coerced(other).map(Some),
        }
    }
}

fn convert_items<T: FromYaml>(items: Vec<Coerced>) -> Result<Vec<T>> {
    items.into_iter().map(T::from_coerced).collect()
}

impl<T: FromYaml> FromYaml for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::list_of(T::type_descriptor())
    }

    fn from_coerced(coerced: Coerced) -> Result<Self> {
        match coerced {
            Coerced::List(items) => convert_items(items),
            other => Err(unexpected(&other, Self::type_descriptor().to_string())),
        }
    }
}

impl<T: FromYaml> FromYaml for Box<[T]> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::array_of(T::type_descriptor())
    }

    fn from_coerced(coerced: Coerced) -> Result<Self> {
        match coerced {
            Coerced::Array(items) => convert_items(items.into_vec()).map(Vec::into_boxed_slice),
            other => Err(unexpected(&other, Self::type_descriptor().to_string())),
        }
    }
}

/// Fixed-size arrays require the list to have exactly `N` elements.
impl<T: FromYaml, const N: usize> FromYaml for [T; N] {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::array_of(T::type_descriptor())
    }

    fn from_coerced(coerced: Coerced) -> Result<Self> {
        let items = match coerced {
            Coerced::Array(items) => items,
            other => return Err(unexpected(&other, Self::type_descriptor().to_string())),
        };
        let len = items.len();
        convert_items::<T>(items.into_vec())?
            .try_into()
            .map_err(|_| {
                Error::coercion(
                    format!("list of {len} elements"),
                    format!("{}[{N}]", T::type_descriptor()),
                )
            })
    }
}

fn convert_entries<T, M>(entries: Vec<(String, Coerced)>) -> Result<M>
where
    T: FromYaml,
    M: FromIterator<(String, T)>,
{
    entries
        .into_iter()
        .map(|(key, value)| T::from_coerced(value).map(|v| (key, v)))
        .collect()
}

impl<T: FromYaml> FromYaml for HashMap<String, T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::map_of(T::type_descriptor())
    }

    fn from_coerced(coerced: Coerced) -> Result<Self> {
        match coerced {
            Coerced::Map(entries) => convert_entries::<T, _>(entries),
            other => Err(unexpected(&other, Self::type_descriptor().to_string())),
        }
    }
}

impl<T: FromYaml> FromYaml for BTreeMap<String, T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::map_of(T::type_descriptor())
    }

    fn from_coerced(coerced: Coerced) -> Result<Self> {
        match coerced {
            Coerced::Map(entries) => convert_entries::<T, _>(entries),
            other => Err(unexpected(&other, Self::type_descriptor().to_string())),
        }
    }
}

// Sets and tuples describe themselves so the engine can reject them.

impl<T: FromYaml + Eq + Hash> FromYaml for HashSet<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Abstract(format!("Set<{}>", T::type_descriptor()))
    }

    fn from_coerced(coerced: Coerced) -> Result<Self> {
        Err(unexpected(&coerced, Self::type_descriptor().to_string()))
    }
}

impl<T: FromYaml + Ord> FromYaml for BTreeSet<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Abstract(format!("SortedSet<{}>", T::type_descriptor()))
    }

    fn from_coerced(coerced: Coerced) -> Result<Self> {
        Err(unexpected(&coerced, Self::type_descriptor().to_string()))
    }
}

macro_rules! tuple_impl {
    ($($name:ident),+) => {
        impl<$($name: FromYaml),+> FromYaml for ($($name,)+) {
            fn type_descriptor() -> TypeDescriptor {
                TypeDescriptor::Tuple(vec![$($name::type_descriptor()),+])
            }

            fn from_coerced(coerced: Coerced) -> Result<Self> {
                Err(unexpected(&coerced, Self::type_descriptor().to_string()))
            }
        }
    };
}

tuple_impl!(A, B);
tuple_impl!(A, B, C);
tuple_impl!(A, B, C, D);
