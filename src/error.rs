//! Error types for navigation and coercion.

use std::path::PathBuf;

/// Boxed cause attached to a coercion failure.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced by the navigator and the coercion engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or empty path, missing key, index out of range, or a
    /// navigation step applied to the wrong kind of value.
    #[error("invalid key: {reason}")]
    InvalidKey { reason: String },

    /// A value could not be converted to the requested shape.
    #[error("can't parse [{value}] to be {target}")]
    Coercion {
        value: String,
        target: String,
        #[source]
        cause: Option<Cause>,
    },

    /// A value matched none of the members of an enumeration.
    #[error("enum {enum_name} has no member [{value}]")]
    Enum { enum_name: String, value: String },

    /// The requested target shape can never be produced.
    #[error("unsupported target {target}: {reason}")]
    Validation { target: String, reason: String },
}

impl Error {
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
        }
    }

    pub fn coercion(value: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Coercion {
            value: value.into(),
            target: target.into(),
            cause: None,
        }
    }

    pub fn coercion_caused_by(
        value: impl Into<String>,
        target: impl Into<String>,
        cause: impl Into<Cause>,
    ) -> Self {
        Self::Coercion {
            value: value.into(),
            target: target.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn enum_mismatch(enum_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Enum {
            enum_name: enum_name.into(),
            value: value.into(),
        }
    }

    pub fn validation(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Follow wrapped coercion causes down to the first failure.
    ///
    /// Record fields and list elements wrap the error of the nested value, so
    /// an unmatched enum deep inside a record surfaces as a `Coercion` whose
    /// innermost error is the `Enum` failure.
    pub fn innermost(&self) -> &Error {
        let mut current = self;
        while let Error::Coercion {
            cause: Some(cause), ..
        } = current
        {
            match cause.downcast_ref::<Error>() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }
}

/// Result type for navigation and coercion.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while turning YAML text into a document tree.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("file path can't be empty")]
    EmptyPath,

    #[error(".yaml and .yml are the only supported extensions: {0}")]
    UnsupportedExtension(PathBuf),

    #[error("can't read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("can't read an empty document")]
    Empty,

    #[error("invalid context document: {0}")]
    Context(#[from] Error),
}
