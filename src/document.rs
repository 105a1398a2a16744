//! Decoding YAML text into a document tree.

use crate::error::DocumentError;
use crate::value::Value;
use std::path::Path;

/// A decoded YAML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Decode YAML text. An empty document is an error.
    pub fn from_yaml_str(text: &str) -> Result<Self, DocumentError> {
        if text.trim().is_empty() {
            return Err(DocumentError::Empty);
        }
        let root: Value = serde_yaml::from_str(text)?;
        if root.is_null() {
            return Err(DocumentError::Empty);
        }
        Ok(Self { root })
    }

    /// Read and decode a `.yaml` or `.yml` file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(DocumentError::EmptyPath);
        }

        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if !supported {
            return Err(DocumentError::UnsupportedExtension(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Wrap an already decoded tree.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::from_value(root)
    }
}
