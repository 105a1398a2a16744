//! Context loading from config documents and the lazy shared cell.

use super::types::CoercionContext;
use crate::document::Document;
use crate::error::DocumentError;
use crate::keypath::Navigator;
use crate::typed::from_value;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Environment variable naming an environment to put first.
pub const ENV_OVERRIDE_VAR: &str = "TYPED_YAML_ENV";

const DATE_PATTERN_KEY: &str = "date-config.date-pattern";
const TIME_PATTERN_KEY: &str = "date-config.time-pattern";
const DATE_TIME_PATTERN_KEY: &str = "date-config.date-time-pattern";
const ZONED_PATTERN_KEY: &str = "date-config.zoned-date-time-pattern";
const ENVIRONMENTS_KEY: &str = "environments";

impl CoercionContext {
    /// Read a context from a config document.
    ///
    /// Keys are looked up without the environment overlay. Missing keys
    /// leave the setting unset; a key holding the wrong kind of value is an
    /// error.
    pub fn from_document(document: &Document) -> Result<Self, DocumentError> {
        let empty = CoercionContext::default();
        let navigator = Navigator::new(&[]).with_overlay(false);

        let read = |key: &str| -> Result<Option<String>, DocumentError> {
            match navigator.lookup(document.root(), key)? {
                Some(value) => Ok(from_value::<Option<String>>(&value, &empty, false)?),
                None => Ok(None),
            }
        };

        let mut builder = CoercionContext::builder();
        if let Some(pattern) = read(DATE_PATTERN_KEY)? {
            builder = builder.date_pattern(pattern);
        }
        if let Some(pattern) = read(TIME_PATTERN_KEY)? {
            builder = builder.time_pattern(pattern);
        }
        if let Some(pattern) = read(DATE_TIME_PATTERN_KEY)? {
            builder = builder.date_time_pattern(pattern);
        }
        if let Some(pattern) = read(ZONED_PATTERN_KEY)? {
            builder = builder.zoned_date_time_pattern(pattern);
        }

        if let Some(value) = navigator.lookup(document.root(), ENVIRONMENTS_KEY)? {
            let environments = from_value::<Option<Vec<String>>>(&value, &empty, false)?;
            builder = builder.environments(environments.unwrap_or_default());
        }

        Ok(builder.build())
    }

    /// Apply the `TYPED_YAML_ENV` override, if set.
    pub fn with_env_override(mut self) -> Self {
        if let Ok(environment) = std::env::var(ENV_OVERRIDE_VAR) {
            if !environment.is_empty() {
                debug!(environment = %environment, "environment override");
                self.prioritize(&environment);
            }
        }
        self
    }
}

/// Where a [`ContextCell`] loads its context from.
#[derive(Debug, Clone)]
pub enum ContextSource {
    /// No config document; defaults plus the env override.
    Defaults,
    /// A config YAML file.
    File(PathBuf),
    /// Inline config YAML text.
    Yaml(String),
    /// A context built by the caller.
    Fixed(CoercionContext),
}

/// A context loaded at most once, on first use, and shared afterwards.
///
/// Concurrent first callers block on the same initialization, so the
/// source is parsed once and nobody observes a partially built context.
#[derive(Debug)]
pub struct ContextCell {
    source: ContextSource,
    cell: OnceLock<Arc<CoercionContext>>,
}

impl ContextCell {
    pub const fn new(source: ContextSource) -> Self {
        Self {
            source,
            cell: OnceLock::new(),
        }
    }

    /// Get the shared context, loading it on first call.
    ///
    /// A source that fails to load is reported and replaced by defaults.
    pub fn get(&self) -> Arc<CoercionContext> {
        Arc::clone(self.cell.get_or_init(|| Arc::new(self.load())))
    }

    /// Whether the context has been loaded already.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    fn load(&self) -> CoercionContext {
        let loaded = match &self.source {
            ContextSource::Defaults => Ok(CoercionContext::default()),
            ContextSource::Fixed(ctx) => Ok(ctx.clone()),
            ContextSource::File(path) => Document::from_path(path)
                .and_then(|doc| CoercionContext::from_document(&doc)),
            ContextSource::Yaml(text) => Document::from_yaml_str(text)
                .and_then(|doc| CoercionContext::from_document(&doc)),
        };

        let ctx = loaded.unwrap_or_else(|e| {
            warn!(error = %e, source = ?self.source, "failed to load coercion context, using defaults");
            CoercionContext::default()
        });
        ctx.with_env_override()
    }
}

impl Default for ContextCell {
    fn default() -> Self {
        Self::new(ContextSource::Defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"
environments:
  - dev
  - prod
date-config:
  date-pattern: "%d/%m/%Y"
  time-pattern: "%H-%M"
"#;

    #[test]
    fn test_from_document_reads_all_keys() {
        let doc = Document::from_yaml_str(CONFIG).unwrap();
        let ctx = CoercionContext::from_document(&doc).unwrap();
        assert_eq!(ctx.environments(), &["dev", "prod"]);
        assert_eq!(ctx.date_pattern(), Some("%d/%m/%Y"));
        assert_eq!(ctx.time_pattern(), Some("%H-%M"));
        assert_eq!(ctx.date_time_pattern(), None);
        assert_eq!(ctx.zoned_date_time_pattern(), None);
    }

    #[test]
    fn test_from_document_missing_keys_are_defaults() {
        let doc = Document::from_yaml_str("other: 1").unwrap();
        let ctx = CoercionContext::from_document(&doc).unwrap();
        assert_eq!(ctx, CoercionContext::default());
    }

    #[test]
    fn test_from_document_reads_keys_without_overlay() {
        let doc = Document::from_yaml_str("environments@x: [a]\nenvironments: [b]").unwrap();
        let ctx = CoercionContext::from_document(&doc).unwrap();
        assert_eq!(ctx.environments(), &["b"]);
    }

    #[test]
    fn test_from_document_rejects_mistyped_environments() {
        let doc = Document::from_yaml_str("environments: {a: 1}").unwrap();
        assert!(CoercionContext::from_document(&doc).is_err());
    }

    #[test]
    fn test_cell_loads_file_once() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let cell = ContextCell::new(ContextSource::File(file.path().to_path_buf()));
        assert!(!cell.is_loaded());
        let first = cell.get();
        let second = cell.get();
        assert!(cell.is_loaded());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.date_pattern(), Some("%d/%m/%Y"));
    }

    #[test]
    fn test_cell_falls_back_to_defaults() {
        let cell = ContextCell::new(ContextSource::Yaml("environments: 5".to_string()));
        let ctx = cell.get();
        assert_eq!(ctx.date_pattern(), None);
    }

    #[test]
    fn test_cell_fixed_source() {
        let fixed = CoercionContext::builder().date_pattern("%Y").build();
        let cell = ContextCell::new(ContextSource::Fixed(fixed));
        assert_eq!(cell.get().date_pattern(), Some("%Y"));
    }
}
