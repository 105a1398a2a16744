//! Typed access to YAML documents.
//!
//! A parsed document is navigated with dotted key paths (`servers[0].host`),
//! environment-suffixed keys (`host@prod`) are resolved against a priority
//! list, and values are coerced into scalars, dates, collections, enums and
//! records.
//!
//! ```
//! use std::sync::Arc;
//! use typed_yaml::{CoercionContext, Document, YamlReader};
//!
//! let doc = Document::from_yaml_str("db:\n  host: localhost\n  host@prod: db.internal").unwrap();
//! let ctx = CoercionContext::builder().environment("prod").build();
//! let reader = YamlReader::new(doc, Arc::new(ctx));
//!
//! let host = reader.get("db.host").unwrap().as_string().unwrap();
//! assert_eq!(host.as_deref(), Some("db.internal"));
//! ```

pub mod cli;
pub mod coerce;
pub mod context;
pub mod document;
pub mod error;
pub mod keypath;
pub mod logging;
pub mod overlay;
pub mod reader;
pub mod typed;
pub mod value;

pub use coerce::{Coerced, Coercer, TypeDescriptor, coerce};
pub use context::{CoercionContext, ContextCell, ContextSource};
pub use document::Document;
pub use error::{DocumentError, Error, Result};
pub use keypath::{KeyPath, Navigator};
pub use reader::{YamlNode, YamlReader};
pub use typed::{FromYaml, from_value};
pub use value::Value;
