//! Coercion context: environment priority and temporal patterns.
//!
//! A context is built once and shared read-only by every navigation and
//! coercion call. It comes from one of:
//! 1. **Builder** - `CoercionContext::builder()` for explicit setup
//! 2. **Document** - `CoercionContext::from_document()` reading a config YAML
//! 3. **Lazy cell** - `ContextCell` loading at most once on first use
//!
//! ## Config document keys
//! - `environments` - list of environment names, highest priority first
//! - `date-config.date-pattern` - pattern for dates
//! - `date-config.time-pattern` - pattern for times
//! - `date-config.date-time-pattern` - pattern for local date-times
//! - `date-config.zoned-date-time-pattern` - pattern for zoned date-times
//!
//! ## Environment Variables
//! - `TYPED_YAML_ENV` - environment moved to the front of the priority list

mod loader;
mod types;

pub use loader::{ContextCell, ENV_OVERRIDE_VAR, ContextSource};
pub use types::{CoercionContext, CoercionContextBuilder};
