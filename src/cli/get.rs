//! Get subcommand: resolve a key path and print it as the requested type.

use crate::document::Document;
use crate::context::CoercionContext;
use crate::reader::{YamlNode, YamlReader};
use clap::{Args, ValueEnum};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

/// Target kinds accepted by `--as`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ValueKind {
    String,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Date,
    Time,
    #[value(name = "datetime")]
    DateTime,
    Zoned,
    /// The raw value, printed as JSON (default)
    #[default]
    Value,
}

/// Arguments for the get subcommand
#[derive(Args, Debug)]
pub struct GetArgs {
    /// YAML document (.yaml or .yml)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Key path such as `server.hosts[0]`; the whole document when omitted
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Type to coerce the value to
    #[arg(long = "as", value_enum, default_value_t = ValueKind::Value)]
    pub kind: ValueKind,

    /// chrono format pattern for date and time kinds
    #[arg(long, value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Read keys literally, without the environment overlay
    #[arg(long)]
    pub no_overlay: bool,
}

/// Run the subcommand and return the text to print.
pub fn run(args: &GetArgs, ctx: Arc<CoercionContext>) -> anyhow::Result<String> {
    let reader = YamlReader::new(Document::from_path(&args.file)?, ctx).with_overlay(!args.no_overlay);
    let node = match args.path.as_deref() {
        None | Some("") => reader.root(),
        Some(path) => reader.get(path)?,
    };
    render(&node, args.kind, args.pattern.as_deref())
}

fn render(node: &YamlNode, kind: ValueKind, pattern: Option<&str>) -> anyhow::Result<String> {
    Ok(match kind {
        ValueKind::String => text(node.as_string()?),
        ValueKind::Bool => text(node.as_bool()?),
        ValueKind::Byte => text(node.as_byte()?),
        ValueKind::Short => text(node.as_short()?),
        ValueKind::Int => text(node.as_int()?),
        ValueKind::Long => text(node.as_long()?),
        ValueKind::Float => text(node.as_float()?),
        ValueKind::Double => text(node.as_double()?),
        ValueKind::Date => text(node.as_local_date(pattern)?),
        ValueKind::Time => text(node.as_local_time(pattern)?),
        ValueKind::DateTime => text(node.as_local_date_time(pattern)?),
        ValueKind::Zoned => text(node.as_zoned_date_time(pattern)?.map(|dt| dt.to_rfc3339())),
        ValueKind::Value => match node.as_value()? {
            Some(value) => serde_json::to_string_pretty(&value)?,
            None => "null".to_string(),
        },
    })
}

fn text<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}
