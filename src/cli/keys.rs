//! Keys subcommand: list the effective keys of a map.

use crate::context::CoercionContext;
use crate::document::Document;
use crate::reader::YamlReader;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the keys subcommand
#[derive(Args, Debug)]
pub struct KeysArgs {
    /// YAML document (.yaml or .yml)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Key path of the map; the document root when omitted
    #[arg(value_name = "PATH")]
    pub path: Option<String>,
}

/// Run the subcommand and return one key per line.
pub fn run(args: &KeysArgs, ctx: Arc<CoercionContext>) -> anyhow::Result<String> {
    let reader = YamlReader::new(Document::from_path(&args.file)?, ctx);
    let node = match args.path.as_deref() {
        None | Some("") => reader.root(),
        Some(path) => reader.get(path)?,
    };
    Ok(node.keys()?.join("\n"))
}
