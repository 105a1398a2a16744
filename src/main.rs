//! typed-yaml command-line tool
//!
//! Reads a YAML document, resolves key paths with the environment overlay
//! and prints values coerced to the requested type.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::debug;
use typed_yaml::cli::{Cli, Command, get, keys};
use typed_yaml::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    init_logging(&cli.log, cli.verbose)?;

    let ctx = Arc::new(cli.load_context()?);
    debug!(environments = ?ctx.environments(), "coercion context ready");

    let output = match &cli.command {
        Command::Get(args) => get::run(args, ctx)?,
        Command::Keys(args) => keys::run(args, ctx)?,
    };
    println!("{output}");
    Ok(())
}
