//! CLI command definitions for typed-yaml
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod get;
pub mod keys;

use crate::context::CoercionContext;
use crate::document::Document;
use clap::{Parser, Subcommand};
use get::GetArgs;
use keys::KeysArgs;
use std::path::PathBuf;
use tracing::debug;

/// Read typed values out of YAML documents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a context document (environments and date patterns)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Environment to overlay, highest priority first (repeatable)
    #[arg(short, long = "env", global = true, value_name = "NAME")]
    pub env: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off (default), 1/stdout, 2/stderr, or filename
    #[arg(short, long, default_value = "0", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a key path and print its value
    Get(GetArgs),

    /// List the effective keys of a map after the environment overlay
    Keys(KeysArgs),
}

impl Cli {
    /// Build the coercion context from `--config`, `--env` and the
    /// environment override variable.
    ///
    /// Environments given on the command line come before those of the
    /// context document.
    pub fn load_context(&self) -> anyhow::Result<CoercionContext> {
        let mut ctx = match &self.config {
            Some(path) => {
                debug!(path = %path.display(), "loading context document");
                CoercionContext::from_document(&Document::from_path(path)?)?
            }
            None => CoercionContext::default(),
        };
        for environment in self.env.iter().rev() {
            ctx.prioritize(environment);
        }
        Ok(ctx.with_env_override())
    }
}
