//! CLI definitions for S2GOS.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

/// S2GOS CLI.
#[derive(Parser)]
#[command(name = "s2gos")]
#[command(about = "Local OGC API - Processes job engine")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "S2GOS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the landing page
    Info,

    /// List the conformance classes
    Conformance,

    /// List the available processes
    Processes,

    /// Show the full description of a process
    Describe {
        /// Process ID
        process_id: String,
    },

    /// Execute a process and wait for its results
    Run {
        /// Process ID
        process_id: String,

        /// Input value as NAME=VALUE, VALUE being JSON or a plain string
        #[arg(short, long = "input", value_parser = parse_input)]
        inputs: Vec<(String, Value)>,
    },
}

/// Parse a `NAME=VALUE` input. Values that are not valid JSON are taken as
/// strings.
pub(crate) fn parse_input(arg: &str) -> Result<(String, Value), String> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing input name in '{}'", arg));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}
