//! CLI argument structures
//!
//! This module defines the command-line interface used by ai-json: the main
//! `Cli` structure and its subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Validate and summarize AI event JSON exports
#[derive(Debug, Parser)]
#[command(name = "ai-json")]
#[command(about = "ai-json - advanced event stream analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze event files and print a report
    #[command(name = "analyze")]
    Analyze {
        /// Input JSON file path (repeatable or comma-separated)
        #[arg(short, long = "input", value_name = "PATH")]
        input: Vec<String>,

        /// Input glob pattern (repeatable or comma-separated)
        #[arg(short, long, value_name = "PATTERN")]
        glob: Vec<String>,

        /// Load events from a stream.json inventory
        #[arg(long, value_name = "FILE")]
        stream_config: Option<PathBuf>,

        /// Path to configuration file (defaults to ./ai-json.toml)
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long)]
        format: Option<String>,

        /// Comma-separated event types to include
        #[arg(long, value_name = "TYPES")]
        event_types: Option<String>,

        /// Minimum confidence threshold
        #[arg(long, value_name = "VALUE")]
        min_confidence: Option<f64>,

        /// Max issues to print in the text report (0 = all)
        #[arg(long, value_name = "N")]
        max_issues: Option<usize>,

        /// Exit with code 1 when validation errors are found
        #[arg(long)]
        strict: bool,
    },

    /// Print the inventory of a stream.json without analyzing events
    #[command(name = "inventory")]
    Inventory {
        /// Stream config to inspect
        #[arg(long, value_name = "FILE")]
        stream_config: PathBuf,

        /// Path to configuration file (defaults to ./ai-json.toml)
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long)]
        format: Option<String>,
    },
}

impl Commands {
    /// Explicit configuration file named on the command line
    pub fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Analyze { config, .. } | Self::Inventory { config, .. } => config.as_ref(),
        }
    }
}
