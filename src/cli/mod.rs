//! CLI command handlers
//!
//! This module contains all CLI-related functionality including:
//! - Argument parsing structures
//! - Event filtering applied before analysis
//! - Help text generation
//! - Command routing

pub mod args;
pub mod filter;
pub mod help;
pub mod router;

// Re-export the main CLI structures for convenience
pub use args::{Cli, Commands};
pub use filter::{filter_events, parse_set, EventFilter};
pub use help::{generate_help, get_log_level};
pub use router::{execute_command, Outcome};
