//! # ai-json
//!
//! Validate and summarize event streams exported by AI vision pipelines.
//!
//! ## Usage
//!
//! ```bash
//! ai-json analyze [--input a.json,b.json] [--glob 'data/*.json'] [--format json] [--strict]
//! ai-json inventory --stream-config stream.json
//! ```
//!
//! ## Modules
//!
//! - `analytics` - Single-pass analysis engine, validation rules and statistics
//! - `cli` - Argument parsing, event filtering and command routing
//! - `config` - Layered configuration (defaults, TOML files, environment)
//! - `error` - Hard-failure error type shared by the library
//! - `input` - File and glob resolution, stream inventory loading
//! - `model` - Schema-free event records and document decoding
//! - `report` - Text and JSON report rendering
pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod report;

pub use error::{Error, Result};
