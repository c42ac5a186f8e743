//! Event validation and stream analytics
//!
//! Turns a batch of decoded events into an [`Analysis`]: frequency tables,
//! identifier uniqueness, timing distributions and a ranked issue list.

pub mod engine;
pub mod models;
pub mod stats;
pub mod validation;

#[cfg(test)]
mod tests;

pub use engine::{run, TOP_N, UNKNOWN_EVENT_TYPE};
pub use models::*;
pub use stats::{quantile, summarize};
