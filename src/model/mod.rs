//! Event records decoded from the sensing pipeline
//!
//! Records keep their JSON shape untouched; all type coercion lives in the
//! accessors on [`EventRecord`].

pub mod common;
pub mod parse;
pub mod record;

pub use common::CommonFields;
pub use parse::parse_events;
pub use record::EventRecord;
