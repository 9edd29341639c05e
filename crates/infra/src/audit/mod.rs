//! Audit artifact persistence

pub mod file_recorder;

pub use file_recorder::{read_entries, JsonlAuditSink};
