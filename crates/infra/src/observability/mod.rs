//! Diagnostics: tracing subscriber set-up
//!
//! Diagnostics always go to stderr; stdout is reserved for command output.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
