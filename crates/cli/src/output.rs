//! Terminal output markers shared by every command
//!
//! ```text
//! ▼ get users
//!   • Fetching user: u-1
//!     • ✓ Retrieved user u-1: Ada
//!   • Retrieved 1 user(s), 0 error(s)
//! ▲ get users (success)
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

pub fn start(title: &str) -> String {
    format!("▼ {title}")
}

pub fn step(message: &str) -> String {
    step_at(2, message)
}

pub fn step_at(indent: usize, message: &str) -> String {
    format!("{:indent$}• {message}", "")
}

pub fn end(title: &str, success: bool) -> String {
    format!("▲ {title} ({})", if success { "success" } else { "failure" })
}

/// Pretty JSON, indented to sit under a step.
pub fn json_block(value: &Value, indent: usize) -> Result<String> {
    let pretty = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    Ok(pretty.lines().map(|line| format!("{:indent$}{line}", "")).collect::<Vec<_>>().join("\n"))
}

/// Display name of an item: its `name` field, else `N/A`.
pub fn display_name(item: &Value) -> &str {
    item.get("name").and_then(Value::as_str).unwrap_or("N/A")
}

pub fn audit_location(path: &Path) -> String {
    format!("\nOutput written to: {}", path.display())
}
