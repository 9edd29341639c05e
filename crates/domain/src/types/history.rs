//! Command history records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::target::{Environment, Region};

/// One invocation recorded to the history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    /// Arguments after the program name.
    pub argv: Vec<String>,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub env: Option<Environment>,
    #[serde(default)]
    pub store_id: Option<String>,
}

impl HistoryEntry {
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}
