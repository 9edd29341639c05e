//! In-memory audit sink, used by tests and dry runs

use std::sync::Arc;

use ciam_domain::{AuditEntry, Result};
use parking_lot::Mutex;

use super::ports::AuditSink;

/// Collects entries in a shared vector. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditSink {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// All entries serialized as one JSON string, for substring assertions.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&*self.entries.lock()).unwrap_or_default()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn append(&self, entry: &AuditEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}
