//! Port interface for audit persistence

use std::path::PathBuf;

use ciam_domain::{AuditEntry, Result};

/// Append-only destination for audit entries.
pub trait AuditSink: Send + Sync {
    /// Append one entry. Entries must keep call order.
    fn append(&self, entry: &AuditEntry) -> Result<()>;

    /// Where entries went, once at least one was written.
    fn location(&self) -> Option<PathBuf> {
        None
    }
}
