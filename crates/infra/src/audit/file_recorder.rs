//! JSON-lines audit artifact, one file per process run.
//!
//! The file (`output-YYYYMMDD_HHMMSS.jsonl`) is created on the first append,
//! so commands that make no API calls leave nothing behind. Entries are
//! appended in call order and never rewritten.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ciam_core::audit::AuditSink;
use ciam_domain::constants::{AUDIT_FILE_EXTENSION, AUDIT_FILE_PREFIX};
use ciam_domain::{AuditEntry, CiamError, Result};
use parking_lot::Mutex;
use tracing::debug;

use crate::errors::InfraError;

struct OpenArtifact {
    path: PathBuf,
    file: File,
}

/// Append-only JSONL sink shared by every call in a run.
pub struct JsonlAuditSink {
    dir: PathBuf,
    stem: String,
    open: Mutex<Option<OpenArtifact>>,
}

impl JsonlAuditSink {
    /// Sink writing into `dir`, named after `started_at`.
    pub fn new(dir: impl Into<PathBuf>, started_at: DateTime<Utc>) -> Self {
        Self {
            dir: dir.into(),
            stem: format!("{AUDIT_FILE_PREFIX}{}", started_at.format("%Y%m%d_%H%M%S")),
            open: Mutex::new(None),
        }
    }

    fn create(&self) -> Result<OpenArtifact> {
        std::fs::create_dir_all(&self.dir).map_err(InfraError::from)?;
        // Never append to an artifact from another run started in the same second.
        for n in 0u32..1000 {
            let name = if n == 0 {
                format!("{}.{AUDIT_FILE_EXTENSION}", self.stem)
            } else {
                format!("{}-{n}.{AUDIT_FILE_EXTENSION}", self.stem)
            };
            let path = self.dir.join(name);
            match OpenOptions::new().create_new(true).append(true).open(&path) {
                Ok(file) => {
                    debug!(path = %path.display(), "created audit artifact");
                    return Ok(OpenArtifact { path, file });
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
                Err(err) => return Err(InfraError::from(err).into()),
            }
        }
        Err(CiamError::Io(format!("no free audit file name in {}", self.dir.display())))
    }
}

impl AuditSink for JsonlAuditSink {
    fn append(&self, entry: &AuditEntry) -> Result<()> {
        let mut line = serde_json::to_vec(entry).map_err(InfraError::from)?;
        line.push(b'\n');

        let mut open = self.open.lock();
        if open.is_none() {
            *open = Some(self.create()?);
        }
        let artifact = open
            .as_mut()
            .ok_or_else(|| CiamError::Internal("audit artifact not open".into()))?;
        artifact.file.write_all(&line).map_err(InfraError::from)?;
        artifact.file.flush().map_err(InfraError::from)?;
        Ok(())
    }

    fn location(&self) -> Option<PathBuf> {
        self.open.lock().as_ref().map(|a| a.path.clone())
    }
}

/// Read an artifact back, one entry per line.
///
/// # Errors
/// I/O failures or a line that is not a valid entry.
pub fn read_entries(path: &Path) -> Result<Vec<AuditEntry>> {
    let contents = std::fs::read_to_string(path).map_err(InfraError::from)?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(|e| CiamError::from(InfraError::from(e))))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone;
    use ciam_domain::AuditRequest;
    use tempfile::TempDir;

    use super::*;

    fn entry(operation: &str) -> AuditEntry {
        AuditEntry {
            timestamp: Utc::now(),
            operation: operation.into(),
            request: AuditRequest {
                method: "GET".into(),
                url: "https://api.test/users".into(),
                headers: BTreeMap::new(),
                body: None,
            },
            response: None,
            error: None,
            meta: None,
        }
    }

    fn started() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn nothing_written_until_first_entry() {
        let dir = TempDir::new().unwrap();
        let sink = JsonlAuditSink::new(dir.path(), started());
        assert!(sink.location().is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn appends_in_call_order() {
        let dir = TempDir::new().unwrap();
        let sink = JsonlAuditSink::new(dir.path(), started());
        sink.append(&entry("first")).unwrap();
        sink.append(&entry("second")).unwrap();

        let path = sink.location().unwrap();
        assert_eq!(path.file_name().unwrap(), "output-20260304_050607.jsonl");
        let entries = read_entries(&path).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.operation.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn does_not_reuse_another_runs_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("output-20260304_050607.jsonl"), "existing\n").unwrap();

        let sink = JsonlAuditSink::new(dir.path(), started());
        sink.append(&entry("mine")).unwrap();
        let path = sink.location().unwrap();
        assert_eq!(path.file_name().unwrap(), "output-20260304_050607-1.jsonl");
        assert_eq!(read_entries(&path).unwrap().len(), 1);
    }
}
