//! Append-only command history (`<home>/.ciam-cli-history.jsonl`).
//!
//! Index 0 is the most recent entry. Unreadable lines are skipped with a
//! warning rather than failing the whole listing.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use ciam_domain::constants::{HISTORY_FILE_NAME, HISTORY_MAX_LIST};
use ciam_domain::{CiamError, HistoryEntry, Result};
use tracing::warn;

use crate::errors::InfraError;

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join(HISTORY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry.
    ///
    /// # Errors
    /// Returns `CiamError::Io` if the file cannot be written.
    pub fn append(&self, entry: &HistoryEntry) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(InfraError::from)?;
        }
        let mut line = serde_json::to_vec(entry).map_err(InfraError::from)?;
        line.push(b'\n');

        let mut file =
            OpenOptions::new().create(true).append(true).open(&self.path).map_err(InfraError::from)?;
        file.write_all(&line).map_err(InfraError::from)?;
        Ok(())
    }

    /// Up to `limit` entries, newest first. `limit` is capped at 100.
    ///
    /// # Errors
    /// Returns `CiamError::Io` if the file exists but cannot be read.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.read_all()?;
        entries.reverse();
        entries.truncate(limit.min(HISTORY_MAX_LIST));
        Ok(entries)
    }

    /// Entry at `index` (0 = most recent).
    ///
    /// # Errors
    /// Returns `CiamError::InvalidInput` if there is no such entry.
    pub fn get(&self, index: usize) -> Result<HistoryEntry> {
        let entries = self.read_all()?;
        let total = entries.len();
        entries
            .into_iter()
            .rev()
            .nth(index)
            .ok_or_else(|| CiamError::InvalidInput(format!("no history entry {index} ({total} recorded)")))
    }

    fn read_all(&self) -> Result<Vec<HistoryEntry>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(InfraError::from(err).into()),
        };

        Ok(contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(line = n + 1, error = %err, "skipping unreadable history line");
                    None
                }
            })
            .collect())
    }
}
