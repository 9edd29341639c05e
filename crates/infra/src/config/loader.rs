//! CLI configuration file loader
//!
//! ## File Location
//! `<home>/.config-ciam-cli`, where `<home>` is `$CIAM_HOME` when set,
//! otherwise the user's home directory.
//!
//! ## Format
//! JSON: `{"region": "us", "env": "qa", "store_id": "store-1"}`. Every field
//! is optional. A missing or unparsable file loads as an empty
//! configuration.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ciam_domain::constants::{CONFIG_FILE_NAME, ENV_HOME};
use ciam_domain::{CiamError, CliConfig, Result};
use tracing::{debug, warn};

use super::EnvLookup;
use crate::errors::InfraError;

/// Directory holding the config and history files.
///
/// # Errors
/// Returns `CiamError::Config` if no home directory can be determined.
pub fn home_dir(lookup: EnvLookup<'_>) -> Result<PathBuf> {
    if let Some(home) = lookup(ENV_HOME).filter(|h| !h.trim().is_empty()) {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir().ok_or_else(|| {
        CiamError::Config(format!("cannot determine home directory; set {ENV_HOME}"))
    })
}

/// Seed the process environment from a `.env` file in the working directory
/// (or a parent), if one exists. Existing variables are not overridden.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded .env file"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "failed to load .env file"),
    }
}

/// Reads and writes the CLI configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `<home>/.config-ciam-cli`.
    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration, falling back to empty on any problem.
    pub fn load(&self) -> CliConfig {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return CliConfig::default(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "cannot read config file");
                return CliConfig::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %err, "ignoring unparsable config file");
            CliConfig::default()
        })
    }

    /// Persist the configuration (pretty JSON, replaced atomically).
    ///
    /// # Errors
    /// Returns `CiamError::Io` if the file cannot be written.
    pub fn save(&self, config: &CliConfig) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(InfraError::from)?;
        }

        let json = serde_json::to_string_pretty(config).map_err(InfraError::from)?;
        let staging = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&staging).map_err(InfraError::from)?;
            file.write_all(json.as_bytes()).map_err(InfraError::from)?;
            file.write_all(b"\n").map_err(InfraError::from)?;
            file.sync_all().map_err(InfraError::from)?;
        }
        fs::rename(&staging, &self.path).map_err(InfraError::from)?;
        debug!(path = %self.path.display(), "saved config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ciam_domain::{Environment, Region};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::in_home(dir.path());
        assert_eq!(store.load(), CliConfig::default());
    }

    #[test]
    fn unparsable_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::in_home(dir.path());
        fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), CliConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::in_home(dir.path());
        let config = CliConfig {
            region: Some(Region::Us),
            env: Some(Environment::Qa),
            store_id: Some("store-1".into()),
        };
        store.save(&config).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"region\": \"us\""));
        assert_eq!(store.load(), config);
    }

    #[test]
    fn ciam_home_overrides_user_home() {
        let lookup = |name: &str| (name == ENV_HOME).then(|| "/custom/home".to_string());
        assert_eq!(home_dir(&lookup).unwrap(), PathBuf::from("/custom/home"));
    }
}
