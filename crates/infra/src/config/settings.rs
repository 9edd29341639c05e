//! Runtime settings read from environment variables
//!
//! ## Environment Variables
//! - `CIAM_HTTP_TIMEOUT_SECS`: timeout for token and resource calls (default 10)
//! - `CIAM_INSECURE_TLS`: `1`/`true` disables certificate verification
//! - `CIAM_OUTPUT_DIR`: directory for audit artifacts (default: cwd)
//! - `CIAM_API_BASE_URL`, `CIAM_TOKEN_URL`, `CIAM_CLIENTOPS_TOKEN_URL`:
//!   endpoint overrides, see [`Endpoints`]

use std::path::PathBuf;
use std::time::Duration;

use ciam_domain::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, ENV_HTTP_TIMEOUT_SECS, ENV_INSECURE_TLS, ENV_OUTPUT_DIR,
};
use ciam_domain::{CiamError, Result};

use super::endpoints::Endpoints;
use super::EnvLookup;

/// Settings that shape every HTTP call and the audit location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub http_timeout: Duration,
    pub insecure_tls: bool,
    pub output_dir: PathBuf,
    pub endpoints: Endpoints,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            insecure_tls: false,
            output_dir: PathBuf::from("."),
            endpoints: Endpoints::standard(),
        }
    }
}

impl RuntimeSettings {
    /// Load from environment variables.
    ///
    /// # Errors
    ///
    /// `CiamError::Config` if the timeout is not a positive integer.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self> {
        let http_timeout = match lookup(ENV_HTTP_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                    CiamError::Config(format!("Invalid {ENV_HTTP_TIMEOUT_SECS}: '{raw}'"))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let output_dir = lookup(ENV_OUTPUT_DIR)
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from("."), PathBuf::from);

        Ok(Self {
            http_timeout,
            insecure_tls: env_bool(lookup, ENV_INSECURE_TLS),
            output_dir,
            endpoints: Endpoints::from_lookup(lookup),
        })
    }
}

fn env_bool(lookup: EnvLookup<'_>, name: &str) -> bool {
    lookup(name).is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
