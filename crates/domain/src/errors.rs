//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::CredentialClass;

/// Details of a rejected token exchange.
///
/// `body_excerpt` is already redacted and truncated; it is safe to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFailure {
    pub class: CredentialClass,
    pub status: Option<u16>,
    pub message: String,
    pub body_excerpt: Option<String>,
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} token request failed", self.class)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {status})")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(excerpt) = &self.body_excerpt {
            write!(f, " [{excerpt}]")?;
        }
        Ok(())
    }
}

/// Main error type for the CIAM client
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum CiamError {
    /// Unmapped region/environment, missing store id, bad config file values.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential for {target} ({class}): set {}", missing.join(", "))]
    MissingCredential { target: String, class: CredentialClass, missing: Vec<String> },

    #[error("Authentication error: {0}")]
    Auth(AuthFailure),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CiamError {
    /// True for errors raised before any network activity because the
    /// command cannot be configured (includes missing credentials).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingCredential { .. } | Self::InvalidInput(_))
    }

    /// True for errors produced by the transport rather than a server reply.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

/// Result type alias for CIAM operations
pub type Result<T> = std::result::Result<T, CiamError>;
