//! API-specific error types
//!
//! Provides error classification for pipeline outcomes.

use std::time::Duration;

use ciam_core::audit::redaction::{redact_value, redacted_excerpt};
use ciam_domain::{AuthFailure, CiamError};
use serde_json::Value;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Unmapped target, missing store id, invalid operation input
    Config,
    /// Credential variables absent
    Credential,
    /// Token exchange rejected
    Auth,
    /// Connection failure or timeout
    Network,
    /// Unreadable response
    Protocol,
    /// Non-2xx reply from the resource API
    Status,
}

/// Pipeline errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Credential(CiamError),

    #[error("Authentication failed: {0}")]
    Auth(AuthFailure),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("HTTP {status}: {}", body_excerpt(.body))]
    Status { status: u16, body: Value },
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Config(_) => ApiErrorCategory::Config,
            Self::Credential(_) => ApiErrorCategory::Credential,
            Self::Auth(_) => ApiErrorCategory::Auth,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Protocol(_) => ApiErrorCategory::Protocol,
            Self::Status { .. } => ApiErrorCategory::Status,
        }
    }

    /// Short label recorded as the audit `error.kind`.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Credential(_) => "credential",
            Self::Auth(_) => "auth",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Protocol(_) => "protocol",
            Self::Status { .. } => "status",
        }
    }

    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Auth(failure) => failure.status,
            _ => None,
        }
    }

    /// Build a status error, redacting the body before it is kept.
    pub fn from_status(status: u16, body: &Value) -> Self {
        Self::Status { status, body: redact_value(body) }
    }

    /// Classify a domain error raised while preparing or sending a call.
    pub fn from_domain(err: CiamError, timeout: Duration) -> Self {
        match err {
            CiamError::Config(message) | CiamError::InvalidInput(message) => Self::Config(message),
            err @ CiamError::MissingCredential { .. } => Self::Credential(err),
            CiamError::Auth(failure) => Self::Auth(failure),
            CiamError::Network(message) => Self::Network(message),
            CiamError::Timeout(_) => Self::Timeout(timeout),
            CiamError::Protocol(message)
            | CiamError::Serialization(message)
            | CiamError::Io(message)
            | CiamError::Internal(message) => Self::Protocol(message),
        }
    }
}

fn body_excerpt(body: &Value) -> String {
    match body {
        Value::String(text) => redacted_excerpt(text),
        other => redacted_excerpt(&other.to_string()),
    }
}
