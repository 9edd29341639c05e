//! Credential classes and client-credential pairs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::REDACTED_PLACEHOLDER;
use crate::errors::CiamError;
use crate::types::target::Target;

/// One of the two independent credential/token scopes issued by the
/// identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialClass {
    /// Basic-auth token exchange; used by most resource operations.
    General,
    /// Body-field token exchange; used for client management.
    ClientOps,
}

impl CredentialClass {
    pub const ALL: &'static [Self] = &[Self::General, Self::ClientOps];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::ClientOps => "clientops",
        }
    }

    /// Segment used in credential variable names (`GENERAL`, `CLIENTOPS`).
    pub const fn env_segment(&self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::ClientOps => "CLIENTOPS",
        }
    }

    /// Names of the id and secret variables for this class on `target`.
    pub fn env_keys(&self, target: &Target) -> CredentialKeys {
        let base = format!("{}_{}", target.env_prefix(), self.env_segment());
        CredentialKeys {
            client_id: format!("{base}_CLIENT_ID"),
            client_secret: format!("{base}_CLIENT_SECRET"),
        }
    }
}

impl fmt::Display for CredentialClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialClass {
    type Err = CiamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(Self::General),
            "clientops" | "client" => Ok(Self::ClientOps),
            other => Err(CiamError::InvalidInput(format!(
                "invalid credential class '{other}' (valid: general, clientops)"
            ))),
        }
    }
}

/// Variable names holding one credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialKeys {
    pub client_id: String,
    pub client_secret: String,
}

/// A resolved client-credential pair. Never serialized and never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    target: Target,
    class: CredentialClass,
    client_id: String,
    client_secret: String,
}

impl Credential {
    pub fn new(
        target: Target,
        class: CredentialClass,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self { target, class, client_id: client_id.into(), client_secret: client_secret.into() }
    }

    pub const fn target(&self) -> Target {
        self.target
    }

    pub const fn class(&self) -> CredentialClass {
        self.class
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("target", &self.target)
            .field("class", &self.class)
            .field("client_id", &REDACTED_PLACEHOLDER)
            .field("client_secret", &REDACTED_PLACEHOLDER)
            .finish()
    }
}
