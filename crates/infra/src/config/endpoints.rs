//! Resource API and token endpoint tables
//!
//! Every region has dev, qa, uat and prod resource APIs. Token endpoints
//! exist for all four US environments but only qa, uat and prod elsewhere.
//! Either table can be overridden for a run (`CIAM_API_BASE_URL`,
//! `CIAM_TOKEN_URL`, `CIAM_CLIENTOPS_TOKEN_URL`).

use ciam_domain::constants::{ENV_API_BASE_URL, ENV_CLIENTOPS_TOKEN_URL, ENV_TOKEN_URL};
use ciam_domain::{CiamError, CredentialClass, Environment, Region, Result, Target};

use super::EnvLookup;

/// Endpoint resolution with optional overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    api_base_url: Option<String>,
    token_url: Option<String>,
    clientops_token_url: Option<String>,
}

impl Endpoints {
    /// Built-in tables only.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Built-in tables plus any overrides present in the environment.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        let non_blank = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            api_base_url: non_blank(ENV_API_BASE_URL),
            token_url: non_blank(ENV_TOKEN_URL),
            clientops_token_url: non_blank(ENV_CLIENTOPS_TOKEN_URL),
        }
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_clientops_token_url(mut self, url: impl Into<String>) -> Self {
        self.clientops_token_url = Some(url.into());
        self
    }

    /// Resource API base URL, without trailing slash.
    ///
    /// # Errors
    ///
    /// `CiamError::Config` if the pair has no API. Every built-in pair
    /// currently has one.
    pub fn api_base_url(&self, target: Target) -> Result<String> {
        let url = match &self.api_base_url {
            Some(url) => url.clone(),
            None => standard_api_base_url(target),
        };
        Ok(url.trim_end_matches('/').to_string())
    }

    /// Token endpoint for a credential class.
    ///
    /// ClientOps uses its own override when set, then the shared override.
    ///
    /// # Errors
    ///
    /// `CiamError::Config` if the pair has no token endpoint.
    pub fn token_url(&self, target: Target, class: CredentialClass) -> Result<String> {
        let overridden = match class {
            CredentialClass::ClientOps => self.clientops_token_url.as_ref().or(self.token_url.as_ref()),
            CredentialClass::General => self.token_url.as_ref(),
        };
        if let Some(url) = overridden {
            return Ok(url.clone());
        }
        standard_token_url(target).ok_or_else(|| {
            CiamError::Config(format!(
                "no token endpoint for region '{}' and env '{}'",
                target.region, target.environment
            ))
        })
    }
}

fn standard_api_base_url(target: Target) -> String {
    let region = target.region.as_str();
    match target.environment {
        Environment::Prod => format!("https://ciam-{region}.example.com/api/v1"),
        env => format!("https://ciam-{region}-{env}.example.com/api/v1"),
    }
}

fn standard_token_url(target: Target) -> Option<String> {
    let region = target.region.as_str();
    match (target.region, target.environment) {
        (Region::Uk | Region::Can | Region::Anz, Environment::Dev) => None,
        (_, Environment::Prod) => Some(format!("https://auth-{region}.pingone.com/oauth2/token")),
        (_, env) => Some(format!("https://auth-{region}-{env}.pingone.com/oauth2/token")),
    }
}
