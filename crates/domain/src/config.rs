//! Persisted CLI configuration

use serde::{Deserialize, Serialize};

use crate::errors::{CiamError, Result};
use crate::types::target::{Environment, Region, Target};

/// Contents of the CLI configuration file: `{"region","env","store_id"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Environment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

impl CliConfig {
    /// The configured target, if both halves are set.
    pub fn target(&self) -> Option<Target> {
        Some(Target::new(self.region?, self.env?))
    }

    /// The configured target.
    ///
    /// # Errors
    ///
    /// Returns `CiamError::Config` when region or environment is unset.
    pub fn require_target(&self) -> Result<Target> {
        self.target().ok_or_else(|| {
            CiamError::Config(
                "no region/environment configured; run `ciam config use <region-env>`".into(),
            )
        })
    }

    /// Resolve the store id: explicit value first, then the configured
    /// default. Blank values count as absent.
    pub fn resolve_store_id(&self, explicit: Option<&str>) -> Option<String> {
        let non_blank = |s: &str| Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string);
        explicit.and_then(non_blank).or_else(|| self.store_id.as_deref().and_then(non_blank))
    }

    /// True when `other` points at a different region, env or store.
    pub fn differs_from(&self, region: Option<Region>, env: Option<Environment>, store_id: Option<&str>) -> bool {
        self.region != region || self.env != env || self.store_id.as_deref() != store_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_store_id_wins() {
        let config = CliConfig { store_id: Some("default".into()), ..CliConfig::default() };
        assert_eq!(config.resolve_store_id(Some("explicit")).as_deref(), Some("explicit"));
        assert_eq!(config.resolve_store_id(None).as_deref(), Some("default"));
    }

    #[test]
    fn blank_store_id_is_absent() {
        let config = CliConfig { store_id: Some("  ".into()), ..CliConfig::default() };
        assert_eq!(config.resolve_store_id(None), None);
    }

    #[test]
    fn target_requires_both_halves() {
        let config = CliConfig { region: Some(Region::Us), ..CliConfig::default() };
        assert!(config.target().is_none());
        assert!(matches!(config.require_target(), Err(CiamError::Config(_))));
    }

    #[test]
    fn parses_file_shape() {
        let config: CliConfig =
            serde_json::from_str(r#"{"region":"us","env":"qa","store_id":"store-1"}"#).unwrap();
        assert_eq!(config.target(), Some(Target::new(Region::Us, Environment::Qa)));
        assert_eq!(config.store_id.as_deref(), Some("store-1"));
    }
}
