//! Deployment targets: region and environment

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CiamError;
use crate::impl_domain_enum_conversions;

/// Geographic deployment of the identity platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Us,
    Uk,
    Can,
    Anz,
}

impl_domain_enum_conversions!(Region {
    Us => "us",
    Uk => "uk",
    Can => "can",
    Anz => "anz",
});

/// Release stage within a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Qa,
    Uat,
    Prod,
}

impl_domain_enum_conversions!(Environment {
    Dev => "dev",
    Qa => "qa",
    Uat => "uat",
    Prod => "prod",
});

/// A (region, environment) pair. Written as `region-env`, e.g. `us-qa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub region: Region,
    pub environment: Environment,
}

impl Target {
    pub const fn new(region: Region, environment: Environment) -> Self {
        Self { region, environment }
    }

    /// Uppercase prefix used for credential variable names (`US_QA`).
    pub fn env_prefix(&self) -> String {
        format!("{}_{}", self.region.as_str(), self.environment.as_str()).to_uppercase()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.region, self.environment)
    }
}

impl FromStr for Target {
    type Err = CiamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (region, environment) = s.trim().split_once('-').ok_or_else(|| {
            CiamError::InvalidInput(format!(
                "invalid target '{s}': expected region-env, e.g. us-qa"
            ))
        })?;
        Ok(Self::new(region.parse()?, environment.parse()?))
    }
}
