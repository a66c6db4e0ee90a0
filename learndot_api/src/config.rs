//! Backend stage selection.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Which Learndot deployment the client talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    /// The live deployment. This is the default.
    #[default]
    Production,
    /// The staging deployment.
    Staging,
    /// The sandbox deployment.
    Sandbox,
}

impl Stage {
    /// Base URL of the REST v2 API for this stage.
    pub fn base_url(&self) -> &'static str {
        match self {
            Stage::Production => "https://learn.puppet.com/api/rest/v2",
            Stage::Staging => "https://puppetlabs-staging.trainingrocket.com/api/rest/v2",
            Stage::Sandbox => "https://puppetlabs-sandbox.trainingrocket.com/api/rest/v2",
        }
    }
}

impl From<bool> for Stage {
    /// `true` selects staging, `false` production.
    fn from(staging: bool) -> Self {
        if staging {
            Stage::Staging
        } else {
            Stage::Production
        }
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "false" => Ok(Stage::Production),
            "staging" | "true" => Ok(Stage::Staging),
            "sandbox" => Ok(Stage::Sandbox),
            other => Err(Error::Configuration(format!(
                "unknown stage '{}' (expected production, staging or sandbox)",
                other
            ))),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Production => "production",
            Stage::Staging => "staging",
            Stage::Sandbox => "sandbox",
        };
        f.write_str(name)
    }
}
