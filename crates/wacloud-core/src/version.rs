//! Graph API version handling.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A validated Graph API version of the form `v{major}.0`.
///
/// The platform only publishes `.0` minor versions, so anything else
/// (`v15.2`, `vNext`, empty strings) is rejected at construction. Both the
/// canonical form (`"v17.0"`) and a bare major number (`"17"`) are accepted,
/// matching the version strings the platform documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiVersion(u32);

impl ApiVersion {
    /// Parses a version string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidApiVersion` when the input is neither
    /// `v{major}.0` nor a bare major number.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::invalid_api_version(value);

        if let Some(rest) = value.strip_prefix('v') {
            let major =
                rest.strip_suffix(".0").ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
            Ok(Self(major))
        } else {
            value.parse().map(Self).map_err(|_| invalid())
        }
    }

    /// Returns the major version number.
    pub const fn major(self) -> u32 {
        self.0
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self(17)
    }
}

impl From<u32> for ApiVersion {
    fn from(major: u32) -> Self {
        Self(major)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ApiVersion> for String {
    fn from(version: ApiVersion) -> Self {
        version.to_string()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.0", self.0)
    }
}
