//! Construction-time error types shared across the workspace.

use thiserror::Error;

/// Errors raised while validating client or webhook configuration.
///
/// Configuration errors are fatal: they surface before any request is made
/// and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The Graph API version string does not match `v{major}.0`.
    #[error("invalid API version format: {value}")]
    InvalidApiVersion {
        /// The rejected version string.
        value: String,
    },

    /// A required configuration value is empty or missing.
    #[error("missing configuration value: {name}")]
    MissingValue {
        /// Name of the missing option.
        name: &'static str,
    },
}

impl ConfigError {
    /// Creates an invalid-version error from the offending input.
    pub fn invalid_api_version(value: impl Into<String>) -> Self {
        Self::InvalidApiVersion { value: value.into() }
    }
}
