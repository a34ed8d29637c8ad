//! Error types for outbound API calls.
//!
//! Errors keep their identity through the retry pipeline: retry conditions
//! inspect the concrete variant, and after the budget is exhausted the last
//! failure propagates to the caller unwrapped.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors produced while sending messages to the Cloud API.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The request did not complete within the configured timeout.
    #[error("request timeout after {timeout_ms}ms")]
    Timeout {
        /// Milliseconds the request was allowed to run.
        timeout_ms: u64,
    },

    /// Network-level failure before an HTTP response was received.
    #[error("network error: {message}")]
    Network {
        /// Description of the transport failure.
        message: String,
    },

    /// The platform answered with a non-success status.
    #[error("API error: HTTP {status}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, as returned by the platform.
        body: String,
    },

    /// A 2xx response whose body could not be interpreted.
    #[error("invalid API response: {message}")]
    InvalidResponse {
        /// Description of the parse failure.
        message: String,
    },

    /// The client was constructed with unusable settings.
    #[error("client configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

impl ClientError {
    /// Creates a timeout error.
    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates an API error from an HTTP response.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api { status, body: body.into() }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse { message: message.into() }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Whether this error represents a transient failure.
    ///
    /// Timeouts, network failures and 5xx responses are transient; 4xx
    /// responses, parse failures and configuration problems are not. The
    /// retry pipeline does not consult this directly — the configured
    /// condition decides — but [`crate::retry::retry_on_transient`] is built
    /// on it.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::InvalidResponse { .. } | Self::Config { .. } => false,
        }
    }
}
