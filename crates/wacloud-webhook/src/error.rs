//! Error types for the inbound webhook pipeline.
//!
//! Per-request failures convert to HTTP status codes at the endpoint
//! boundary and are never thrown past it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while handling an inbound webhook request.
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    /// The payload signature did not match the configured app secret.
    #[error("invalid payload signature")]
    InvalidSignature,

    /// The request body was not a parseable notification document.
    #[error("malformed notification payload: {message}")]
    MalformedPayload {
        /// Description of the parse failure.
        message: String,
    },

    /// The subscription handshake presented a wrong mode or token.
    #[error("subscription verification rejected")]
    VerificationRejected,

    /// The configured signing secret could not be used as an HMAC key.
    #[error("invalid signing secret")]
    InvalidSecret,
}

impl WebhookError {
    /// Creates a malformed-payload error from a parse failure.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload { message: message.into() }
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            Self::VerificationRejected => StatusCode::FORBIDDEN,
            Self::InvalidSecret => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body returned to the platform.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_expected_statuses() {
        assert_eq!(WebhookError::InvalidSignature.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(WebhookError::malformed("not json").status(), StatusCode::BAD_REQUEST);
        assert_eq!(WebhookError::VerificationRejected.status(), StatusCode::FORBIDDEN);
    }
}
