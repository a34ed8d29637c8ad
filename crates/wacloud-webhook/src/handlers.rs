//! HTTP request handlers for the webhook endpoint.
//!
//! Two handlers cover the platform contract: the GET subscription handshake
//! that echoes a challenge for a matching verify token, and the POST
//! delivery intake that verifies the payload signature over the raw bytes,
//! parses the notification, and hands it to the dispatcher. Every
//! per-request failure becomes an HTTP status here; nothing propagates past
//! the endpoint boundary.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use wacloud_core::Notification;

use crate::{dispatch::EventDispatcher, error::WebhookError, signature};

/// Header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Configuration of the inbound endpoint.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Token the platform presents during the subscription handshake.
    pub verify_token: String,

    /// App secret used to verify payload signatures. Leaving this unset
    /// disables signature verification entirely — an explicit reduction of
    /// the trust boundary, not an error.
    pub app_secret: Option<String>,
}

impl WebhookConfig {
    /// Creates a configuration with signature verification disabled.
    pub fn new(verify_token: impl Into<String>) -> Self {
        Self { verify_token: verify_token.into(), app_secret: None }
    }

    /// Enables signature verification with the given app secret.
    #[must_use]
    pub fn with_app_secret(mut self, app_secret: impl Into<String>) -> Self {
        self.app_secret = Some(app_secret.into());
        self
    }
}

/// Shared state behind the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    /// The process-wide event dispatcher.
    pub dispatcher: Arc<EventDispatcher>,

    /// Endpoint configuration.
    pub config: Arc<WebhookConfig>,
}

impl WebhookState {
    /// Bundles a dispatcher and configuration into router state.
    pub fn new(dispatcher: Arc<EventDispatcher>, config: WebhookConfig) -> Self {
        Self { dispatcher, config: Arc::new(config) }
    }
}

/// Query parameters of the subscription handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    /// Subscription mode, `subscribe` for a genuine handshake.
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,

    /// Token that must match the configured verify token.
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,

    /// Challenge to echo back on success.
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Handles the GET subscription handshake.
///
/// Echoes the challenge with 200 only when the mode is `subscribe` and the
/// presented token matches the configured one; everything else is rejected
/// with 403.
#[instrument(name = "verify_subscription", skip_all)]
pub async fn verify_subscription(
    State(state): State<WebhookState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let (Some(mode), Some(token), Some(challenge)) =
        (params.mode, params.verify_token, params.challenge)
    else {
        warn!("handshake missing required parameters");
        return WebhookError::VerificationRejected.into_response();
    };

    if mode == "subscribe" && token == state.config.verify_token {
        debug!("subscription verified");
        challenge.into_response()
    } else {
        warn!(%mode, "handshake rejected");
        WebhookError::VerificationRejected.into_response()
    }
}

/// Handles a POSTed notification delivery.
///
/// State machine: verify the signature when a secret and signature header
/// are both present (mismatch rejects before parsing), parse the raw body,
/// classify and dispatch. Parseable payloads are always acknowledged with
/// 200 — including shapes that classify to nothing — so unknown notification
/// types never break the integration.
#[instrument(
    name = "receive_notification",
    skip(state, headers, body),
    fields(content_length = body.len())
)]
pub async fn receive_notification(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(error) = check_signature(&state, &headers, &body) {
        warn!(error = %error, "rejecting unauthenticated delivery");
        return error.into_response();
    }

    let notification = match Notification::from_slice(&body) {
        Ok(notification) => notification,
        Err(parse_error) => {
            warn!(error = %parse_error, "rejecting unparseable delivery");
            return WebhookError::malformed(parse_error.to_string()).into_response();
        },
    };

    let dispatched = state.dispatcher.dispatch(&notification);
    debug!(dispatched, "notification acknowledged");

    StatusCode::OK.into_response()
}

/// Verifies the payload signature against the raw request bytes.
///
/// Skipped when no secret is configured or the signature header is absent.
fn check_signature(
    state: &WebhookState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), WebhookError> {
    let Some(secret) = state.config.app_secret.as_deref() else {
        return Ok(());
    };
    let Some(header) = headers.get(SIGNATURE_HEADER).and_then(|value| value.to_str().ok()) else {
        return Ok(());
    };

    let expected =
        signature::parse_signature_header(header).ok_or(WebhookError::InvalidSignature)?;

    if signature::verify_signature(body, expected, secret) {
        Ok(())
    } else {
        Err(WebhookError::InvalidSignature)
    }
}

/// Health response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: &'static str,
}

/// Liveness endpoint for orchestration probes.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
