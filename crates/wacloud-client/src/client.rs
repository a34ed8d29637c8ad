//! HTTP client for the Cloud API `/messages` endpoint.
//!
//! Wraps a pooled reqwest client with the retry executor so every send is
//! timeout-bounded and retried according to policy. Response statuses are
//! categorized for the retry conditions: non-2xx becomes an API error,
//! transport failures become network errors, elapsed timers become timeouts.

use std::time::Duration;

use serde::Deserialize;
use tracing::{info_span, Instrument};
use wacloud_core::{notification::ContactCard, ApiVersion};

use crate::{
    error::{ClientError, Result},
    payload::{
        LocationPayload, MarkReadPayload, MediaPayload, MediaRef, MessagePayload, TemplatePayload,
    },
    retry::{self, RetryPolicy},
};

/// Default Graph API host.
pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";

/// Default per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Configuration for [`CloudApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bearer token authorizing API calls.
    pub access_token: String,

    /// The business phone number ID messages are sent from.
    pub phone_number_id: String,

    /// Graph API version used in request URLs.
    pub api_version: ApiVersion,

    /// API host, overridable for testing against a local mock.
    pub base_url: String,

    /// Per-attempt request timeout. Zero disables the timer.
    pub timeout: Duration,

    /// Retry policy applied to every send.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Creates a configuration with platform defaults: current API version,
    /// 3 second timeout, no retries.
    pub fn new(access_token: impl Into<String>, phone_number_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            phone_number_id: phone_number_id.into(),
            api_version: ApiVersion::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Overrides the API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    /// Overrides the API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the per-attempt timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Per-call overrides for timeout and retry behavior.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Timeout for this call, defaulting to the client configuration.
    pub timeout: Option<Duration>,

    /// Retry policy for this call, defaulting to the client configuration.
    pub retry: Option<RetryPolicy>,
}

/// Acknowledgment returned by the platform for an accepted message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendReceipt {
    /// Always `whatsapp`.
    #[serde(default)]
    pub messaging_product: Option<String>,

    /// Resolved recipients.
    #[serde(default)]
    pub contacts: Vec<ReceiptContact>,

    /// IDs assigned to the accepted messages.
    #[serde(default)]
    pub messages: Vec<ReceiptMessage>,
}

impl SendReceipt {
    /// ID of the first accepted message.
    pub fn message_id(&self) -> Option<&str> {
        self.messages.first().map(|m| m.id.as_str())
    }
}

/// Recipient entry of a send receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptContact {
    /// The recipient as provided in the request.
    #[serde(default)]
    pub input: Option<String>,

    /// The recipient's canonical WhatsApp ID.
    #[serde(default)]
    pub wa_id: Option<String>,
}

/// Message entry of a send receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptMessage {
    /// Platform-assigned message ID (`wamid...`).
    pub id: String,
}

/// Client for sending messages through the Cloud API.
///
/// Cheap to clone; distinct sends share no mutable state and may proceed
/// concurrently.
#[derive(Debug, Clone)]
pub struct CloudApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    messages_url: String,
}

impl CloudApiClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` when the access token or phone number
    /// ID is empty, or the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.access_token.is_empty() {
            return Err(ClientError::config("access token must not be empty"));
        }
        if config.phone_number_id.is_empty() {
            return Err(ClientError::config("phone number ID must not be empty"));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("wacloud/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::config(format!("failed to build HTTP client: {e}")))?;

        let messages_url = format!(
            "{}/{}/{}/messages",
            config.base_url.trim_end_matches('/'),
            config.api_version,
            config.phone_number_id
        );

        Ok(Self { http, config, messages_url })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a message with the client's configured timeout and retries.
    ///
    /// # Errors
    ///
    /// Returns the final attempt's error once retries are exhausted; see
    /// [`ClientError`] for the taxonomy.
    pub async fn send(&self, message: MessagePayload) -> Result<SendReceipt> {
        self.send_with(message, SendOptions::default()).await
    }

    /// Sends a message with per-call timeout or retry overrides.
    pub async fn send_with(
        &self,
        message: MessagePayload,
        options: SendOptions,
    ) -> Result<SendReceipt> {
        let span = info_span!(
            "send_message",
            message_type = message.kind,
            to = %message.to,
        );

        let body = serde_json::to_string(&message)
            .map_err(|e| ClientError::config(format!("unserializable payload: {e}")))?;

        self.post_with_policy(body, &options).instrument(span).await
    }

    /// Marks an inbound message as read.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`CloudApiClient::send`].
    pub async fn mark_as_read(&self, message_id: &str) -> Result<()> {
        let span = info_span!("mark_as_read", message_id);

        let body = serde_json::to_string(&MarkReadPayload::new(message_id))
            .map_err(|e| ClientError::config(format!("unserializable payload: {e}")))?;

        self.post_with_policy(body, &SendOptions::default()).instrument(span).await.map(|_| ())
    }

    /// Sends a plain text message.
    pub async fn send_text(
        &self,
        to: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<SendReceipt> {
        self.send(MessagePayload::text(to, body)).await
    }

    /// Sends a text reply to an earlier message.
    pub async fn reply_to_text(
        &self,
        to: impl Into<String>,
        message_id: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<SendReceipt> {
        self.send(MessagePayload::text(to, body).in_reply_to(message_id)).await
    }

    /// Sends an emoji reaction.
    pub async fn send_reaction(
        &self,
        to: impl Into<String>,
        message_id: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Result<SendReceipt> {
        self.send(MessagePayload::reaction(to, message_id, emoji)).await
    }

    /// Sends a location pin.
    pub async fn send_location(
        &self,
        to: impl Into<String>,
        location: LocationPayload,
    ) -> Result<SendReceipt> {
        self.send(MessagePayload::location(to, location)).await
    }

    /// Sends a sticker.
    pub async fn send_sticker(
        &self,
        to: impl Into<String>,
        sticker: MediaRef,
    ) -> Result<SendReceipt> {
        self.send(MessagePayload::sticker(to, sticker)).await
    }

    /// Sends an image.
    pub async fn send_image(
        &self,
        to: impl Into<String>,
        image: MediaPayload,
    ) -> Result<SendReceipt> {
        self.send(MessagePayload::image(to, image)).await
    }

    /// Sends an audio clip.
    pub async fn send_audio(&self, to: impl Into<String>, audio: MediaRef) -> Result<SendReceipt> {
        self.send(MessagePayload::audio(to, audio)).await
    }

    /// Sends a video.
    pub async fn send_video(
        &self,
        to: impl Into<String>,
        video: MediaPayload,
    ) -> Result<SendReceipt> {
        self.send(MessagePayload::video(to, video)).await
    }

    /// Sends a document.
    pub async fn send_document(
        &self,
        to: impl Into<String>,
        document: MediaPayload,
    ) -> Result<SendReceipt> {
        self.send(MessagePayload::document(to, document)).await
    }

    /// Sends contact cards.
    pub async fn send_contacts(
        &self,
        to: impl Into<String>,
        contacts: Vec<ContactCard>,
    ) -> Result<SendReceipt> {
        self.send(MessagePayload::contacts(to, contacts)).await
    }

    /// Sends a pre-approved template message.
    pub async fn send_template(
        &self,
        to: impl Into<String>,
        template: TemplatePayload,
    ) -> Result<SendReceipt> {
        self.send(MessagePayload::template(to, template)).await
    }

    async fn post_with_policy(&self, body: String, options: &SendOptions) -> Result<SendReceipt> {
        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let policy = options.retry.as_ref().unwrap_or(&self.config.retry);

        retry::execute(policy, timeout, || self.attempt(body.clone())).await
    }

    /// One network attempt: POST the payload and categorize the outcome.
    async fn attempt(&self, body: String) -> Result<SendReceipt> {
        let response = self
            .http
            .post(&self.messages_url)
            .bearer_auth(&self.config.access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::timeout(u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX))
                } else if e.is_connect() {
                    ClientError::network(format!("connection failed: {e}"))
                } else {
                    ClientError::network(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ClientError::network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "send rejected by the platform");
            return Err(ClientError::api(status.as_u16(), text));
        }

        serde_json::from_str(&text)
            .map_err(|e| ClientError::invalid_response(format!("unparseable receipt: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::retry::retry_on_transient;

    fn test_client(base_url: String) -> CloudApiClient {
        let config = ClientConfig::new("test-token", "2233")
            .with_base_url(base_url)
            .with_timeout(Duration::from_millis(250));
        CloudApiClient::new(config).unwrap()
    }

    fn accepted_receipt() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messaging_product": "whatsapp",
            "contacts": [{ "input": "15550002222", "wa_id": "15550002222" }],
            "messages": [{ "id": "wamid.OUT1" }],
        }))
    }

    #[tokio::test]
    async fn text_send_hits_versioned_messages_url() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/v17.0/2233/messages"))
            .and(matchers::header("authorization", "Bearer test-token"))
            .and(matchers::header("content-type", "application/json"))
            .and(matchers::body_partial_json(serde_json::json!({
                "messaging_product": "whatsapp",
                "type": "text",
                "to": "15550002222",
                "text": { "body": "hello world" },
            })))
            .respond_with(accepted_receipt())
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let receipt = client.send_text("15550002222", "hello world").await.unwrap();

        assert_eq!(receipt.message_id(), Some("wamid.OUT1"));
    }

    #[tokio::test]
    async fn api_error_is_not_retried_by_default() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad recipient"))
            .mount(&server)
            .await;

        let config = ClientConfig::new("test-token", "2233")
            .with_base_url(server.uri())
            .with_retry(RetryPolicy::new(3, Duration::ZERO));
        let client = CloudApiClient::new(config).unwrap();

        let error = client.send_text("nope", "hi").await.unwrap_err();

        assert!(matches!(error, ClientError::Api { status: 400, ref body } if body == "bad recipient"));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn timeouts_consume_the_whole_retry_budget() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(accepted_receipt().set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let config = ClientConfig::new("test-token", "2233")
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(50))
            .with_retry(RetryPolicy::new(2, Duration::ZERO));
        let client = CloudApiClient::new(config).unwrap();

        let error = client.send_text("15550002222", "hi").await.unwrap_err();

        assert!(matches!(error, ClientError::Timeout { timeout_ms: 50 }));
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn transient_condition_recovers_from_server_errors() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(matchers::method("POST")).respond_with(accepted_receipt()).mount(&server).await;

        let config = ClientConfig::new("test-token", "2233")
            .with_base_url(server.uri())
            .with_retry(RetryPolicy::new(3, Duration::ZERO).with_condition(retry_on_transient));
        let client = CloudApiClient::new(config).unwrap();

        let receipt = client.send_text("15550002222", "hi").await.unwrap();

        assert_eq!(receipt.message_id(), Some("wamid.OUT1"));
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn per_call_options_override_client_policy() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("flaky"))
            .mount(&server)
            .await;

        // Client default would not retry; the per-call policy retries twice.
        let client = test_client(server.uri());
        let options = SendOptions {
            timeout: None,
            retry: Some(RetryPolicy::new(2, Duration::ZERO).with_condition(retry_on_transient)),
        };

        let error =
            client.send_with(MessagePayload::text("15550002222", "hi"), options).await.unwrap_err();

        assert!(matches!(error, ClientError::Api { status: 500, .. }));
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn mark_as_read_posts_status_payload() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/v17.0/2233/messages"))
            .and(matchers::body_partial_json(serde_json::json!({
                "messaging_product": "whatsapp",
                "status": "read",
                "message_id": "wamid.IN1",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })))
            .mount(&server)
            .await;

        let client = test_client(server.uri());

        client.mark_as_read("wamid.IN1").await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_host_surfaces_network_error() {
        // Port 1 is reserved and unbound.
        let config = ClientConfig::new("test-token", "2233")
            .with_base_url("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(2));
        let client = CloudApiClient::new(config).unwrap();

        let error = client.send_text("15550002222", "hi").await.unwrap_err();

        assert!(matches!(error, ClientError::Network { .. } | ClientError::Timeout { .. }));
    }

    #[test]
    fn empty_credentials_rejected_at_construction() {
        assert!(matches!(
            CloudApiClient::new(ClientConfig::new("", "2233")),
            Err(ClientError::Config { .. })
        ));
        assert!(matches!(
            CloudApiClient::new(ClientConfig::new("token", "")),
            Err(ClientError::Config { .. })
        ));
    }
}
