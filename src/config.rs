//! Service configuration with defaults, file, and environment overrides.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use wacloud_client::{ClientConfig, RetryPolicy};
use wacloud_core::ApiVersion;
use wacloud_webhook::WebhookConfig;

const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "WACLOUD_";

/// Complete service configuration.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables prefixed `WACLOUD_` (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// Credentials have no defaults and must come from the file or the
/// environment; everything else works out of the box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Credentials
    /// Bearer token for outbound API calls.
    ///
    /// Environment variable: `WACLOUD_ACCESS_TOKEN`
    #[serde(default)]
    pub access_token: String,

    /// Business phone number ID used as the sender.
    ///
    /// Environment variable: `WACLOUD_PHONE_NUMBER_ID`
    #[serde(default)]
    pub phone_number_id: String,

    // Outbound client
    /// Graph API version, `v{major}.0`.
    ///
    /// Environment variable: `WACLOUD_API_VERSION`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-attempt request timeout in milliseconds.
    ///
    /// Environment variable: `WACLOUD_REQUEST_TIMEOUT_MS`
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Retries after the initial attempt.
    ///
    /// Environment variable: `WACLOUD_REQUEST_RETRIES`
    #[serde(default)]
    pub request_retries: u32,

    /// Delay between retry attempts in milliseconds.
    ///
    /// Environment variable: `WACLOUD_REQUEST_RETRY_DELAY_MS`
    #[serde(default)]
    pub request_retry_delay_ms: u64,

    // Inbound webhook
    /// Token presented by the platform during the subscription handshake.
    ///
    /// Environment variable: `WACLOUD_VERIFY_TOKEN`
    #[serde(default)]
    pub verify_token: String,

    /// App secret for payload signature verification. Unset disables
    /// verification.
    ///
    /// Environment variable: `WACLOUD_APP_SECRET`
    #[serde(default)]
    pub app_secret: Option<String>,

    // Server
    /// Server bind address.
    ///
    /// Environment variable: `WACLOUD_HOST`
    #[serde(default = "default_host")]
    pub host: String,

    /// Server bind port.
    ///
    /// Environment variable: `WACLOUD_PORT`
    #[serde(default = "default_port")]
    pub port: u16,

    // Logging
    /// Log filter directive.
    ///
    /// Environment variable: `WACLOUD_RUST_LOG`
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

impl Config {
    /// Loads configuration from defaults, `config.toml`, and environment
    /// overrides, then validates it.
    ///
    /// # Errors
    ///
    /// Fails when a source cannot be read or validation rejects a value;
    /// both are fatal at startup and never retried.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Converts to the outbound client configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configured API version does not parse.
    pub fn to_client_config(&self) -> Result<ClientConfig> {
        let api_version = ApiVersion::parse(&self.api_version)?;
        let retry = RetryPolicy::new(
            self.request_retries,
            Duration::from_millis(self.request_retry_delay_ms),
        );

        Ok(ClientConfig::new(self.access_token.clone(), self.phone_number_id.clone())
            .with_api_version(api_version)
            .with_timeout(Duration::from_millis(self.request_timeout_ms))
            .with_retry(retry))
    }

    /// Converts to the webhook endpoint configuration.
    pub fn to_webhook_config(&self) -> WebhookConfig {
        let config = WebhookConfig::new(self.verify_token.clone());
        match self.app_secret.as_deref() {
            Some(secret) if !secret.is_empty() => config.with_app_secret(secret),
            _ => config,
        }
    }

    /// Parses the server socket address from host and port.
    ///
    /// # Errors
    ///
    /// Fails when host and port do not form a valid socket address.
    pub fn server_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr).context("Invalid server address")
    }

    /// Validates configuration values.
    fn validate(&self) -> Result<()> {
        if self.access_token.is_empty() {
            anyhow::bail!("access_token must be set (WACLOUD_ACCESS_TOKEN)");
        }

        if self.phone_number_id.is_empty() {
            anyhow::bail!("phone_number_id must be set (WACLOUD_PHONE_NUMBER_ID)");
        }

        if self.verify_token.is_empty() {
            anyhow::bail!("verify_token must be set (WACLOUD_VERIFY_TOKEN)");
        }

        ApiVersion::parse(&self.api_version)
            .with_context(|| format!("invalid api_version: {}", self.api_version))?;

        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            phone_number_id: String::new(),
            api_version: default_api_version(),
            request_timeout_ms: default_request_timeout_ms(),
            request_retries: 0,
            request_retry_delay_ms: 0,
            verify_token: String::new(),
            app_secret: None,
            host: default_host(),
            port: default_port(),
            rust_log: default_log_level(),
        }
    }
}

fn default_api_version() -> String {
    ApiVersion::default().to_string()
}

fn default_request_timeout_ms() -> u64 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}
