//! Outbound WhatsApp Cloud API client.
//!
//! Sends typed message payloads to the platform's `/messages` endpoint with
//! per-attempt timeouts and a configurable retry policy. The retry condition
//! decides which failures earn another attempt; by default only timeouts do.
//!
//! # Example
//!
//! ```no_run
//! use wacloud_client::{ClientConfig, CloudApiClient};
//!
//! # async fn example() -> Result<(), wacloud_client::ClientError> {
//! let config = ClientConfig::new("ACCESS_TOKEN", "PHONE_NUMBER_ID");
//! let client = CloudApiClient::new(config)?;
//!
//! let receipt = client.send_text("15550002222", "hello world").await?;
//! println!("accepted as {:?}", receipt.message_id());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod payload;
pub mod retry;

pub use client::{ClientConfig, CloudApiClient, SendOptions, SendReceipt, DEFAULT_BASE_URL};
pub use error::{ClientError, Result};
pub use payload::{
    LocationPayload, MarkReadPayload, MediaPayload, MediaRef, MessageContent, MessagePayload,
    TemplatePayload, TextPayload,
};
pub use retry::{retry_on_timeout, retry_on_transient, RetryCondition, RetryPolicy};
