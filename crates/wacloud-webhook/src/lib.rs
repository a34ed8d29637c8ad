//! Inbound webhook receiver for WhatsApp Cloud API notifications.
//!
//! Pipeline for one delivery: raw bytes → signature verification → parsed
//! notification → classification → typed event dispatch → HTTP
//! acknowledgment. Listener registration is process-wide and survives across
//! requests; each notification view lives only for its request.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use wacloud_webhook::{
//!     dispatch::{EventDispatcher, EventKind, EventPayload},
//!     handlers::{WebhookConfig, WebhookState},
//!     server,
//! };
//!
//! # async fn example() -> std::io::Result<()> {
//! let dispatcher = Arc::new(EventDispatcher::new());
//! dispatcher.on(EventKind::Text, |payload, view| {
//!     if let EventPayload::Text(text) = payload {
//!         println!("{:?} says {}", view.from(), text.body);
//!     }
//! });
//!
//! let config = WebhookConfig::new("VERIFY_TOKEN").with_app_secret("APP_SECRET");
//! let state = WebhookState::new(dispatcher, config);
//! server::start_server(state, "127.0.0.1:8080".parse().unwrap()).await
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod server;
pub mod signature;

pub use dispatch::{EventDispatcher, EventKind, EventPayload, ListenerId};
pub use error::WebhookError;
pub use handlers::{WebhookConfig, WebhookState, SIGNATURE_HEADER};
pub use server::{create_router, start_server};
pub use signature::{parse_signature_header, signature_hex, verify_signature};
