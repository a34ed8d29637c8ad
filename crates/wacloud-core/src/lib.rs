//! Core domain model for the WhatsApp Cloud API pipeline.
//!
//! Provides the typed notification document delivered to webhook receivers,
//! a read-only projection for navigating and classifying it, and the shared
//! configuration primitives (API version parsing, error types) used by both
//! the outbound client and the inbound webhook crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod notification;
pub mod version;
pub mod view;

pub use error::ConfigError;
pub use notification::{
    Button, ContactCard, ContactProfile, ErrorObject, Interactive, Location, Media, Message,
    NotificationDocument, Reaction, Status, Sticker, System, Text,
};
pub use version::ApiVersion;
pub use view::{MessageType, Notification, NotificationKind, StatusKind};
