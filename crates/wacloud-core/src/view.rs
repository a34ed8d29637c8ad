//! Read-only projection over a notification document.
//!
//! [`Notification`] wraps one [`NotificationDocument`] for the lifetime of a
//! single inbound request and exposes lazy accessors that walk the optional
//! chain entry → change → value → content. Every accessor recomputes on each
//! call and degrades to `None` through missing levels; nothing here panics
//! on malformed documents.

use crate::notification::{
    Button, Change, ChangeValue, ContactCard, ContactProfile, Context, Entry, ErrorObject,
    Interactive, Location, Media, Message, Metadata, NotificationDocument, Order, Reaction, Status,
    Sticker, System, Text,
};

/// Top-level classification of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The value carries inbound customer messages.
    Message,
    /// The value carries delivery status updates.
    Status,
    /// The value carries account-level errors.
    Errors,
}

/// Discriminator for which message sub-object is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum MessageType {
    Text,
    Reaction,
    Sticker,
    Audio,
    Document,
    Image,
    Video,
    Location,
    Contacts,
    Button,
    Interactive,
    Order,
    System,
    Unknown,
    Unsupported,
}

impl MessageType {
    /// Maps an explicit `type` tag to a message type.
    ///
    /// Returns `None` for tags this integration does not recognize; callers
    /// must treat those as unclassifiable rather than failing.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(Self::Text),
            "reaction" => Some(Self::Reaction),
            "sticker" => Some(Self::Sticker),
            "audio" => Some(Self::Audio),
            "document" => Some(Self::Document),
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "location" => Some(Self::Location),
            "contacts" => Some(Self::Contacts),
            "button" => Some(Self::Button),
            "interactive" => Some(Self::Interactive),
            "order" => Some(Self::Order),
            "system" => Some(Self::System),
            "unknown" => Some(Self::Unknown),
            "unsupported" => Some(Self::Unsupported),
            _ => None,
        }
    }

    /// The wire tag for this message type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Reaction => "reaction",
            Self::Sticker => "sticker",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Image => "image",
            Self::Video => "video",
            Self::Location => "location",
            Self::Contacts => "contacts",
            Self::Button => "button",
            Self::Interactive => "interactive",
            Self::Order => "order",
            Self::System => "system",
            Self::Unknown => "unknown",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Delivery status values of a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum StatusKind {
    Sent,
    Delivered,
    Read,
    Failed,
}

impl StatusKind {
    /// Maps a raw `status` value to a status kind.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sent" => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            "read" => Some(Self::Read),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// The wire value for this status kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
            Self::Failed => "failed",
        }
    }
}

/// Presence-inference order used when a message omits its `type` tag.
const INFERENCE_ORDER: [MessageType; 13] = [
    MessageType::Audio,
    MessageType::Button,
    MessageType::Contacts,
    MessageType::Document,
    MessageType::Image,
    MessageType::Interactive,
    MessageType::Location,
    MessageType::Order,
    MessageType::Reaction,
    MessageType::Sticker,
    MessageType::System,
    MessageType::Text,
    MessageType::Video,
];

/// A read-only view over one notification document.
///
/// Owns the parsed document for the duration of a single request; discarded
/// after dispatch. All accessors observe only the first entry and the first
/// change, matching how the platform delivers notifications in practice.
#[derive(Debug, Clone)]
pub struct Notification {
    document: NotificationDocument,
}

impl Notification {
    /// Wraps an already-parsed document.
    pub fn new(document: NotificationDocument) -> Self {
        Self { document }
    }

    /// Parses a raw JSON body into a notification view.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when the body is not valid
    /// JSON or not an object.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body).map(Self::new)
    }

    /// The raw document this view wraps.
    pub fn document(&self) -> &NotificationDocument {
        &self.document
    }

    /// First entry of the document.
    pub fn entry(&self) -> Option<&Entry> {
        self.document.entry.first()
    }

    /// First change of the first entry.
    pub fn change(&self) -> Option<&Change> {
        self.entry()?.changes.first()
    }

    /// Value object of the first change.
    pub fn value(&self) -> Option<&ChangeValue> {
        self.change()?.value.as_ref()
    }

    /// Business phone-number metadata.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.value()?.metadata.as_ref()
    }

    /// Customer profiles attached to the notification.
    pub fn contacts(&self) -> Option<&[ContactProfile]> {
        self.value()?.contacts.as_deref()
    }

    /// First customer profile.
    pub fn contact(&self) -> Option<&ContactProfile> {
        self.contacts()?.first()
    }

    /// Inbound messages of the notification.
    pub fn messages(&self) -> Option<&[Message]> {
        self.value()?.messages.as_deref()
    }

    /// First inbound message.
    pub fn message(&self) -> Option<&Message> {
        self.messages()?.first()
    }

    /// Status updates of the notification.
    pub fn statuses(&self) -> Option<&[Status]> {
        self.value()?.statuses.as_deref()
    }

    /// First status update.
    pub fn status(&self) -> Option<&Status> {
        self.statuses()?.first()
    }

    /// Account-level errors of the notification.
    pub fn errors(&self) -> Option<&[ErrorObject]> {
        self.value()?.errors.as_deref()
    }

    /// First account-level error.
    pub fn error(&self) -> Option<&ErrorObject> {
        self.errors()?.first()
    }

    /// Classifies the notification.
    ///
    /// One auditable decision: a populated `messages` array wins, then
    /// `statuses`, then `errors`. Returns `None` for empty or unfamiliar
    /// documents; that is an acknowledgeable outcome, not a failure.
    pub fn kind(&self) -> Option<NotificationKind> {
        if self.message().is_some() {
            Some(NotificationKind::Message)
        } else if self.status().is_some() {
            Some(NotificationKind::Status)
        } else if self.error().is_some() {
            Some(NotificationKind::Errors)
        } else {
            None
        }
    }

    /// Resolves the type of the first message.
    ///
    /// The explicit `type` tag wins when present and recognized. When the
    /// tag is absent the type is inferred from whichever sub-object is
    /// populated, probed in a fixed order. Unrecognized tags and messages
    /// with no known sub-object resolve to `None`.
    pub fn message_type(&self) -> Option<MessageType> {
        let message = self.message()?;

        if let Some(tag) = message.kind.as_deref() {
            return MessageType::parse(tag);
        }

        INFERENCE_ORDER.into_iter().find(|inferred| self.has_content(message, *inferred))
    }

    fn has_content(&self, message: &Message, message_type: MessageType) -> bool {
        match message_type {
            MessageType::Audio => message.audio.is_some(),
            MessageType::Button => message.button.is_some(),
            MessageType::Contacts => message.contacts.is_some(),
            MessageType::Document => message.document.is_some(),
            MessageType::Image => message.image.is_some(),
            MessageType::Interactive => message.interactive.is_some(),
            MessageType::Location => message.location.is_some(),
            MessageType::Order => message.order.is_some(),
            MessageType::Reaction => message.reaction.is_some(),
            MessageType::Sticker => message.sticker.is_some(),
            MessageType::System => message.system.is_some(),
            MessageType::Text => message.text.is_some(),
            MessageType::Video => message.video.is_some(),
            MessageType::Unknown | MessageType::Unsupported => false,
        }
    }

    /// Resolves the status value of the first status update.
    pub fn status_kind(&self) -> Option<StatusKind> {
        StatusKind::parse(self.status()?.status.as_deref()?)
    }

    /// Sender WhatsApp ID of the first message.
    pub fn from(&self) -> Option<&str> {
        self.message()?.from.as_deref()
    }

    /// Message or status ID, depending on the notification kind.
    pub fn id(&self) -> Option<&str> {
        match self.kind()? {
            NotificationKind::Message => self.message()?.id.as_deref(),
            NotificationKind::Status => self.status()?.id.as_deref(),
            NotificationKind::Errors => None,
        }
    }

    /// Message or status timestamp, depending on the notification kind.
    pub fn timestamp(&self) -> Option<&str> {
        match self.kind()? {
            NotificationKind::Message => self.message()?.timestamp.as_deref(),
            NotificationKind::Status => self.status()?.timestamp.as_deref(),
            NotificationKind::Errors => None,
        }
    }

    /// Text content of the first message.
    pub fn text(&self) -> Option<&Text> {
        self.message()?.text.as_ref()
    }

    /// Reaction content of the first message.
    pub fn reaction(&self) -> Option<&Reaction> {
        self.message()?.reaction.as_ref()
    }

    /// Sticker content of the first message.
    pub fn sticker(&self) -> Option<&Sticker> {
        self.message()?.sticker.as_ref()
    }

    /// Audio content of the first message.
    pub fn audio(&self) -> Option<&Media> {
        self.message()?.audio.as_ref()
    }

    /// Document content of the first message.
    pub fn document_content(&self) -> Option<&Media> {
        self.message()?.document.as_ref()
    }

    /// Image content of the first message.
    pub fn image(&self) -> Option<&Media> {
        self.message()?.image.as_ref()
    }

    /// Video content of the first message.
    pub fn video(&self) -> Option<&Media> {
        self.message()?.video.as_ref()
    }

    /// Location content of the first message.
    pub fn location(&self) -> Option<&Location> {
        self.message()?.location.as_ref()
    }

    /// Contact cards shared in the first message.
    pub fn message_contacts(&self) -> Option<&[ContactCard]> {
        self.message()?.contacts.as_deref()
    }

    /// Button press of the first message.
    pub fn button(&self) -> Option<&Button> {
        self.message()?.button.as_ref()
    }

    /// Interactive reply of the first message.
    pub fn interactive(&self) -> Option<&Interactive> {
        self.message()?.interactive.as_ref()
    }

    /// Order content of the first message.
    pub fn order(&self) -> Option<&Order> {
        self.message()?.order.as_ref()
    }

    /// System notification of the first message.
    pub fn system(&self) -> Option<&System> {
        self.message()?.system.as_ref()
    }

    /// Reply/forward context of the first message.
    pub fn context(&self) -> Option<&Context> {
        self.message()?.context.as_ref()
    }

    /// Errors attached to the first message (unknown/unsupported types).
    pub fn message_errors(&self) -> Option<&[ErrorObject]> {
        self.message()?.errors.as_deref()
    }

    /// First error attached to the first message.
    pub fn message_error(&self) -> Option<&ErrorObject> {
        self.message_errors()?.first()
    }

    /// Errors attached to the first status update.
    pub fn status_errors(&self) -> Option<&[ErrorObject]> {
        self.status()?.errors.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn notification(value: serde_json::Value) -> Notification {
        let document = json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "1042",
                "changes": [{ "field": "messages", "value": value }],
            }],
        });
        Notification::from_slice(document.to_string().as_bytes()).unwrap()
    }

    fn message_notification(message: serde_json::Value) -> Notification {
        notification(json!({
            "messaging_product": "whatsapp",
            "metadata": { "display_phone_number": "15550001111", "phone_number_id": "2233" },
            "contacts": [{ "wa_id": "15550002222", "profile": { "name": "Ada" } }],
            "messages": [message],
        }))
    }

    #[test]
    fn text_message_classifies_and_projects() {
        let view = message_notification(json!({
            "from": "15550002222",
            "id": "wamid.A1",
            "timestamp": "1700000000",
            "type": "text",
            "text": { "body": "hello world" },
        }));

        assert_eq!(view.kind(), Some(NotificationKind::Message));
        assert_eq!(view.message_type(), Some(MessageType::Text));
        assert_eq!(view.text().unwrap().body, "hello world");
        assert_eq!(view.from(), Some("15550002222"));
        assert_eq!(view.id(), Some("wamid.A1"));
        assert_eq!(view.timestamp(), Some("1700000000"));
        assert_eq!(view.contact().unwrap().wa_id.as_deref(), Some("15550002222"));
    }

    #[test]
    fn missing_tag_infers_from_populated_sub_object() {
        let view = message_notification(json!({
            "from": "15550002222",
            "id": "wamid.A2",
            "image": { "id": "media-1", "mime_type": "image/jpeg", "sha256": "ab" },
        }));

        assert_eq!(view.message_type(), Some(MessageType::Image));
    }

    #[test]
    fn inference_probes_in_fixed_order() {
        // Both populated: audio precedes text in the probe order.
        let view = message_notification(json!({
            "text": { "body": "caption-ish" },
            "audio": { "id": "media-2", "mime_type": "audio/ogg" },
        }));

        assert_eq!(view.message_type(), Some(MessageType::Audio));
    }

    #[test]
    fn unrecognized_tag_resolves_to_none() {
        let view = message_notification(json!({
            "type": "hologram",
            "text": { "body": "future tech" },
        }));

        // An explicit tag is authoritative; no presence fallback.
        assert_eq!(view.message_type(), None);
    }

    #[test]
    fn unsupported_tag_carries_message_errors() {
        let view = message_notification(json!({
            "type": "unsupported",
            "errors": [{ "code": 131051, "title": "Unsupported message type" }],
        }));

        assert_eq!(view.message_type(), Some(MessageType::Unsupported));
        assert_eq!(view.message_error().unwrap().code, Some(131051));
    }

    #[test]
    fn status_update_classifies() {
        let view = notification(json!({
            "statuses": [{
                "id": "wamid.B1",
                "status": "delivered",
                "timestamp": "1700000100",
                "recipient_id": "15550002222",
            }],
        }));

        assert_eq!(view.kind(), Some(NotificationKind::Status));
        assert_eq!(view.status_kind(), Some(StatusKind::Delivered));
        assert_eq!(view.id(), Some("wamid.B1"));
    }

    #[test]
    fn failed_status_exposes_errors() {
        let view = notification(json!({
            "statuses": [{
                "id": "wamid.B2",
                "status": "failed",
                "errors": [{ "code": 131, "title": "Unreachable" }],
            }],
        }));

        assert_eq!(view.status_kind(), Some(StatusKind::Failed));
        assert_eq!(view.status_errors().unwrap()[0].code, Some(131));
    }

    #[test]
    fn top_level_errors_classify() {
        let view = notification(json!({
            "errors": [{ "code": 130429, "title": "Rate limit hit" }],
        }));

        assert_eq!(view.kind(), Some(NotificationKind::Errors));
        assert_eq!(view.error().unwrap().code, Some(130429));
    }

    #[test]
    fn messages_win_over_statuses_and_errors() {
        let view = notification(json!({
            "messages": [{ "type": "text", "text": { "body": "hi" } }],
            "statuses": [{ "status": "sent" }],
            "errors": [{ "code": 1 }],
        }));

        assert_eq!(view.kind(), Some(NotificationKind::Message));
    }

    #[test]
    fn empty_document_has_no_kind() {
        let view = Notification::from_slice(b"{}").unwrap();

        assert_eq!(view.kind(), None);
        assert!(view.entry().is_none());
        assert!(view.message().is_none());
        assert!(view.text().is_none());
        assert!(view.id().is_none());
    }

    #[test]
    fn empty_arrays_have_no_kind() {
        let view = notification(json!({ "messages": [], "statuses": [], "errors": [] }));

        assert_eq!(view.kind(), None);
    }

    #[test]
    fn only_first_entry_and_change_are_observed() {
        let document = json!({
            "entry": [
                { "changes": [
                    { "field": "messages", "value": { "messages": [{ "type": "text", "text": { "body": "first" } }] } },
                    { "field": "messages", "value": { "messages": [{ "type": "text", "text": { "body": "second change" } }] } },
                ]},
                { "changes": [
                    { "field": "messages", "value": { "messages": [{ "type": "text", "text": { "body": "second entry" } }] } },
                ]},
            ],
        });
        let view = Notification::from_slice(document.to_string().as_bytes()).unwrap();

        assert_eq!(view.text().unwrap().body, "first");
    }

    #[test]
    fn unknown_status_value_resolves_to_none() {
        let view = notification(json!({ "statuses": [{ "status": "teleported" }] }));

        assert_eq!(view.kind(), Some(NotificationKind::Status));
        assert_eq!(view.status_kind(), None);
    }

    #[test]
    fn interactive_reply_projects() {
        let view = message_notification(json!({
            "type": "interactive",
            "interactive": {
                "type": "button_reply",
                "button_reply": { "id": "approve", "title": "Approve" },
            },
        }));

        assert_eq!(view.message_type(), Some(MessageType::Interactive));
        let reply = view.interactive().unwrap().button_reply.as_ref().unwrap();
        assert_eq!(reply.id.as_deref(), Some("approve"));
    }
}
