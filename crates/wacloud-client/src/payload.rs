//! Outbound message payloads.
//!
//! Data shapes for the `/messages` endpoint. [`MessagePayload`] is the
//! envelope; [`MessageContent`] supplies both the `type` tag and the typed
//! sub-object, so an envelope can never carry a mismatched tag.

use serde::Serialize;
use wacloud_core::notification::ContactCard;

/// Value of `messaging_product` on every outbound payload.
pub const MESSAGING_PRODUCT: &str = "whatsapp";

/// Reference to a media asset, either hosted (`link`) or uploaded (`id`).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MediaRef {
    /// Publicly reachable URL of the asset.
    Link {
        /// The asset URL.
        link: String,
    },
    /// Media ID returned by a previous upload.
    Id {
        /// The uploaded media ID.
        id: String,
    },
}

impl MediaRef {
    /// Creates a link reference.
    pub fn link(url: impl Into<String>) -> Self {
        Self::Link { link: url.into() }
    }

    /// Creates an uploaded-media reference.
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id { id: id.into() }
    }
}

/// Media attachment with optional caption and filename.
#[derive(Debug, Clone, Serialize)]
pub struct MediaPayload {
    /// The referenced asset.
    #[serde(flatten)]
    pub media: MediaRef,

    /// Caption shown under the media.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Filename, documents only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl MediaPayload {
    /// Creates a bare media payload.
    pub fn new(media: MediaRef) -> Self {
        Self { media, caption: None, filename: None }
    }

    /// Attaches a caption.
    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Attaches a filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Text message body.
#[derive(Debug, Clone, Serialize)]
pub struct TextPayload {
    /// Whether to render URL previews.
    pub preview_url: bool,

    /// The message text.
    pub body: String,
}

/// Emoji reaction to an earlier message.
#[derive(Debug, Clone, Serialize)]
pub struct ReactionPayload {
    /// ID of the message to react to.
    pub message_id: String,

    /// The reaction emoji; an empty string removes the reaction.
    pub emoji: String,
}

/// Location pin.
#[derive(Debug, Clone, Serialize)]
pub struct LocationPayload {
    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// Location name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Location address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Reference to a pre-approved message template.
#[derive(Debug, Clone, Serialize)]
pub struct TemplatePayload {
    /// Template name.
    pub name: String,

    /// Template language.
    pub language: TemplateLanguage,

    /// Component parameter values, when the template takes any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<serde_json::Value>,
}

/// Language block of a template reference.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateLanguage {
    /// Language-and-locale code, e.g. `en_US`.
    pub code: String,
}

impl TemplatePayload {
    /// Creates a template reference without component parameters.
    pub fn new(name: impl Into<String>, language_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: TemplateLanguage { code: language_code.into() },
            components: None,
        }
    }
}

/// Reply context linking a message to the one it answers.
#[derive(Debug, Clone, Serialize)]
pub struct MessageContext {
    /// ID of the message being replied to.
    pub message_id: String,
}

/// The typed content of an outbound message.
///
/// Serializes externally tagged, producing the `"text": {...}` style
/// sub-object the endpoint expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContent {
    /// Plain text.
    Text(TextPayload),
    /// Emoji reaction.
    Reaction(ReactionPayload),
    /// Location pin.
    Location(LocationPayload),
    /// Sticker.
    Sticker(MediaRef),
    /// Image with optional caption.
    Image(MediaPayload),
    /// Audio clip.
    Audio(MediaRef),
    /// Video with optional caption.
    Video(MediaPayload),
    /// Document with optional caption and filename.
    Document(MediaPayload),
    /// Contact cards.
    Contacts(Vec<ContactCard>),
    /// Pre-approved template.
    Template(TemplatePayload),
}

impl MessageContent {
    /// The `type` tag matching this content.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Reaction(_) => "reaction",
            Self::Location(_) => "location",
            Self::Sticker(_) => "sticker",
            Self::Image(_) => "image",
            Self::Audio(_) => "audio",
            Self::Video(_) => "video",
            Self::Document(_) => "document",
            Self::Contacts(_) => "contacts",
            Self::Template(_) => "template",
        }
    }
}

/// Complete outbound message envelope for the `/messages` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MessagePayload {
    /// Always `whatsapp`.
    pub messaging_product: &'static str,

    /// Recipient addressing mode, `individual` unless overridden.
    pub recipient_type: String,

    /// Recipient WhatsApp ID.
    pub to: String,

    /// Message type tag, derived from the content.
    #[serde(rename = "type")]
    pub kind: &'static str,

    /// Reply context, set via [`MessagePayload::in_reply_to`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<MessageContext>,

    /// The typed message content.
    #[serde(flatten)]
    pub content: MessageContent,
}

impl MessagePayload {
    /// Creates an envelope addressed to `to` carrying `content`.
    pub fn new(to: impl Into<String>, content: MessageContent) -> Self {
        Self {
            messaging_product: MESSAGING_PRODUCT,
            recipient_type: "individual".to_string(),
            to: to.into(),
            kind: content.tag(),
            context: None,
            content,
        }
    }

    /// Creates a text message without URL previews.
    pub fn text(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(to, MessageContent::Text(TextPayload { preview_url: false, body: body.into() }))
    }

    /// Creates a text message with URL previews enabled.
    pub fn text_with_preview(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(to, MessageContent::Text(TextPayload { preview_url: true, body: body.into() }))
    }

    /// Creates an emoji reaction.
    pub fn reaction(
        to: impl Into<String>,
        message_id: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Self {
        Self::new(
            to,
            MessageContent::Reaction(ReactionPayload {
                message_id: message_id.into(),
                emoji: emoji.into(),
            }),
        )
    }

    /// Creates a location message.
    pub fn location(to: impl Into<String>, location: LocationPayload) -> Self {
        Self::new(to, MessageContent::Location(location))
    }

    /// Creates a sticker message.
    pub fn sticker(to: impl Into<String>, sticker: MediaRef) -> Self {
        Self::new(to, MessageContent::Sticker(sticker))
    }

    /// Creates an image message.
    pub fn image(to: impl Into<String>, image: MediaPayload) -> Self {
        Self::new(to, MessageContent::Image(image))
    }

    /// Creates an audio message.
    pub fn audio(to: impl Into<String>, audio: MediaRef) -> Self {
        Self::new(to, MessageContent::Audio(audio))
    }

    /// Creates a video message.
    pub fn video(to: impl Into<String>, video: MediaPayload) -> Self {
        Self::new(to, MessageContent::Video(video))
    }

    /// Creates a document message.
    pub fn document(to: impl Into<String>, document: MediaPayload) -> Self {
        Self::new(to, MessageContent::Document(document))
    }

    /// Creates a contacts message.
    pub fn contacts(to: impl Into<String>, contacts: Vec<ContactCard>) -> Self {
        Self::new(to, MessageContent::Contacts(contacts))
    }

    /// Creates a template message.
    pub fn template(to: impl Into<String>, template: TemplatePayload) -> Self {
        Self::new(to, MessageContent::Template(template))
    }

    /// Marks the message as a reply to `message_id`.
    #[must_use]
    pub fn in_reply_to(mut self, message_id: impl Into<String>) -> Self {
        self.context = Some(MessageContext { message_id: message_id.into() });
        self
    }

    /// Overrides the recipient addressing mode.
    #[must_use]
    pub fn with_recipient_type(mut self, recipient_type: impl Into<String>) -> Self {
        self.recipient_type = recipient_type.into();
        self
    }
}

/// Payload marking an inbound message as read.
#[derive(Debug, Clone, Serialize)]
pub struct MarkReadPayload {
    /// Always `whatsapp`.
    pub messaging_product: &'static str,

    /// Always `read`.
    pub status: &'static str,

    /// ID of the message to mark.
    pub message_id: String,
}

impl MarkReadPayload {
    /// Creates a mark-as-read payload for `message_id`.
    pub fn new(message_id: impl Into<String>) -> Self {
        Self { messaging_product: MESSAGING_PRODUCT, status: "read", message_id: message_id.into() }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn text_envelope_serializes_with_matching_tag() {
        let payload = MessagePayload::text("15550002222", "Hi! From the client.");
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": "15550002222",
                "type": "text",
                "text": { "preview_url": false, "body": "Hi! From the client." },
            })
        );
    }

    #[test]
    fn reply_carries_context() {
        let payload = MessagePayload::text("15550002222", "answer").in_reply_to("wamid.Q1");
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["context"], json!({ "message_id": "wamid.Q1" }));
        assert_eq!(value["type"], "text");
    }

    #[test]
    fn media_reference_serializes_by_variant() {
        let by_link = MessagePayload::image(
            "15550002222",
            MediaPayload::new(MediaRef::link("https://cdn.example/cat.jpg")).with_caption("cat"),
        );
        let value = serde_json::to_value(&by_link).unwrap();
        assert_eq!(
            value["image"],
            json!({ "link": "https://cdn.example/cat.jpg", "caption": "cat" })
        );

        let by_id = MessagePayload::audio("15550002222", MediaRef::id("media-7"));
        let value = serde_json::to_value(&by_id).unwrap();
        assert_eq!(value["audio"], json!({ "id": "media-7" }));
        assert_eq!(value["type"], "audio");
    }

    #[test]
    fn location_omits_absent_fields() {
        let payload = MessagePayload::location(
            "15550002222",
            LocationPayload { latitude: 90.0, longitude: 0.0, name: None, address: None },
        );
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["location"], json!({ "latitude": 90.0, "longitude": 0.0 }));
    }

    #[test]
    fn template_serializes_language_block() {
        let payload =
            MessagePayload::template("15550002222", TemplatePayload::new("hello_world", "en_US"));
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value["template"],
            json!({ "name": "hello_world", "language": { "code": "en_US" } })
        );
    }

    #[test]
    fn mark_read_payload_shape() {
        let value = serde_json::to_value(MarkReadPayload::new("wamid.R1")).unwrap();

        assert_eq!(
            value,
            json!({
                "messaging_product": "whatsapp",
                "status": "read",
                "message_id": "wamid.R1",
            })
        );
    }
}
