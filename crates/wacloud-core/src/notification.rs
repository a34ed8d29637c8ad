//! Wire model of the webhook notification document.
//!
//! Mirrors the JSON the platform POSTs to a subscribed webhook: one
//! top-level object holding entries, each holding changes, each holding a
//! value with at most one of `messages`, `statuses` or `errors` populated.
//! Every nesting level is optional so that partial or unfamiliar documents
//! still deserialize; classification happens in [`crate::view`], not here.

use serde::{Deserialize, Serialize};

/// Top-level notification document delivered to the webhook endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationDocument {
    /// Object type, `whatsapp_business_account` for genuine notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// Entries batched into this delivery.
    #[serde(default)]
    pub entry: Vec<Entry>,
}

/// One notification entry, scoped to a business account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    /// The business account ID subscribed to the webhook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Changes recorded for this entry.
    #[serde(default)]
    pub changes: Vec<Change>,
}

/// A single change inside an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Change {
    /// Notification field, `messages` for everything this crate handles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// The value object carrying the actual notification content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ChangeValue>,
}

/// The value object of a change.
///
/// At most one of `messages`, `statuses` or `errors` is populated; which one
/// determines the notification kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeValue {
    /// Always `whatsapp`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messaging_product: Option<String>,

    /// The business phone number this notification belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// Profiles of the customers involved in the notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<ContactProfile>>,

    /// Account-level errors, populated when the notification reports errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorObject>>,

    /// Inbound customer messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,

    /// Delivery status updates for messages the business sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<Status>>,
}

/// Metadata describing the receiving business phone number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Display form of the business phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_phone_number: Option<String>,

    /// The phone number ID used when sending replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number_id: Option<String>,
}

/// A customer profile attached to the notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactProfile {
    /// The customer's WhatsApp ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wa_id: Option<String>,

    /// Profile details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

/// Customer profile details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// The customer's profile name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An inbound message received by the business.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    /// The sender's WhatsApp ID; replies are addressed to this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Message ID assigned by the platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Unix timestamp (as a string) when the platform received the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Explicit message type tag. Some payloads omit it, in which case the
    /// type is inferred from whichever sub-object is present.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Context of a reply or forwarded message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,

    /// Identity-change information, shape left opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<serde_json::Value>,

    /// Audio or voice-note content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Media>,

    /// Quick-reply button press.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<Button>,

    /// Shared contact cards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<ContactCard>>,

    /// Document attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Media>,

    /// Errors for unknown or unsupported messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorObject>>,

    /// Image content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Media>,

    /// Interactive reply (button or list selection).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactive: Option<Interactive>,

    /// Shared location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Order placed from a product catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,

    /// Emoji reaction to an earlier message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction: Option<Reaction>,

    /// Referral information, shape left opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral: Option<serde_json::Value>,

    /// Sticker content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker: Option<Sticker>,

    /// System notification (number or identity change).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<System>,

    /// Plain text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,

    /// Video content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Media>,
}

/// Context attached to replies and forwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    /// Whether the message was forwarded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarded: Option<bool>,

    /// Whether the message was forwarded many times.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequently_forwarded: Option<bool>,

    /// WhatsApp ID of the original sender.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// ID of the message being replied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Catalog product the message refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referred_product: Option<ReferredProduct>,
}

/// Catalog product reference inside a message context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferredProduct {
    /// Catalog the product belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,

    /// Retailer-assigned product ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_retailer_id: Option<String>,
}

/// Plain text message content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Text {
    /// The message body.
    #[serde(default)]
    pub body: String,
}

/// Emoji reaction content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reaction {
    /// ID of the message being reacted to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// The reaction emoji; absent when a reaction is removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// Media content shared by audio, document, image and video messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Media {
    /// Media ID used to download the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// MIME type of the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// SHA-256 checksum of the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// Caption, where the message type supports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Original filename, for documents and videos.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Sticker content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sticker {
    /// Media ID used to download the sticker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// MIME type, `image/webp` in practice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// SHA-256 checksum of the sticker asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// Whether the sticker is animated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
}

/// Quick-reply button press.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Button {
    /// Developer-defined payload of the pressed button.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,

    /// Button label as shown to the customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Interactive message reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Interactive {
    /// Reply kind: `button_reply` or `list_reply`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Populated when the customer pressed a reply button.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_reply: Option<InteractiveReply>,

    /// Populated when the customer selected a list row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_reply: Option<InteractiveReply>,
}

/// A selected button or list row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractiveReply {
    /// Developer-assigned ID of the selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Title shown to the customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Row description, list replies only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Shared location content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Location name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Location address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// An order placed from a product catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Order {
    /// Catalog the order was placed from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,

    /// Free-text note attached to the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Ordered items.
    #[serde(default)]
    pub product_items: Vec<ProductItem>,
}

/// One item of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductItem {
    /// Retailer-assigned product ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_retailer_id: Option<String>,

    /// Quantity ordered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,

    /// Unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_price: Option<String>,

    /// Price currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// System notification about a customer number or identity change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct System {
    /// Human-readable description of the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// New identity hash, for identity changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,

    /// New WhatsApp ID, for number changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wa_id: Option<String>,

    /// Change kind: `customer_changed_number` or `customer_identity_changed`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// The affected customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

/// A shared contact card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactCard {
    /// Contact name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ContactName>,

    /// Birthday as a `YYYY-MM-DD` string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,

    /// Postal addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<ContactAddress>>,

    /// Email addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<ContactEmail>>,

    /// Organization details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<ContactOrg>,

    /// Phone numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phones: Option<Vec<ContactPhone>>,

    /// URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<ContactUrl>>,
}

/// Name block of a contact card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactName {
    /// Full name as normally displayed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_name: Option<String>,

    /// First name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Middle name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,

    /// Name suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Name prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

/// Postal address of a contact card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactAddress {
    /// Street number and name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    /// City name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// State abbreviation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// ZIP code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,

    /// Full country name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Two-letter country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    /// `HOME` or `WORK`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Email address of a contact card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactEmail {
    /// The email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// `HOME` or `WORK`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Organization block of a contact card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactOrg {
    /// Company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Department name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    /// Business title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Phone number of a contact card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactPhone {
    /// Formatted phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// `CELL`, `MAIN`, `IPHONE`, `HOME` or `WORK`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// WhatsApp ID of the number, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wa_id: Option<String>,
}

/// URL of a contact card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactUrl {
    /// The URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// `HOME` or `WORK`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Delivery status update for a message the business sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    /// ID of the message the status refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Raw status value: `sent`, `delivered`, `read` or `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Unix timestamp (as a string) of the status change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// WhatsApp ID of the message recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,

    /// Opaque callback data echoed from the sent message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biz_opaque_callback_data: Option<String>,

    /// Conversation the status belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation: Option<Conversation>,

    /// Pricing information for the conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,

    /// Errors, populated for `failed` statuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorObject>>,
}

/// Conversation block of a status update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Conversation category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<ConversationOrigin>,

    /// Expiry timestamp, `sent` statuses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_timestamp: Option<String>,
}

/// Conversation entry-point category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationOrigin {
    /// Category such as `marketing`, `utility` or `service`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Pricing block of a status update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pricing {
    /// Conversation category being billed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Pricing model, `CBP` currently.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_model: Option<String>,

    /// Whether the conversation is billable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
}

/// An error reported by the platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Numeric error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,

    /// Error code title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Error message, typically identical to the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_data: Option<ErrorData>,
}

/// Detail block of an error object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorData {
    /// Human-readable description of the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
