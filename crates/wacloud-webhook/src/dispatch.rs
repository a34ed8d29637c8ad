//! Event classification and listener dispatch.
//!
//! The dispatcher owns a process-wide registry mapping a closed set of
//! event kinds to ordered listener lists. Given a classified notification it
//! emits the matching typed payload to every listener registered under that
//! kind, in registration order. The registry may be mutated at any time,
//! including from inside a listener callback; `emit` snapshots the listener
//! list first so an in-progress dispatch neither skips nor duplicates
//! invocations.

use std::{
    collections::HashMap,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use tracing::{debug, error};
use wacloud_core::{
    notification::{
        Button, ContactCard, ErrorObject, Interactive, Location, Media, Message, Order, Reaction,
        Status, Sticker, System, Text,
    },
    MessageType, Notification, NotificationKind, StatusKind,
};

/// The closed set of events a notification can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum EventKind {
    // Message events, named by message type.
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
    // Status events. A failed status emits `Errors`, not a failed event.
    Sent,
    Delivered,
    Read,
    // Account-level errors and failed-status errors.
    Errors,
}

impl EventKind {
    /// The event name as listeners know it.
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
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
            Self::Errors => "errors",
        }
    }
}

impl From<MessageType> for EventKind {
    fn from(message_type: MessageType) -> Self {
        match message_type {
            MessageType::Text => Self::Text,
            MessageType::Reaction => Self::Reaction,
            MessageType::Sticker => Self::Sticker,
            MessageType::Audio => Self::Audio,
            MessageType::Document => Self::Document,
            MessageType::Image => Self::Image,
            MessageType::Video => Self::Video,
            MessageType::Location => Self::Location,
            MessageType::Contacts => Self::Contacts,
            MessageType::Button => Self::Button,
            MessageType::Interactive => Self::Interactive,
            MessageType::Order => Self::Order,
            MessageType::System => Self::System,
            MessageType::Unknown => Self::Unknown,
            MessageType::Unsupported => Self::Unsupported,
        }
    }
}

/// Typed payload handed to listeners alongside the notification view.
#[derive(Debug, Clone)]
pub enum EventPayload {
    /// Text content of a text event.
    Text(Text),
    /// Reaction content of a reaction event.
    Reaction(Reaction),
    /// Sticker content of a sticker event.
    Sticker(Sticker),
    /// Media content of an audio event.
    Audio(Media),
    /// Media content of a document event.
    Document(Media),
    /// Media content of an image event.
    Image(Media),
    /// Media content of a video event.
    Video(Media),
    /// Location content of a location event.
    Location(Location),
    /// Contact cards of a contacts event.
    Contacts(Vec<ContactCard>),
    /// Button press of a button event.
    Button(Button),
    /// Interactive reply of an interactive event.
    Interactive(Interactive),
    /// Order content of an order event.
    Order(Order),
    /// System notification of a system event.
    System(System),
    /// Status object of a sent/delivered/read event.
    Status(Status),
    /// Error objects of an errors, unknown or unsupported event.
    Errors(Vec<ErrorObject>),
}

/// Handle returned by `on`/`once`, used to deregister a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type ListenerFn = dyn Fn(&EventPayload, &Notification) + Send + Sync;

#[derive(Clone)]
struct Registration {
    id: u64,
    once: bool,
    listener: Arc<ListenerFn>,
}

/// Process-wide listener registry with snapshot-at-emit dispatch.
///
/// Listeners are invoked synchronously in registration order and never
/// awaited; a listener doing async work spawns its own task. A panicking
/// listener is logged and isolated so later listeners and the HTTP
/// acknowledgment still run.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Mutex<HashMap<EventKind, Vec<Registration>>>,
    next_id: AtomicU64,
}

impl EventDispatcher {
    /// Creates a dispatcher with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for `kind`, invoked on every matching emit.
    pub fn on(
        &self,
        kind: EventKind,
        listener: impl Fn(&EventPayload, &Notification) + Send + Sync + 'static,
    ) -> ListenerId {
        self.register(kind, false, Arc::new(listener))
    }

    /// Registers a listener for `kind` that deregisters itself after its
    /// first invocation.
    pub fn once(
        &self,
        kind: EventKind,
        listener: impl Fn(&EventPayload, &Notification) + Send + Sync + 'static,
    ) -> ListenerId {
        self.register(kind, true, Arc::new(listener))
    }

    /// Removes a listener. Returns whether it was still registered.
    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let Some(list) = listeners.get_mut(&kind) else { return false };
        let before = list.len();
        list.retain(|registration| registration.id != id.0);
        list.len() != before
    }

    /// Number of listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.lock().get(&kind).map_or(0, Vec::len)
    }

    fn register(&self, kind: EventKind, once: bool, listener: Arc<ListenerFn>) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().entry(kind).or_default().push(Registration { id, once, listener });
        ListenerId(id)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<EventKind, Vec<Registration>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Emits `payload` to every listener registered for `kind`.
    ///
    /// The listener list is snapshotted before the first invocation, so
    /// registrations and removals performed by listeners take effect for the
    /// next emit, not the current one. Once-listeners are deregistered
    /// before their invocation. Returns the number of listeners invoked.
    pub fn emit(&self, kind: EventKind, payload: &EventPayload, notification: &Notification) -> usize {
        let snapshot: Vec<Registration> = {
            let mut listeners = self.lock();
            let Some(list) = listeners.get_mut(&kind) else { return 0 };
            let snapshot = list.clone();
            list.retain(|registration| !registration.once);
            snapshot
        };

        for registration in &snapshot {
            let invocation = AssertUnwindSafe(|| (registration.listener)(payload, notification));
            if catch_unwind(invocation).is_err() {
                error!(event = kind.as_str(), "listener panicked; continuing dispatch");
            }
        }

        snapshot.len()
    }

    /// Classifies a notification and emits the matching event.
    ///
    /// Unclassifiable notifications — no recognizable kind, an unrecognized
    /// message type, or a status value outside the known set — emit nothing;
    /// the caller still acknowledges the delivery. Returns the number of
    /// listeners invoked.
    pub fn dispatch(&self, notification: &Notification) -> usize {
        let Some((kind, payload)) = classify(notification) else {
            debug!("notification did not classify; nothing emitted");
            return 0;
        };

        debug!(event = kind.as_str(), "emitting webhook event");
        self.emit(kind, &payload, notification)
    }
}

/// Resolves a notification into the event it should emit, if any.
fn classify(notification: &Notification) -> Option<(EventKind, EventPayload)> {
    match notification.kind()? {
        NotificationKind::Message => {
            let message_type = notification.message_type()?;
            let message = notification.message()?;
            message_event(message_type, message)
        },
        NotificationKind::Status => {
            let status = notification.status()?;
            match notification.status_kind()? {
                StatusKind::Sent => Some((EventKind::Sent, EventPayload::Status(status.clone()))),
                StatusKind::Delivered => {
                    Some((EventKind::Delivered, EventPayload::Status(status.clone())))
                },
                StatusKind::Read => Some((EventKind::Read, EventPayload::Status(status.clone()))),
                // Failed statuses surface their error list under the errors
                // event; there is no failed event.
                StatusKind::Failed => Some((
                    EventKind::Errors,
                    EventPayload::Errors(status.errors.clone().unwrap_or_default()),
                )),
            }
        },
        NotificationKind::Errors => Some((
            EventKind::Errors,
            EventPayload::Errors(notification.errors().unwrap_or_default().to_vec()),
        )),
    }
}

/// Pairs a resolved message type with its populated sub-object.
///
/// A message whose explicit tag names an absent sub-object emits nothing.
fn message_event(message_type: MessageType, message: &Message) -> Option<(EventKind, EventPayload)> {
    let kind = EventKind::from(message_type);
    let payload = match message_type {
        MessageType::Text => EventPayload::Text(message.text.clone()?),
        MessageType::Reaction => EventPayload::Reaction(message.reaction.clone()?),
        MessageType::Sticker => EventPayload::Sticker(message.sticker.clone()?),
        MessageType::Audio => EventPayload::Audio(message.audio.clone()?),
        MessageType::Document => EventPayload::Document(message.document.clone()?),
        MessageType::Image => EventPayload::Image(message.image.clone()?),
        MessageType::Video => EventPayload::Video(message.video.clone()?),
        MessageType::Location => EventPayload::Location(message.location.clone()?),
        MessageType::Contacts => EventPayload::Contacts(message.contacts.clone()?),
        MessageType::Button => EventPayload::Button(message.button.clone()?),
        MessageType::Interactive => EventPayload::Interactive(message.interactive.clone()?),
        MessageType::Order => EventPayload::Order(message.order.clone()?),
        MessageType::System => EventPayload::System(message.system.clone()?),
        MessageType::Unknown | MessageType::Unsupported => {
            EventPayload::Errors(message.errors.clone().unwrap_or_default())
        },
    };
    Some((kind, payload))
}
