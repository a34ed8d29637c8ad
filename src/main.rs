//! Wacloud webhook service.
//!
//! Binds the webhook receiver, wires default listeners for inbound
//! messages, statuses, and errors, and marks received text messages as read
//! through the outbound client.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use wacloud_client::CloudApiClient;
use wacloud_webhook::{
    dispatch::{EventDispatcher, EventKind, EventPayload},
    handlers::WebhookState,
};

mod config;

use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config.rust_log);

    info!("Starting wacloud webhook service");

    let client = CloudApiClient::new(config.to_client_config()?)
        .context("Failed to construct API client")?;

    let dispatcher = Arc::new(EventDispatcher::new());
    register_listeners(&dispatcher, client);

    let addr = config.server_addr()?;
    let state = WebhookState::new(dispatcher, config.to_webhook_config());

    if state.config.app_secret.is_none() {
        warn!("no app secret configured; payload signature verification is disabled");
    }

    info!(%addr, api_version = %config.api_version, "wacloud is ready to receive notifications");

    wacloud_webhook::start_server(state, addr).await.context("Server failed")?;

    info!("wacloud shutdown complete");
    Ok(())
}

/// Initializes tracing with the configured filter, overridable via
/// `RUST_LOG`.
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Registers the service's default listeners.
///
/// Text messages are logged and marked as read; statuses and errors are
/// logged. Listener callbacks are synchronous, so the outbound call runs in
/// its own task and reports failures through the log.
fn register_listeners(dispatcher: &EventDispatcher, client: CloudApiClient) {
    dispatcher.on(EventKind::Text, move |payload, view| {
        let EventPayload::Text(text) = payload else { return };
        info!(from = view.from().unwrap_or("<unknown>"), body = %text.body, "text message received");

        let Some(message_id) = view.id().map(str::to_string) else { return };
        let client = client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.mark_as_read(&message_id).await {
                error!(error = %e, %message_id, "failed to mark message as read");
            }
        });
    });

    dispatcher.on(EventKind::Reaction, |payload, view| {
        let EventPayload::Reaction(reaction) = payload else { return };
        info!(
            from = view.from().unwrap_or("<unknown>"),
            emoji = reaction.emoji.as_deref().unwrap_or(""),
            "reaction received"
        );
    });

    for status_event in [EventKind::Sent, EventKind::Delivered, EventKind::Read] {
        dispatcher.on(status_event, move |payload, _| {
            let EventPayload::Status(status) = payload else { return };
            info!(
                event = status_event.as_str(),
                message_id = status.id.as_deref().unwrap_or("<unknown>"),
                recipient = status.recipient_id.as_deref().unwrap_or("<unknown>"),
                "status update"
            );
        });
    }

    dispatcher.on(EventKind::Errors, |payload, _| {
        let EventPayload::Errors(errors) = payload else { return };
        for platform_error in errors {
            warn!(
                code = platform_error.code.unwrap_or_default(),
                title = platform_error.title.as_deref().unwrap_or("<unknown>"),
                "platform reported an error"
            );
        }
    });
}
