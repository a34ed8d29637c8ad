//! End-to-end test of the client/server pair.
//!
//! Drives the inbound pipeline through the real router and the outbound
//! client against a mock platform: a signed text notification arrives, the
//! text listener reacts by sending a reply through the client, and the
//! delivery status for that reply flows back through the webhook.

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;
use wacloud_client::{ClientConfig, CloudApiClient};
use wacloud_webhook::{
    create_router,
    dispatch::{EventDispatcher, EventKind, EventPayload},
    handlers::{WebhookConfig, WebhookState},
    signature, SIGNATURE_HEADER,
};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

const VERIFY_TOKEN: &str = "e2e-verify";
const APP_SECRET: &str = "e2e-secret";

fn notification_body(value: serde_json::Value) -> String {
    serde_json::json!({
        "object": "whatsapp_business_account",
        "entry": [{ "id": "1042", "changes": [{ "field": "messages", "value": value }] }],
    })
    .to_string()
}

fn signed_post(payload: &str) -> Request<Body> {
    let digest = signature::signature_hex(payload.as_bytes(), APP_SECRET).unwrap();
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, format!("sha256={digest}"))
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn inbound_text_triggers_outbound_reply() {
    // Mock platform accepting outbound sends.
    let platform = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/v17.0/2233/messages"))
        .and(matchers::body_partial_json(serde_json::json!({
            "messaging_product": "whatsapp",
            "type": "text",
            "to": "15550002222",
            "context": { "message_id": "wamid.IN1" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messaging_product": "whatsapp",
            "messages": [{ "id": "wamid.REPLY1" }],
        })))
        .mount(&platform)
        .await;

    let client = CloudApiClient::new(
        ClientConfig::new("e2e-token", "2233").with_base_url(platform.uri()),
    )
    .unwrap();

    let dispatcher = Arc::new(EventDispatcher::new());
    let replies = Arc::new(Mutex::new(Vec::new()));
    {
        let replies = replies.clone();
        dispatcher.on(EventKind::Text, move |payload, view| {
            let EventPayload::Text(text) = payload else { return };
            let client = client.clone();
            let replies = replies.clone();
            let to = view.from().unwrap().to_string();
            let in_reply_to = view.id().unwrap().to_string();
            let body = format!("echo: {}", text.body);
            tokio::spawn(async move {
                let receipt = client.reply_to_text(to, in_reply_to, body).await.unwrap();
                replies.lock().unwrap().push(receipt.message_id().unwrap().to_string());
            });
        });
    }

    let router = create_router(WebhookState::new(
        dispatcher.clone(),
        WebhookConfig::new(VERIFY_TOKEN).with_app_secret(APP_SECRET),
    ));

    let payload = notification_body(serde_json::json!({
        "messaging_product": "whatsapp",
        "metadata": { "phone_number_id": "2233" },
        "contacts": [{ "wa_id": "15550002222", "profile": { "name": "Ada" } }],
        "messages": [{
            "from": "15550002222",
            "id": "wamid.IN1",
            "timestamp": "1700000000",
            "type": "text",
            "text": { "body": "hello world" },
        }],
    }));
    let response = router.clone().oneshot(signed_post(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The reply runs in a spawned task; wait for it to land.
    for _ in 0..100 {
        if !replies.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(*replies.lock().unwrap(), vec!["wamid.REPLY1"]);

    // The platform later reports the reply as delivered.
    let delivered = Arc::new(Mutex::new(Vec::new()));
    {
        let delivered = delivered.clone();
        dispatcher.on(EventKind::Delivered, move |payload, _| {
            let EventPayload::Status(status) = payload else { return };
            delivered.lock().unwrap().push(status.id.clone().unwrap());
        });
    }

    let status_payload = notification_body(serde_json::json!({
        "statuses": [{
            "id": "wamid.REPLY1",
            "status": "delivered",
            "timestamp": "1700000050",
            "recipient_id": "15550002222",
        }],
    }));
    let response = router.oneshot(signed_post(&status_payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(*delivered.lock().unwrap(), vec!["wamid.REPLY1"]);
}

#[tokio::test]
async fn subscription_handshake_round_trip() {
    let dispatcher = Arc::new(EventDispatcher::new());
    let router =
        create_router(WebhookState::new(dispatcher, WebhookConfig::new(VERIFY_TOKEN)));

    let accepted = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/webhook?hub.mode=subscribe&hub.verify_token={VERIFY_TOKEN}&hub.challenge=1158201444"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(accepted.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes.as_ref(), b"1158201444");

    let rejected = router
        .oneshot(
            Request::builder()
                .uri("/webhook?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=1158201444")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_notification_shapes_never_break_the_integration() {
    let dispatcher = Arc::new(EventDispatcher::new());
    let fired = Arc::new(Mutex::new(0u32));
    {
        let fired = fired.clone();
        for kind in [EventKind::Text, EventKind::Errors, EventKind::Sent] {
            let fired = fired.clone();
            dispatcher.on(kind, move |_, _| *fired.lock().unwrap() += 1);
        }
    }
    let router = create_router(WebhookState::new(
        dispatcher,
        WebhookConfig::new(VERIFY_TOKEN).with_app_secret(APP_SECRET),
    ));

    // A future notification field this integration knows nothing about.
    let payload = notification_body(serde_json::json!({
        "account_review_update": { "decision": "APPROVED" },
    }));
    let response = router.oneshot(signed_post(&payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*fired.lock().unwrap(), 0);
}
