//! Webhook authentication tests, driven through the real router.
//!
//! Every payload must carry a fresh HMAC signature; anything else is a
//! 400 and the link it names must be left untouched.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rust_decimal_macros::dec;
use sha2::Sha256;
use tower::ServiceExt;
use uuid::Uuid;

use studio_content::{MemoryBlogStore, MemoryEventStore};
use studio_leads::{Mailer, MemoryLeadStore, MemoryMailer};
use studio_payments::{
    AcquiringGateway, Currency, Lifecycle, LinkStatus, MemoryLinkStore, MockAcquiringGateway,
    PaymentLink, WebhookVerifier,
};
use studio_server::config::{PaymentsConfig, ServerConfig};
use studio_server::router;
use studio_server::state::AppState;

const WEBHOOK_SECRET: &str = "whsec_test_secret";
const ADMIN_TOKEN: &str = "admin-token-0123456789";

struct TestApp {
    app: Router,
    lifecycle: Arc<Lifecycle<MemoryLinkStore>>,
}

fn test_app() -> TestApp {
    let config = Arc::new(ServerConfig {
        bind_addr: "127.0.0.1:0".into(),
        public_base_url: "http://localhost:3000".into(),
        admin_token: ADMIN_TOKEN.into(),
        contact_email: "inbox@studio.test".into(),
        payments: Some(PaymentsConfig {
            gateway_base_url: "https://gw.test".into(),
            gateway_token: "token".into(),
            webhook_secret: WEBHOOK_SECRET.into(),
        }),
    });

    let lifecycle = Arc::new(Lifecycle::new(Arc::new(MemoryLinkStore::new())));
    let gateway: Arc<dyn AcquiringGateway> = Arc::new(MockAcquiringGateway::new());
    let mailer: Arc<dyn Mailer> = Arc::new(MemoryMailer::new());

    let state = AppState {
        blog: Arc::new(MemoryBlogStore::new()),
        events: Arc::new(MemoryEventStore::new()),
        leads: Arc::new(MemoryLeadStore::new()),
        mailer,
        lifecycle: lifecycle.clone(),
        gateway: Some(gateway),
        verifier: Some(Arc::new(WebhookVerifier::new(WEBHOOK_SECRET))),
        config,
    };

    TestApp {
        app: router(state),
        lifecycle,
    }
}

fn seeded_link(app: &TestApp) -> PaymentLink {
    app.lifecycle
        .create(PaymentLink::new(
            "Client",
            "Website",
            dec!(1000),
            dec!(0),
            Currency::Uah,
        ))
        .unwrap()
}

fn callback_body(reference: &Uuid, status: &str) -> String {
    serde_json::json!({
        "reference": reference.to_string(),
        "status": status,
        "invoiceId": "inv_test",
    })
    .to_string()
}

fn sign(secret: &str, body: &str, ts: i64) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{ts}.{body}").as_bytes());
    format!("t={ts},v1={}", hex::encode(mac.finalize().into_bytes()))
}

fn webhook_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhooks/acquiring")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("x-callback-signature", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn valid_signature_marks_the_link_paid() {
    let test = test_app();
    let link = seeded_link(&test);

    let body = callback_body(&link.unique_id, "success");
    let signature = sign(WEBHOOK_SECRET, &body, Utc::now().timestamp());

    let response = test
        .app
        .oneshot(webhook_request(&body, Some(&signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let ack: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(ack["ok"], true);
    assert_eq!(ack["changed"], true);

    let stored = test.lifecycle.find(&link.unique_id).unwrap();
    assert_eq!(stored.status, LinkStatus::Paid);
}

#[tokio::test]
async fn missing_signature_is_rejected() {
    let test = test_app();
    let link = seeded_link(&test);

    let body = callback_body(&link.unique_id, "success");
    let response = test.app.oneshot(webhook_request(&body, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let stored = test.lifecycle.find(&link.unique_id).unwrap();
    assert_eq!(stored.status, LinkStatus::Created);
}

#[tokio::test]
async fn forged_signature_is_rejected_without_mutation() {
    let test = test_app();
    let link = seeded_link(&test);

    let body = callback_body(&link.unique_id, "success");
    let signature = sign("some_other_secret", &body, Utc::now().timestamp());

    let response = test
        .app
        .oneshot(webhook_request(&body, Some(&signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let stored = test.lifecycle.find(&link.unique_id).unwrap();
    assert_eq!(stored.status, LinkStatus::Created);
}

#[tokio::test]
async fn stale_timestamp_is_rejected() {
    let test = test_app();
    let link = seeded_link(&test);

    let body = callback_body(&link.unique_id, "success");
    let signature = sign(WEBHOOK_SECRET, &body, Utc::now().timestamp() - 600);

    let response = test
        .app
        .oneshot(webhook_request(&body, Some(&signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_reference_is_a_bad_request() {
    let test = test_app();

    let body = callback_body(&Uuid::new_v4(), "success");
    let signature = sign(WEBHOOK_SECRET, &body, Utc::now().timestamp());

    let response = test
        .app
        .oneshot(webhook_request(&body, Some(&signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_success_delivery_is_acknowledged_unchanged() {
    let test = test_app();
    let link = seeded_link(&test);

    let body = callback_body(&link.unique_id, "success");
    let signature = sign(WEBHOOK_SECRET, &body, Utc::now().timestamp());

    let first = test
        .app
        .clone()
        .oneshot(webhook_request(&body, Some(&signature)))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = test
        .app
        .oneshot(webhook_request(&body, Some(&signature)))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    let bytes = to_bytes(second.into_body(), usize::MAX).await.unwrap();
    let ack: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(ack["ok"], true);
    assert_eq!(ack["changed"], false);

    let stored = test.lifecycle.find(&link.unique_id).unwrap();
    assert_eq!(stored.status, LinkStatus::Paid);
}

#[tokio::test]
async fn admin_endpoints_require_the_token() {
    let test = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/links")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "client_name": "Client",
                "original_amount": "1000",
            })
            .to_string(),
        ))
        .unwrap();

    let response = test.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
