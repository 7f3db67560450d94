//! Payment page flow, driven through the real router with a mock gateway.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use rust_decimal_macros::dec;
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

struct TestApp {
    app: Router,
    lifecycle: Arc<Lifecycle<MemoryLinkStore>>,
    gateway: Arc<MockAcquiringGateway>,
}

fn test_app(payments_configured: bool) -> TestApp {
    let config = Arc::new(ServerConfig {
        bind_addr: "127.0.0.1:0".into(),
        public_base_url: "https://studio.test".into(),
        admin_token: "admin-token-0123456789".into(),
        contact_email: "inbox@studio.test".into(),
        payments: payments_configured.then(|| PaymentsConfig {
            gateway_base_url: "https://gw.test".into(),
            gateway_token: "token".into(),
            webhook_secret: "whsec_test".into(),
        }),
    });

    let lifecycle = Arc::new(Lifecycle::new(Arc::new(MemoryLinkStore::new())));
    let gateway = Arc::new(MockAcquiringGateway::new());
    let mailer: Arc<dyn Mailer> = Arc::new(MemoryMailer::new());

    let state = AppState {
        blog: Arc::new(MemoryBlogStore::new()),
        events: Arc::new(MemoryEventStore::new()),
        leads: Arc::new(MemoryLeadStore::new()),
        mailer,
        lifecycle: lifecycle.clone(),
        gateway: payments_configured
            .then(|| gateway.clone() as Arc<dyn AcquiringGateway>),
        verifier: payments_configured.then(|| Arc::new(WebhookVerifier::new("whsec_test"))),
        config,
    };

    TestApp {
        app: router(state),
        lifecycle,
        gateway,
    }
}

fn seeded_link(test: &TestApp) -> PaymentLink {
    test.lifecycle
        .create(
            PaymentLink::new("Client", "Website", dec!(1000), dec!(100), Currency::Uah)
                .with_duration_minutes(60),
        )
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

fn post(path: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

async fn html(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn opening_the_page_shows_the_discounted_amount() {
    let test = test_app(true);
    let link = seeded_link(&test);

    let response = test
        .app
        .oneshot(get(&format!("/pay/{}", link.unique_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = html(response).await;
    assert!(page.contains("900 UAH"));

    // The view stamped the expiry anchor.
    let stored = test.lifecycle.find(&link.unique_id).unwrap();
    assert!(stored.first_opened_at.is_some());
}

#[tokio::test]
async fn unknown_link_is_a_404() {
    let test = test_app(true);
    let response = test
        .app
        .oneshot(get(&format!("/pay/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invoice_request_redirects_to_the_hosted_page() {
    let test = test_app(true);
    let link = seeded_link(&test);

    let response = test
        .app
        .clone()
        .oneshot(post(&format!("/pay/{}/invoice", link.unique_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(location.starts_with("https://pay.example.test/"));

    // The gateway was given URLs built from the public base URL.
    let calls = test.gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].redirect_url,
        format!("https://studio.test/pay/{}/success", link.unique_id)
    );
    assert_eq!(calls[0].webhook_url, "https://studio.test/webhooks/acquiring");
    assert_eq!(calls[0].amount_minor, 90_000);

    // Re-requesting reuses the stored invoice instead of calling out again.
    let again = test
        .app
        .oneshot(post(&format!("/pay/{}/invoice", link.unique_id)))
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::SEE_OTHER);
    assert_eq!(test.gateway.calls().len(), 1);
}

#[tokio::test]
async fn gateway_failure_renders_the_failure_view_and_persists_nothing() {
    let test = test_app(true);
    let link = seeded_link(&test);
    test.gateway.set_failing(true);

    let response = test
        .app
        .clone()
        .oneshot(post(&format!("/pay/{}/invoice", link.unique_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let page = html(response).await;
    assert!(page.contains("Payment failed"));

    let stored = test.lifecycle.find(&link.unique_id).unwrap();
    assert_eq!(stored.status, LinkStatus::Created);
    assert!(stored.invoice.is_none());

    // Retrying after the gateway recovers succeeds.
    test.gateway.set_failing(false);
    let retry = test
        .app
        .oneshot(post(&format!("/pay/{}/invoice", link.unique_id)))
        .await
        .unwrap();
    assert_eq!(retry.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn deactivated_link_renders_the_inactive_view() {
    let test = test_app(true);
    let link = seeded_link(&test);
    test.lifecycle.deactivate(&link.unique_id).unwrap();

    let response = test
        .app
        .clone()
        .oneshot(get(&format!("/pay/{}", link.unique_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = html(response).await;
    assert!(page.contains("deactivated"));

    // And no invoice can be created for it.
    let invoice = test
        .app
        .oneshot(post(&format!("/pay/{}/invoice", link.unique_id)))
        .await
        .unwrap();
    assert_eq!(invoice.status(), StatusCode::OK);
    assert_eq!(test.gateway.calls().len(), 0);
}

#[tokio::test]
async fn invoice_endpoint_without_a_gateway_is_unavailable() {
    let test = test_app(false);
    let link = seeded_link(&test);

    let response = test
        .app
        .oneshot(post(&format!("/pay/{}/invoice", link.unique_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
