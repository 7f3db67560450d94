//! studio-site HTTP Server

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studio_content::{MemoryBlogStore, MemoryEventStore};
use studio_leads::{Mailer, MemoryLeadStore, MemoryMailer};
use studio_payments::{
    AcquiringGateway, HttpAcquiringGateway, Lifecycle, MemoryLinkStore, WebhookVerifier,
};

use studio_server::config::ServerConfig;
use studio_server::router;
use studio_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = Arc::new(ServerConfig::from_env()?);

    // Payments are optional as a unit; the rest of the site runs without them.
    let (gateway, verifier): (
        Option<Arc<dyn AcquiringGateway>>,
        Option<Arc<WebhookVerifier>>,
    ) = match &config.payments {
        Some(payments) => {
            tracing::info!("✓ Acquiring gateway configured");
            (
                Some(Arc::new(HttpAcquiringGateway::new(
                    payments.gateway_base_url.clone(),
                    payments.gateway_token.clone(),
                ))),
                Some(Arc::new(WebhookVerifier::new(
                    payments.webhook_secret.clone(),
                ))),
            )
        }
        None => {
            tracing::warn!("⚠ Gateway not configured - payment links disabled");
            tracing::warn!("  Set GATEWAY_BASE_URL, GATEWAY_TOKEN and WEBHOOK_SECRET in .env");
            (None, None)
        }
    };

    let mailer: Arc<dyn Mailer> = Arc::new(MemoryMailer::new());

    let blog = Arc::new(MemoryBlogStore::new());
    let events = Arc::new(MemoryEventStore::new());
    studio_server::seed::seed_content(&blog, &events);

    let state = AppState {
        blog,
        events,
        leads: Arc::new(MemoryLeadStore::new()),
        mailer,
        lifecycle: Arc::new(Lifecycle::new(Arc::new(MemoryLinkStore::new()))),
        gateway,
        verifier,
        config: config.clone(),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 studio-site server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                    - Health check");
    tracing::info!("  GET  /pay/{{id}}                  - Payment page");
    tracing::info!("  POST /webhooks/acquiring        - Gateway callbacks");
    tracing::info!("  POST /api/links                 - Create payment link (admin)");
    tracing::info!("  GET  /api/blog                  - Blog listing");
    tracing::info!("  GET  /api/events                - Events listing");
    tracing::info!("  POST /api/forms                 - Lead forms");

    axum::serve(listener, app).await?;

    Ok(())
}
