//! Application State

use std::sync::Arc;

use studio_content::{MemoryBlogStore, MemoryEventStore};
use studio_leads::{MemoryLeadStore, Mailer};
use studio_payments::{AcquiringGateway, Lifecycle, MemoryLinkStore, WebhookVerifier};
use uuid::Uuid;

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Blog posts
    pub blog: Arc<MemoryBlogStore>,

    /// Events and registrations
    pub events: Arc<MemoryEventStore>,

    /// Recorded form submissions
    pub leads: Arc<MemoryLeadStore>,

    /// Outbound mail transport
    pub mailer: Arc<dyn Mailer>,

    /// Payment-link lifecycle controller
    pub lifecycle: Arc<Lifecycle<MemoryLinkStore>>,

    /// Acquiring gateway (None if payments are not configured)
    pub gateway: Option<Arc<dyn AcquiringGateway>>,

    /// Webhook signature verifier (None if payments are not configured)
    pub verifier: Option<Arc<WebhookVerifier>>,

    /// Resolved configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Public URL of a link's payment page
    pub fn payment_url(&self, unique_id: &Uuid) -> String {
        format!("{}/pay/{unique_id}", self.config.public_base_url)
    }

    /// Where the gateway sends the payer after checkout
    pub fn redirect_url(&self, unique_id: &Uuid) -> String {
        format!("{}/pay/{unique_id}/success", self.config.public_base_url)
    }

    /// Where the gateway posts status callbacks
    pub fn webhook_url(&self) -> String {
        format!("{}/webhooks/acquiring", self.config.public_base_url)
    }
}
