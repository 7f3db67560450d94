//! # studio-payments
//!
//! Payment-link checkout for studio-site.
//!
//! A payment link is a shareable, time-bounded URL representing one payable
//! invoice. It is created administratively, opened by the client, and settled
//! through an external acquiring gateway that hosts the actual card-entry page
//! and reports outcomes over a webhook.
//!
//! ## State machine
//!
//! ```text
//!                    open (expired)          callback: success
//!            ┌──────────────────────┐   ┌───────────────────────────┐
//!            │                      ▼   │                           ▼
//!  ┌─────────┴─┐  invoice ok   ┌─────────┐  callback: expired   ┌──────┐
//!  │  CREATED  │──────────────▶│ EXPIRED │                      │ PAID │
//!  └─────┬─────┘  (link stays  └─────────┘                      └──────┘
//!        │         CREATED)
//!        │  admin deactivate   ┌─────────────┐
//!        └────────────────────▶│ DEACTIVATED │
//!                              └─────────────┘
//! ```
//!
//! `PAID` and `DEACTIVATED` are terminal. `EXPIRED` is terminal for payment
//! (no further invoice may be created) but a success callback still wins:
//! once the gateway has observed money, that observation is never discarded.
//!
//! ## Flow
//!
//! 1. Client opens the payment URL; the first successful view stamps
//!    `first_opened_at` exactly once and starts the expiry window.
//! 2. If payable, the client requests an invoice; the gateway returns an
//!    invoice id plus a hosted page URL (stored together or not at all) and
//!    the payer is redirected there.
//! 3. The gateway calls back asynchronously; callbacks are HMAC-authenticated,
//!    idempotent, and applied through compare-and-set status transitions so
//!    concurrent deliveries can never produce contradictory final states.

mod error;
mod gateway;
mod lifecycle;
mod link;
mod store;
mod webhook;

pub use error::{PaymentError, Result};
pub use gateway::{
    AcquiringGateway, CreateInvoiceRequest, CreatedInvoice, HttpAcquiringGateway,
    MockAcquiringGateway,
};
pub use lifecycle::{CallbackOutcome, InactiveReason, InvoiceOutcome, Lifecycle, PageView};
pub use link::{Currency, LinkStatus, PaymentLink, ProviderInvoice};
pub use store::{LinkStore, MemoryLinkStore, Transition};
pub use webhook::{CallbackStatus, PaymentCallback, WebhookVerifier};
