//! Payment Link Lifecycle Controller
//!
//! Mutates link status in response to the three external triggers (page
//! view, gateway callback, administrative deactivation) and enforces the
//! state machine. Every write goes through the store's atomically-checked
//! operations; the loser of a concurrent race observes a no-op.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{PaymentError, Result};
use crate::gateway::{AcquiringGateway, CreateInvoiceRequest};
use crate::link::{LinkStatus, PaymentLink, ProviderInvoice};
use crate::store::{LinkStore, Transition};
use crate::webhook::{CallbackStatus, PaymentCallback};

/// Why a link renders as inactive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InactiveReason {
    AlreadyPaid,
    Deactivated,
    Expired,
}

impl InactiveReason {
    pub fn message(&self) -> &'static str {
        match self {
            InactiveReason::AlreadyPaid => "This payment link has already been paid.",
            InactiveReason::Deactivated => "This payment link has been deactivated.",
            InactiveReason::Expired => "This payment link has expired.",
        }
    }

    fn from_status(status: LinkStatus) -> Option<Self> {
        match status {
            LinkStatus::Paid => Some(InactiveReason::AlreadyPaid),
            LinkStatus::Deactivated => Some(InactiveReason::Deactivated),
            LinkStatus::Expired => Some(InactiveReason::Expired),
            LinkStatus::Created => None,
        }
    }
}

/// Result of opening the payment page
#[derive(Clone, Debug)]
pub enum PageView {
    /// The link is payable; render the payment form
    Payable(PaymentLink),
    /// The link is not payable; render the inactive view
    Inactive {
        link: PaymentLink,
        reason: InactiveReason,
    },
}

/// Result of requesting an invoice
#[derive(Clone, Debug)]
pub enum InvoiceOutcome {
    /// Redirect the payer to the gateway's hosted page
    Redirect { page_url: String },
    /// The link is not payable; no gateway call was made
    Inactive {
        link: PaymentLink,
        reason: InactiveReason,
    },
}

/// Result of applying a gateway callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// The link was marked paid by this delivery
    MarkedPaid,
    /// The link was already paid; duplicate delivery acknowledged
    AlreadyPaid,
    /// The link was marked expired by this delivery
    MarkedExpired,
    /// Acknowledged without any state change
    Ignored,
}

/// Lifecycle controller over a link store
pub struct Lifecycle<S: LinkStore> {
    store: Arc<S>,
}

impl<S: LinkStore> Lifecycle<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a link administratively
    pub fn create(&self, link: PaymentLink) -> Result<PaymentLink> {
        self.store.insert(link.clone())?;
        tracing::info!(
            unique_id = %link.unique_id,
            client = %link.client_name,
            amount = %link.final_amount(),
            currency = %link.currency,
            "Created payment link"
        );
        Ok(link)
    }

    /// Fetch a link without mutating anything (success/failure pages)
    pub fn find(&self, unique_id: &Uuid) -> Result<PaymentLink> {
        self.store
            .get(unique_id)?
            .ok_or(PaymentError::LinkNotFound(*unique_id))
    }

    /// Open the payment page.
    ///
    /// The first successful view stamps `first_opened_at` exactly once;
    /// expiry is evaluated lazily against `now`.
    pub fn open(&self, unique_id: &Uuid, now: DateTime<Utc>) -> Result<PageView> {
        let link = self.find(unique_id)?;

        if let Some(reason) = InactiveReason::from_status(link.status) {
            return Ok(PageView::Inactive { link, reason });
        }

        let mut link = self.store.mark_first_open(unique_id, now)?;
        if link.is_expired(now) {
            self.store
                .transition(unique_id, &[LinkStatus::Created], LinkStatus::Expired)?;
            link.status = LinkStatus::Expired;
            tracing::info!(unique_id = %unique_id, "Payment link expired on open");
            return Ok(PageView::Inactive {
                link,
                reason: InactiveReason::Expired,
            });
        }

        Ok(PageView::Payable(link))
    }

    /// Request a gateway invoice for a payable link.
    ///
    /// On success the invoice id and page URL are stored together; on
    /// gateway failure nothing is persisted and the error is surfaced so
    /// the caller can render a failure view. Re-requesting after a stored
    /// invoice exists redirects to the same hosted page.
    pub async fn request_invoice(
        &self,
        unique_id: &Uuid,
        gateway: &dyn AcquiringGateway,
        redirect_url: &str,
        webhook_url: &str,
        now: DateTime<Utc>,
    ) -> Result<InvoiceOutcome> {
        let link = self.find(unique_id)?;

        if let Some(reason) = InactiveReason::from_status(link.status) {
            return Ok(InvoiceOutcome::Inactive { link, reason });
        }

        if link.is_expired(now) {
            self.store
                .transition(unique_id, &[LinkStatus::Created], LinkStatus::Expired)?;
            let mut link = link;
            link.status = LinkStatus::Expired;
            return Ok(InvoiceOutcome::Inactive {
                link,
                reason: InactiveReason::Expired,
            });
        }

        if let Some(invoice) = &link.invoice {
            return Ok(InvoiceOutcome::Redirect {
                page_url: invoice.page_url.clone(),
            });
        }

        let amount_minor = link
            .final_amount_minor()
            .ok_or_else(|| PaymentError::InvalidAmount(link.final_amount().to_string()))?;

        let destination = if link.description.is_empty() {
            "Payment for services".to_string()
        } else {
            link.description.clone()
        };

        let created = gateway
            .create_invoice(CreateInvoiceRequest {
                reference: link.unique_id.to_string(),
                amount_minor,
                currency_code: link.currency.iso4217(),
                destination,
                comment: format!("Payment from {}", link.client_name),
                validity_seconds: link.validity_seconds(),
                redirect_url: redirect_url.to_string(),
                webhook_url: webhook_url.to_string(),
            })
            .await?;

        let attached = self.store.attach_invoice(
            unique_id,
            ProviderInvoice {
                invoice_id: created.invoice_id.clone(),
                page_url: created.page_url.clone(),
            },
        )?;

        if attached {
            tracing::info!(
                unique_id = %unique_id,
                invoice_id = %created.invoice_id,
                gateway = gateway.name(),
                "Created gateway invoice"
            );
            return Ok(InvoiceOutcome::Redirect {
                page_url: created.page_url,
            });
        }

        // Lost a race against a callback or a parallel request; follow
        // whatever the store holds now.
        let current = self.find(unique_id)?;
        match (&current.invoice, InactiveReason::from_status(current.status)) {
            (Some(invoice), None) => Ok(InvoiceOutcome::Redirect {
                page_url: invoice.page_url.clone(),
            }),
            (_, Some(reason)) => Ok(InvoiceOutcome::Inactive {
                link: current,
                reason,
            }),
            (None, None) => Err(PaymentError::Storage(
                "invoice attach refused for a payable link".into(),
            )),
        }
    }

    /// Apply an authenticated gateway callback.
    ///
    /// Idempotent under duplicate deliveries. A success observation always
    /// wins once recorded: `Paid` is never downgraded, and a late success
    /// for a lazily-expired link is still honored. Success after an
    /// administrative deactivation is acknowledged as a no-op.
    pub fn apply_callback(&self, callback: &PaymentCallback) -> Result<CallbackOutcome> {
        let id = callback.reference;
        let outcome = match callback.status {
            CallbackStatus::Success => {
                match self.store.transition(
                    &id,
                    &[LinkStatus::Created, LinkStatus::Expired],
                    LinkStatus::Paid,
                )? {
                    Transition::Applied => {
                        tracing::info!(unique_id = %id, "Payment link marked paid");
                        CallbackOutcome::MarkedPaid
                    }
                    Transition::Unchanged => CallbackOutcome::AlreadyPaid,
                    Transition::Refused(current) => {
                        tracing::warn!(
                            unique_id = %id,
                            status = %current,
                            "Success callback for a non-payable link, ignoring"
                        );
                        CallbackOutcome::Ignored
                    }
                }
            }
            CallbackStatus::Expired | CallbackStatus::Reversed => {
                match self
                    .store
                    .transition(&id, &[LinkStatus::Created], LinkStatus::Expired)?
                {
                    Transition::Applied => {
                        tracing::info!(unique_id = %id, "Payment link marked expired by gateway");
                        CallbackOutcome::MarkedExpired
                    }
                    Transition::Unchanged | Transition::Refused(_) => CallbackOutcome::Ignored,
                }
            }
            CallbackStatus::Processing | CallbackStatus::Failure => CallbackOutcome::Ignored,
        };
        Ok(outcome)
    }

    /// Administrative deactivation. Refuses to touch a paid link.
    pub fn deactivate(&self, unique_id: &Uuid) -> Result<Transition> {
        let outcome = self.store.transition(
            unique_id,
            &[LinkStatus::Created, LinkStatus::Expired],
            LinkStatus::Deactivated,
        )?;
        if outcome == Transition::Applied {
            tracing::info!(unique_id = %unique_id, "Payment link deactivated");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Currency;
    use crate::store::MemoryLinkStore;
    use rust_decimal_macros::dec;

    fn lifecycle() -> (Lifecycle<MemoryLinkStore>, PaymentLink) {
        let store = Arc::new(MemoryLinkStore::new());
        let lifecycle = Lifecycle::new(store);
        let link = lifecycle
            .create(PaymentLink::new(
                "Client",
                "Website",
                dec!(1000),
                dec!(0),
                Currency::Uah,
            ))
            .unwrap();
        (lifecycle, link)
    }

    #[test]
    fn open_stamps_first_open_exactly_once() {
        let (lifecycle, link) = lifecycle();
        let t0 = Utc::now();

        let PageView::Payable(first) = lifecycle.open(&link.unique_id, t0).unwrap() else {
            panic!("expected payable view");
        };
        assert_eq!(first.first_opened_at, Some(t0));

        let t1 = t0 + chrono::Duration::minutes(5);
        let PageView::Payable(second) = lifecycle.open(&link.unique_id, t1).unwrap() else {
            panic!("expected payable view");
        };
        assert_eq!(second.first_opened_at, Some(t0));
    }

    #[test]
    fn paid_link_renders_inactive_without_mutation() {
        let (lifecycle, link) = lifecycle();
        let cb = PaymentCallback {
            reference: link.unique_id,
            status: CallbackStatus::Success,
            invoice_id: None,
        };
        assert_eq!(
            lifecycle.apply_callback(&cb).unwrap(),
            CallbackOutcome::MarkedPaid
        );

        let view = lifecycle.open(&link.unique_id, Utc::now()).unwrap();
        let PageView::Inactive { link: shown, reason } = view else {
            panic!("expected inactive view");
        };
        assert_eq!(reason, InactiveReason::AlreadyPaid);
        // A view of a terminal link never stamps the first-open timestamp.
        assert_eq!(shown.first_opened_at, None);
    }

    #[test]
    fn duplicate_success_callbacks_are_idempotent() {
        let (lifecycle, link) = lifecycle();
        let cb = PaymentCallback {
            reference: link.unique_id,
            status: CallbackStatus::Success,
            invoice_id: Some("inv_1".into()),
        };
        assert_eq!(
            lifecycle.apply_callback(&cb).unwrap(),
            CallbackOutcome::MarkedPaid
        );
        assert_eq!(
            lifecycle.apply_callback(&cb).unwrap(),
            CallbackOutcome::AlreadyPaid
        );
        assert_eq!(
            lifecycle.find(&link.unique_id).unwrap().status,
            LinkStatus::Paid
        );
    }

    #[test]
    fn expired_callback_never_downgrades_paid() {
        let (lifecycle, link) = lifecycle();
        lifecycle
            .apply_callback(&PaymentCallback {
                reference: link.unique_id,
                status: CallbackStatus::Success,
                invoice_id: None,
            })
            .unwrap();

        let outcome = lifecycle
            .apply_callback(&PaymentCallback {
                reference: link.unique_id,
                status: CallbackStatus::Expired,
                invoice_id: None,
            })
            .unwrap();
        assert_eq!(outcome, CallbackOutcome::Ignored);
        assert_eq!(
            lifecycle.find(&link.unique_id).unwrap().status,
            LinkStatus::Paid
        );
    }

    #[test]
    fn callback_with_unknown_reference_is_rejected() {
        let (lifecycle, _) = lifecycle();
        let err = lifecycle
            .apply_callback(&PaymentCallback {
                reference: Uuid::new_v4(),
                status: CallbackStatus::Success,
                invoice_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, PaymentError::LinkNotFound(_)));
    }

    #[test]
    fn deactivate_refuses_paid_links() {
        let (lifecycle, link) = lifecycle();
        lifecycle
            .apply_callback(&PaymentCallback {
                reference: link.unique_id,
                status: CallbackStatus::Success,
                invoice_id: None,
            })
            .unwrap();

        let outcome = lifecycle.deactivate(&link.unique_id).unwrap();
        assert_eq!(outcome, Transition::Refused(LinkStatus::Paid));
    }

    #[test]
    fn processing_callback_is_acknowledged_without_mutation() {
        let (lifecycle, link) = lifecycle();
        let outcome = lifecycle
            .apply_callback(&PaymentCallback {
                reference: link.unique_id,
                status: CallbackStatus::Processing,
                invoice_id: None,
            })
            .unwrap();
        assert_eq!(outcome, CallbackOutcome::Ignored);
        assert_eq!(
            lifecycle.find(&link.unique_id).unwrap().status,
            LinkStatus::Created
        );
    }
}
