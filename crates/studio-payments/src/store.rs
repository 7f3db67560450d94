//! Payment Link Storage
//!
//! Storage trait plus the in-memory implementation. Every mutating
//! operation is an atomically-checked update executed under a single write
//! guard: page views, invoice requests, and webhook callbacks may arrive
//! concurrently for the same link, and the loser of a race must observe a
//! clean no-op rather than a contradictory final state.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{PaymentError, Result};
use crate::link::{LinkStatus, PaymentLink, ProviderInvoice};

/// Outcome of a conditional status transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The stored status matched and was updated
    Applied,
    /// The link was already in the target status (idempotent no-op)
    Unchanged,
    /// The stored status was outside the allowed set; nothing was written
    Refused(LinkStatus),
}

/// Payment link storage
pub trait LinkStore: Send + Sync {
    /// Insert a new link; fails on a duplicate id
    fn insert(&self, link: PaymentLink) -> Result<()>;

    /// Fetch a link by its external id
    fn get(&self, unique_id: &Uuid) -> Result<Option<PaymentLink>>;

    /// Stamp `first_opened_at = now` unless it is already set, and return
    /// the updated record. The timestamp is written at most once, ever.
    fn mark_first_open(&self, unique_id: &Uuid, now: DateTime<Utc>) -> Result<PaymentLink>;

    /// Attach the gateway invoice, only while the link is still `Created`
    /// and no invoice is attached yet. Returns whether the write happened.
    fn attach_invoice(&self, unique_id: &Uuid, invoice: ProviderInvoice) -> Result<bool>;

    /// Compare-and-set the status: the write happens only if the stored
    /// status is still in `allowed_from`.
    fn transition(
        &self,
        unique_id: &Uuid,
        allowed_from: &[LinkStatus],
        to: LinkStatus,
    ) -> Result<Transition>;
}

/// In-memory link store (for development and tests)
pub struct MemoryLinkStore {
    links: RwLock<HashMap<Uuid, PaymentLink>>,
}

impl Default for MemoryLinkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self {
            links: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored links
    pub fn len(&self) -> usize {
        self.links.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LinkStore for MemoryLinkStore {
    fn insert(&self, link: PaymentLink) -> Result<()> {
        let mut links = self.links.write().unwrap();
        if links.contains_key(&link.unique_id) {
            return Err(PaymentError::DuplicateLink(link.unique_id));
        }
        links.insert(link.unique_id, link);
        Ok(())
    }

    fn get(&self, unique_id: &Uuid) -> Result<Option<PaymentLink>> {
        let links = self.links.read().unwrap();
        Ok(links.get(unique_id).cloned())
    }

    fn mark_first_open(&self, unique_id: &Uuid, now: DateTime<Utc>) -> Result<PaymentLink> {
        let mut links = self.links.write().unwrap();
        let link = links
            .get_mut(unique_id)
            .ok_or(PaymentError::LinkNotFound(*unique_id))?;
        if link.first_opened_at.is_none() {
            link.first_opened_at = Some(now);
        }
        Ok(link.clone())
    }

    fn attach_invoice(&self, unique_id: &Uuid, invoice: ProviderInvoice) -> Result<bool> {
        let mut links = self.links.write().unwrap();
        let link = links
            .get_mut(unique_id)
            .ok_or(PaymentError::LinkNotFound(*unique_id))?;
        if link.status != LinkStatus::Created || link.invoice.is_some() {
            return Ok(false);
        }
        link.invoice = Some(invoice);
        Ok(true)
    }

    fn transition(
        &self,
        unique_id: &Uuid,
        allowed_from: &[LinkStatus],
        to: LinkStatus,
    ) -> Result<Transition> {
        let mut links = self.links.write().unwrap();
        let link = links
            .get_mut(unique_id)
            .ok_or(PaymentError::LinkNotFound(*unique_id))?;
        if link.status == to {
            return Ok(Transition::Unchanged);
        }
        if !allowed_from.contains(&link.status) {
            return Ok(Transition::Refused(link.status));
        }
        link.status = to;
        Ok(Transition::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Currency;
    use rust_decimal_macros::dec;

    fn stored_link(store: &MemoryLinkStore) -> PaymentLink {
        let link = PaymentLink::new("Client", "Work", dec!(500), dec!(0), Currency::Uah);
        store.insert(link.clone()).unwrap();
        link
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let store = MemoryLinkStore::new();
        let link = stored_link(&store);
        assert!(matches!(
            store.insert(link),
            Err(PaymentError::DuplicateLink(_))
        ));
    }

    #[test]
    fn first_open_is_stamped_at_most_once() {
        let store = MemoryLinkStore::new();
        let link = stored_link(&store);
        let t0 = Utc::now();

        let first = store.mark_first_open(&link.unique_id, t0).unwrap();
        assert_eq!(first.first_opened_at, Some(t0));

        let later = t0 + chrono::Duration::minutes(5);
        let second = store.mark_first_open(&link.unique_id, later).unwrap();
        assert_eq!(second.first_opened_at, Some(t0));
    }

    #[test]
    fn transition_is_compare_and_set() {
        let store = MemoryLinkStore::new();
        let link = stored_link(&store);

        let applied = store
            .transition(&link.unique_id, &[LinkStatus::Created], LinkStatus::Paid)
            .unwrap();
        assert_eq!(applied, Transition::Applied);

        // A racing expiry observes a refusal, not an overwrite.
        let refused = store
            .transition(&link.unique_id, &[LinkStatus::Created], LinkStatus::Expired)
            .unwrap();
        assert_eq!(refused, Transition::Refused(LinkStatus::Paid));

        // A repeated success delivery is an idempotent no-op.
        let repeat = store
            .transition(&link.unique_id, &[LinkStatus::Created], LinkStatus::Paid)
            .unwrap();
        assert_eq!(repeat, Transition::Unchanged);
    }

    #[test]
    fn invoice_attaches_only_while_created() {
        let store = MemoryLinkStore::new();
        let link = stored_link(&store);
        let invoice = ProviderInvoice {
            invoice_id: "inv_1".into(),
            page_url: "https://pay.example/inv_1".into(),
        };

        assert!(store.attach_invoice(&link.unique_id, invoice.clone()).unwrap());
        // Second attach refused: the pair is set once.
        assert!(!store.attach_invoice(&link.unique_id, invoice.clone()).unwrap());

        let other = stored_link(&store);
        store
            .transition(&other.unique_id, &[LinkStatus::Created], LinkStatus::Paid)
            .unwrap();
        assert!(!store.attach_invoice(&other.unique_id, invoice).unwrap());
    }
}
