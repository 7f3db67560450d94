//! Payment Link Model
//!
//! The `PaymentLink` record and its derived monetary/expiry logic. All
//! amount arithmetic lives here so the displayed amount and the amount sent
//! to the gateway can never disagree.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a payment link
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Created,
    Paid,
    Expired,
    Deactivated,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Created => "created",
            LinkStatus::Paid => "paid",
            LinkStatus::Expired => "expired",
            LinkStatus::Deactivated => "deactivated",
        }
    }

    /// Terminal statuses admit no further transition at all.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LinkStatus::Paid | LinkStatus::Deactivated)
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement currency
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Uah,
    Usd,
    Eur,
}

impl Currency {
    /// ISO 4217 numeric code, as the gateway wire format expects
    pub fn iso4217(&self) -> u16 {
        match self {
            Currency::Uah => 980,
            Currency::Usd => 840,
            Currency::Eur => 978,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Uah => "UAH",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Uah
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gateway-side invoice reference.
///
/// Stored as one value so a link can never hold an invoice id without its
/// page URL or vice versa.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInvoice {
    /// Invoice id assigned by the gateway
    pub invoice_id: String,

    /// Hosted checkout page the payer is redirected to
    pub page_url: String,
}

/// A shareable, time-bounded checkout link
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentLink {
    /// Opaque external identifier, used in URLs and as the gateway reference
    pub unique_id: Uuid,

    /// Who this link was issued to
    pub client_name: String,

    /// What is being paid for
    pub description: String,

    /// Amount before discount
    pub original_amount: Decimal,

    /// Discount subtracted from the original amount
    pub discount: Decimal,

    /// Settlement currency
    pub currency: Currency,

    /// Expiry window in minutes, anchored at the first page open
    pub duration_minutes: Option<u32>,

    /// Explicit hard deadline; the only way an unopened link can expire
    pub deadline: Option<DateTime<Utc>>,

    /// Stamped exactly once, on the first successful page view
    pub first_opened_at: Option<DateTime<Utc>>,

    /// Current lifecycle status
    pub status: LinkStatus,

    /// Gateway invoice, present once one has been created
    pub invoice: Option<ProviderInvoice>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl PaymentLink {
    /// Create a new link in `Created` status
    pub fn new(
        client_name: impl Into<String>,
        description: impl Into<String>,
        original_amount: Decimal,
        discount: Decimal,
        currency: Currency,
    ) -> Self {
        Self {
            unique_id: Uuid::new_v4(),
            client_name: client_name.into(),
            description: description.into(),
            original_amount,
            discount,
            currency,
            duration_minutes: None,
            deadline: None,
            first_opened_at: None,
            status: LinkStatus::Created,
            invoice: None,
            created_at: Utc::now(),
        }
    }

    /// Set a duration-based expiry window
    pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Set an explicit deadline
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The amount actually charged: original minus discount, floored at zero.
    ///
    /// Every display and every gateway call goes through this method.
    pub fn final_amount(&self) -> Decimal {
        let amount = self.original_amount - self.discount;
        if amount < Decimal::ZERO {
            Decimal::ZERO
        } else {
            amount
        }
    }

    /// Final amount in minor units (kopecks/cents), as the gateway expects.
    ///
    /// `None` if the amount does not fit an `i64` after scaling.
    pub fn final_amount_minor(&self) -> Option<i64> {
        (self.final_amount() * Decimal::ONE_HUNDRED).trunc().to_i64()
    }

    /// The instant after which this link counts as expired.
    ///
    /// Duration-based expiry needs a first-open anchor; an unopened link can
    /// only be expired by the explicit deadline. When both apply, the
    /// earlier boundary wins.
    pub fn expiry_boundary(&self) -> Option<DateTime<Utc>> {
        let by_duration = match (self.first_opened_at, self.duration_minutes) {
            (Some(opened), Some(minutes)) => Some(opened + Duration::minutes(i64::from(minutes))),
            _ => None,
        };
        match (by_duration, self.deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    /// Lazy expiry check, evaluated at read time
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_boundary().is_some_and(|boundary| now > boundary)
    }

    /// Gateway invoice validity window in seconds
    pub fn validity_seconds(&self) -> u64 {
        self.duration_minutes
            .map_or(3600, |minutes| u64::from(minutes) * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn link() -> PaymentLink {
        PaymentLink::new(
            "Client",
            "Landing page",
            dec!(1000),
            dec!(100),
            Currency::Uah,
        )
    }

    #[test]
    fn final_amount_applies_discount() {
        assert_eq!(link().final_amount(), dec!(900));
        assert_eq!(link().final_amount_minor(), Some(90_000));
    }

    #[test]
    fn final_amount_never_negative() {
        let mut l = link();
        l.discount = dec!(5000);
        assert_eq!(l.final_amount(), Decimal::ZERO);
    }

    #[test]
    fn unopened_link_cannot_expire_by_duration() {
        let l = link().with_duration_minutes(60);
        let far_future = Utc::now() + Duration::days(30);
        assert!(!l.is_expired(far_future));
    }

    #[test]
    fn duration_expiry_anchored_at_first_open() {
        let mut l = link().with_duration_minutes(60);
        let t0 = Utc::now();
        l.first_opened_at = Some(t0);
        assert!(!l.is_expired(t0 + Duration::minutes(59)));
        assert!(l.is_expired(t0 + Duration::minutes(61)));
    }

    #[test]
    fn explicit_deadline_expires_unopened_link() {
        let t0 = Utc::now();
        let l = link().with_deadline(t0 + Duration::hours(1));
        assert!(!l.is_expired(t0 + Duration::minutes(30)));
        assert!(l.is_expired(t0 + Duration::hours(2)));
    }

    #[test]
    fn earlier_boundary_wins() {
        let t0 = Utc::now();
        let mut l = link()
            .with_duration_minutes(60)
            .with_deadline(t0 + Duration::minutes(10));
        l.first_opened_at = Some(t0);
        assert_eq!(l.expiry_boundary(), Some(t0 + Duration::minutes(10)));
    }

    #[test]
    fn validity_defaults_to_one_hour() {
        assert_eq!(link().validity_seconds(), 3600);
        assert_eq!(link().with_duration_minutes(90).validity_seconds(), 5400);
    }
}
