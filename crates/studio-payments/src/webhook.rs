//! Webhook Verification and Parsing
//!
//! Gateway callbacks arrive unauthenticated at the network level, so every
//! payload must prove it came from the gateway before any state mutation.
//! The signature header carries a timestamp and an HMAC-SHA256 over
//! `"<timestamp>.<body>"` with the shared webhook secret:
//!
//! ```text
//! X-Callback-Signature: t=1735689600,v1=<hex hmac>
//! ```
//!
//! Signatures older (or newer) than the skew window are rejected to blunt
//! replay, and comparison happens in constant time inside the HMAC crate.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{PaymentError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted clock skew between the signature timestamp and now
const MAX_SKEW_SECONDS: i64 = 300;

/// Gateway-reported invoice status, pinned to the documented contract.
///
/// Only `success` marks a link paid. Alternate payload shapes are rejected
/// rather than guessed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackStatus {
    Success,
    Processing,
    Expired,
    Reversed,
    Failure,
}

impl CallbackStatus {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "success" => Ok(CallbackStatus::Success),
            "processing" => Ok(CallbackStatus::Processing),
            "expired" => Ok(CallbackStatus::Expired),
            "reversed" => Ok(CallbackStatus::Reversed),
            "failure" => Ok(CallbackStatus::Failure),
            other => Err(PaymentError::WebhookParse(format!(
                "unknown status '{other}'"
            ))),
        }
    }
}

/// Parsed, authenticated gateway callback
#[derive(Clone, Debug)]
pub struct PaymentCallback {
    /// Merchant reference, i.e. the payment link's `unique_id`
    pub reference: Uuid,

    /// Reported invoice status
    pub status: CallbackStatus,

    /// Gateway invoice id, when the gateway includes it
    pub invoice_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCallback {
    reference: String,
    status: String,
    invoice_id: Option<String>,
}

/// Verifies and parses gateway callbacks
pub struct WebhookVerifier {
    secret: String,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify the signature header against the raw body, then parse.
    ///
    /// An unauthenticated or malformed payload never reaches the lifecycle
    /// controller.
    pub fn verify_and_parse(
        &self,
        body: &[u8],
        signature_header: &str,
        now: DateTime<Utc>,
    ) -> Result<PaymentCallback> {
        self.verify_signature(body, signature_header, now)?;
        Self::parse_body(body)
    }

    fn verify_signature(
        &self,
        body: &[u8],
        signature_header: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut timestamp: Option<&str> = None;
        let mut sig_v1: Option<&str> = None;

        for part in signature_header.split(',') {
            if let Some((key, value)) = part.split_once('=') {
                match key.trim() {
                    "t" => timestamp = Some(value),
                    "v1" => sig_v1 = Some(value),
                    _ => {}
                }
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| PaymentError::WebhookSignature("missing timestamp".into()))?;
        let sig_v1 =
            sig_v1.ok_or_else(|| PaymentError::WebhookSignature("missing v1 signature".into()))?;

        let ts: i64 = timestamp
            .parse()
            .map_err(|_| PaymentError::WebhookSignature("bad timestamp".into()))?;
        if (now.timestamp() - ts).abs() > MAX_SKEW_SECONDS {
            return Err(PaymentError::WebhookSignature("stale timestamp".into()));
        }

        let body_str = std::str::from_utf8(body)
            .map_err(|_| PaymentError::WebhookSignature("payload is not utf-8".into()))?;
        let signed_payload = format!("{timestamp}.{body_str}");

        let expected = hex::decode(sig_v1)
            .map_err(|_| PaymentError::WebhookSignature("signature is not hex".into()))?;

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| PaymentError::Config("webhook secret unusable as HMAC key".into()))?;
        mac.update(signed_payload.as_bytes());
        mac.verify_slice(&expected)
            .map_err(|_| PaymentError::WebhookSignature("signature mismatch".into()))
    }

    fn parse_body(body: &[u8]) -> Result<PaymentCallback> {
        let raw: RawCallback = serde_json::from_slice(body)
            .map_err(|e| PaymentError::WebhookParse(e.to_string()))?;

        let reference = Uuid::parse_str(&raw.reference)
            .map_err(|_| PaymentError::WebhookParse("reference is not a valid id".into()))?;

        Ok(PaymentCallback {
            reference,
            status: CallbackStatus::parse(&raw.status)?,
            invoice_id: raw.invoice_id,
        })
    }
}
