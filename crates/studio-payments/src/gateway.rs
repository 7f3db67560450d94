//! Acquiring Gateway Client
//!
//! The gateway hosts the card-entry page and reports outcomes over a
//! webhook. Only its invoice-creation call is integrated here; everything
//! else is its own business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result};

/// Invoice creation request sent to the gateway
#[derive(Clone, Debug, Serialize)]
pub struct CreateInvoiceRequest {
    /// Merchant-side reference, echoed back in the webhook (the link's id)
    pub reference: String,

    /// Amount in minor units (kopecks/cents)
    pub amount_minor: i64,

    /// ISO 4217 numeric currency code
    pub currency_code: u16,

    /// What the payer sees as the payment purpose
    pub destination: String,

    /// Free-form merchant comment
    pub comment: String,

    /// How long the hosted invoice stays payable
    pub validity_seconds: u64,

    /// Where the gateway sends the payer after checkout
    pub redirect_url: String,

    /// Where the gateway posts status callbacks
    pub webhook_url: String,
}

/// A successfully created gateway invoice.
///
/// Both fields are required; a response missing either is a gateway error
/// and nothing gets persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedInvoice {
    pub invoice_id: String,
    pub page_url: String,
}

/// Gateway client trait
///
/// Implement this per acquirer; the lifecycle controller only sees the trait.
#[async_trait]
pub trait AcquiringGateway: Send + Sync {
    /// Create a hosted invoice and return its id plus checkout page URL
    async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<CreatedInvoice>;

    /// Gateway name, for logs
    fn name(&self) -> &str;
}

/// HTTP gateway client speaking the acquirer's merchant API
pub struct HttpAcquiringGateway {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpAcquiringGateway {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireInvoiceRequest<'a> {
    amount: i64,
    ccy: u16,
    merchant_paym_info: WirePaymInfo<'a>,
    validity: u64,
    redirect_url: &'a str,
    web_hook_url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WirePaymInfo<'a> {
    reference: &'a str,
    destination: &'a str,
    comment: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInvoiceResponse {
    invoice_id: Option<String>,
    page_url: Option<String>,
}

#[async_trait]
impl AcquiringGateway for HttpAcquiringGateway {
    async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<CreatedInvoice> {
        let wire = WireInvoiceRequest {
            amount: request.amount_minor,
            ccy: request.currency_code,
            merchant_paym_info: WirePaymInfo {
                reference: &request.reference,
                destination: &request.destination,
                comment: &request.comment,
            },
            validity: request.validity_seconds,
            redirect_url: &request.redirect_url,
            web_hook_url: &request.webhook_url,
        };

        let response = self
            .http
            .post(format!("{}/api/merchant/invoice/create", self.base_url))
            .header("X-Token", &self.token)
            .json(&wire)
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway(format!(
                "invoice create returned {status}: {body}"
            )));
        }

        let parsed: WireInvoiceResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Gateway(format!("malformed response: {e}")))?;

        // Both or neither: a half-formed invoice must never reach storage.
        match (parsed.invoice_id, parsed.page_url) {
            (Some(invoice_id), Some(page_url)) => Ok(CreatedInvoice {
                invoice_id,
                page_url,
            }),
            _ => Err(PaymentError::Gateway(
                "response missing invoiceId or pageUrl".into(),
            )),
        }
    }

    fn name(&self) -> &str {
        "acquiring-http"
    }
}

/// Mock gateway for tests and local development
pub struct MockAcquiringGateway {
    fail: std::sync::atomic::AtomicBool,
    calls: std::sync::Mutex<Vec<CreateInvoiceRequest>>,
}

impl Default for MockAcquiringGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAcquiringGateway {
    pub fn new() -> Self {
        Self {
            fail: std::sync::atomic::AtomicBool::new(false),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent `create_invoice` calls fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<CreateInvoiceRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AcquiringGateway for MockAcquiringGateway {
    async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<CreatedInvoice> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(PaymentError::Gateway("mock gateway failure".into()));
        }
        let invoice_id = format!("inv_{}", request.reference);
        let page_url = format!("https://pay.example.test/{invoice_id}");
        self.calls.lock().unwrap().push(request);
        Ok(CreatedInvoice {
            invoice_id,
            page_url,
        })
    }

    fn name(&self) -> &str {
        "acquiring-mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_gateway_returns_paired_invoice() {
        let gateway = MockAcquiringGateway::new();
        let created = gateway
            .create_invoice(CreateInvoiceRequest {
                reference: "ref-1".into(),
                amount_minor: 90_000,
                currency_code: 980,
                destination: "Services".into(),
                comment: "Payment from Client".into(),
                validity_seconds: 3600,
                redirect_url: "https://site.test/pay/ref-1/success".into(),
                webhook_url: "https://site.test/webhooks/acquiring".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.invoice_id, "inv_ref-1");
        assert!(created.page_url.contains("inv_ref-1"));
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn mock_gateway_failure_is_distinguishable() {
        let gateway = MockAcquiringGateway::new();
        gateway.set_failing(true);
        let err = gateway
            .create_invoice(CreateInvoiceRequest {
                reference: "ref-2".into(),
                amount_minor: 100,
                currency_code: 980,
                destination: "Services".into(),
                comment: String::new(),
                validity_seconds: 600,
                redirect_url: String::new(),
                webhook_url: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Gateway(_)));
        assert!(err.is_retryable());
    }
}
