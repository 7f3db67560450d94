//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Acquiring gateway call failed or returned an unusable response
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// No payment link with the given id
    #[error("Payment link not found: {0}")]
    LinkNotFound(uuid::Uuid),

    /// A link with this id already exists
    #[error("Duplicate payment link: {0}")]
    DuplicateLink(uuid::Uuid),

    /// Monetary amount cannot be represented in minor units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PaymentError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::Gateway(_) | PaymentError::Storage(_))
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PaymentError::Gateway(_) => "Invoice creation failed. Please try again.",
            PaymentError::LinkNotFound(_) => "Payment link not found.",
            PaymentError::InvalidAmount(_) => "This payment link has an invalid amount.",
            PaymentError::Config(_) => "Payments are not configured.",
            _ => "An error occurred processing your payment.",
        }
    }
}
