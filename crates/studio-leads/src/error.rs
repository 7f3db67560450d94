//! Lead Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, LeadError>;

/// Lead-capture errors
#[derive(Error, Debug)]
pub enum LeadError {
    /// A required field is missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Mail transport failure
    #[error("Mail error: {0}")]
    Mail(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LeadError {
    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            LeadError::Validation(msg) => msg.clone(),
            _ => "An error occurred while submitting your request. Please try again.".into(),
        }
    }
}
