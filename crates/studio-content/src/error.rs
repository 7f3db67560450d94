//! Content Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ContentError>;

/// Blog and events errors
#[derive(Error, Debug)]
pub enum ContentError {
    /// Post, event, or category not found (or not published)
    #[error("Not found: {0}")]
    NotFound(String),

    /// A record with this slug already exists
    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),

    /// Registration rejected: deadline passed or event not open
    #[error("Registration for '{0}' is closed")]
    RegistrationClosed(String),

    /// Registration rejected: all spots taken
    #[error("Event '{0}' is full")]
    EventFull(String),

    /// Registration rejected: this email is already registered
    #[error("Already registered for '{0}'")]
    AlreadyRegistered(String),

    /// Invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ContentError {
    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            ContentError::NotFound(_) => "The requested page was not found.".into(),
            ContentError::RegistrationClosed(_) => "Registration for this event is closed.".into(),
            ContentError::EventFull(_) => {
                "Unfortunately, all spots for this event are taken.".into()
            }
            ContentError::AlreadyRegistered(_) => {
                "You are already registered for this event.".into()
            }
            ContentError::Validation(msg) => msg.clone(),
            _ => "An error occurred processing your request.".into(),
        }
    }
}
