//! Outbound Mail Seam
//!
//! The actual transport (SMTP, an API, whatever operations wires in) lives
//! outside this system; handlers only see the trait.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::Result;

/// One outbound message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail transport trait
///
/// Implementations map transport failures into [`LeadError::Mail`] so
/// callers can log and carry on; delivery is best-effort everywhere.
///
/// [`LeadError::Mail`]: crate::error::LeadError::Mail
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message
    async fn send(&self, mail: OutboundMail) -> Result<()>;
}

/// In-memory mailer that records what would have been sent
pub struct MemoryMailer {
    sent: Mutex<Vec<OutboundMail>>,
    fail: std::sync::atomic::AtomicBool,
}

impl Default for MemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Make subsequent `send` calls fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Messages recorded so far
    pub fn sent(&self) -> Vec<OutboundMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: OutboundMail) -> Result<()> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(crate::error::LeadError::Mail(
                "mail transport unavailable".into(),
            ));
        }
        tracing::info!(to = %mail.to, subject = %mail.subject, "Recording outbound mail");
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}
