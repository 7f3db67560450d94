//! # studio-leads
//!
//! Lead capture for studio-site: contact/consultation/course forms, the
//! project-price calculator, and outbound-mail composition.
//!
//! The mail transport itself is an external collaborator; this crate only
//! defines the [`Mailer`] seam and a recording in-memory double. The
//! pipeline for every form is the same: validate, compose a plain-text
//! notification, send it to the studio inbox, and record the submission.

mod calculator;
mod error;
mod form;
mod mailer;
mod store;

pub use calculator::{PriceEstimate, ProjectType, QuizAnswers, ReadinessLevel, Urgency};
pub use error::{LeadError, Result};
pub use form::{Lead, LeadIntake, LeadKind, validate_phone};
pub use mailer::{Mailer, MemoryMailer, OutboundMail};
pub use store::{LeadStore, MemoryLeadStore};
