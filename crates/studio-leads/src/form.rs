//! Lead Forms
//!
//! Every public form on the site funnels into one pipeline: validate the
//! contact fields, compose a plain-text notification for the studio inbox,
//! and record the submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LeadError, Result};
use crate::mailer::OutboundMail;

/// Which form the lead came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadKind {
    SiteRequest,
    DeveloperCourse,
    Consultation,
    Contact,
    CallRequest,
}

impl LeadKind {
    pub fn label(&self) -> &'static str {
        match self {
            LeadKind::SiteRequest => "Website development request",
            LeadKind::DeveloperCourse => "Programming course request",
            LeadKind::Consultation => "Consultation request",
            LeadKind::Contact => "Contact message",
            LeadKind::CallRequest => "Call-back request",
        }
    }

    /// Confirmation text shown to the visitor after a successful submit
    pub fn confirmation(&self) -> &'static str {
        match self {
            LeadKind::DeveloperCourse => {
                "Thank you! Your course request has been received. We will send the details shortly."
            }
            LeadKind::CallRequest => "Thank you! We will call you back soon.",
            _ => "Thank you! Your request has been received. We will contact you shortly.",
        }
    }
}

/// Raw form input, straight from the request body
#[derive(Clone, Debug, Deserialize)]
pub struct LeadIntake {
    pub kind: LeadKind,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Project description (site requests)
    #[serde(default)]
    pub details: Option<String>,
    /// Course type and prior experience (course requests)
    #[serde(default)]
    pub course_type: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    /// Consultation topic
    #[serde(default)]
    pub topic: Option<String>,
    /// Free-form message (contact form)
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated lead
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub kind: LeadKind,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    /// Kind-specific detail fields, in display order
    pub extras: Vec<(String, String)>,
    pub submitted_at: DateTime<Utc>,
}

/// Basic phone validation: 10 to 15 characters once everything but digits
/// and a leading-plus is stripped
pub fn validate_phone(phone: &str) -> bool {
    let cleaned: String = phone.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    (10..=15).contains(&cleaned.len())
}

impl Lead {
    /// Validate the intake and build a lead
    pub fn from_intake(intake: LeadIntake, now: DateTime<Utc>) -> Result<Self> {
        let name = intake.name.trim().to_string();
        let phone = intake.phone.trim().to_string();

        if name.is_empty() || phone.is_empty() {
            return Err(LeadError::Validation(
                "Please fill in the required fields: name and phone".into(),
            ));
        }
        if !validate_phone(&phone) {
            return Err(LeadError::Validation(
                "Please enter a valid phone number".into(),
            ));
        }

        let mut extras = Vec::new();
        let mut push = |label: &str, value: &Option<String>| {
            if let Some(value) = value {
                let value = value.trim();
                if !value.is_empty() {
                    extras.push((label.to_string(), value.to_string()));
                }
            }
        };
        push("Project description", &intake.details);
        push("Course type", &intake.course_type);
        push("Experience", &intake.experience);
        push("Consultation topic", &intake.topic);
        push("Message", &intake.message);

        Ok(Self {
            id: Uuid::new_v4(),
            kind: intake.kind,
            name,
            phone,
            email: intake
                .email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            extras,
            submitted_at: now,
        })
    }

    /// Compose the studio-inbox notification for this lead
    pub fn notification(&self, inbox: &str) -> OutboundMail {
        let mut body = format!(
            "New request from the studio site\n\n\
             Request type: {}\n\
             Date: {}\n\n\
             === CONTACT DETAILS ===\n\
             Name: {}\n\
             Phone: {}\n\
             Email: {}\n",
            self.kind.label(),
            self.submitted_at.format("%d.%m.%Y %H:%M"),
            self.name,
            self.phone,
            self.email.as_deref().unwrap_or("Not provided"),
        );

        if !self.extras.is_empty() {
            body.push_str("\n=== REQUEST DETAILS ===\n");
            for (label, value) in &self.extras {
                body.push_str(&format!("{label}: {value}\n"));
            }
        }

        OutboundMail {
            to: inbox.to_string(),
            subject: format!("[Studio] {}", self.kind.label()),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intake(kind: LeadKind) -> LeadIntake {
        LeadIntake {
            kind,
            name: "Olena".into(),
            phone: "+380 50 123 45 67".into(),
            email: Some("olena@example.com".into()),
            details: Some("Landing page for a bakery".into()),
            course_type: None,
            experience: None,
            topic: None,
            message: None,
        }
    }

    #[test]
    fn phone_validation_bounds() {
        assert!(validate_phone("+380501234567"));
        assert!(validate_phone("(050) 123-45-67"));
        assert!(!validate_phone("12345"));
        assert!(!validate_phone("+1234567890123456789"));
        assert!(!validate_phone("call me maybe"));
    }

    #[test]
    fn intake_requires_name_and_phone() {
        let mut bad = intake(LeadKind::Contact);
        bad.name = "   ".into();
        let err = Lead::from_intake(bad, Utc::now()).unwrap_err();
        assert!(matches!(err, LeadError::Validation(_)));

        let mut bad = intake(LeadKind::Contact);
        bad.phone = "123".into();
        let err = Lead::from_intake(bad, Utc::now()).unwrap_err();
        assert!(matches!(err, LeadError::Validation(_)));
    }

    #[test]
    fn notification_carries_contact_and_details() {
        let lead = Lead::from_intake(intake(LeadKind::SiteRequest), Utc::now()).unwrap();
        let mail = lead.notification("team@studio.example");

        assert_eq!(mail.to, "team@studio.example");
        assert_eq!(mail.subject, "[Studio] Website development request");
        assert!(mail.body.contains("Olena"));
        assert!(mail.body.contains("Landing page for a bakery"));
    }

    #[test]
    fn blank_optional_fields_are_dropped() {
        let mut raw = intake(LeadKind::Consultation);
        raw.details = Some("   ".into());
        raw.email = Some(String::new());
        let lead = Lead::from_intake(raw, Utc::now()).unwrap();
        assert!(lead.extras.is_empty());
        assert_eq!(lead.email, None);
        assert!(lead.notification("x@y.z").body.contains("Not provided"));
    }
}
