//! Project Price Calculator
//!
//! Five-question quiz producing a ballpark quote in UAH: a base price per
//! project type, an urgency adjustment, and a surcharge when the project
//! needs online payments. The result goes to the visitor (when they left
//! an email) and to the studio inbox.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::mailer::OutboundMail;

/// What kind of project is being quoted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    Website,
    TelegramBot,
    Advertising,
    OnlineStore,
    MobileApp,
}

impl ProjectType {
    /// Base quote in UAH
    pub fn base_price(&self) -> Decimal {
        Decimal::from(match self {
            ProjectType::Website => 15_000,
            ProjectType::TelegramBot => 8_000,
            ProjectType::Advertising => 5_000,
            ProjectType::OnlineStore => 25_000,
            ProjectType::MobileApp => 35_000,
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::Website => "Website (landing or corporate site)",
            ProjectType::TelegramBot => "Telegram bot",
            ProjectType::Advertising => "Advertising (Google Ads, Facebook Ads)",
            ProjectType::OnlineStore => "Online store",
            ProjectType::MobileApp => "Mobile application",
        }
    }
}

/// How soon the project is needed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    /// 3-7 days
    Rush,
    /// 10-14 days
    Standard,
    /// 2-4 weeks
    Relaxed,
    /// No fixed schedule
    Flexible,
}

impl Urgency {
    fn multiplier(&self) -> Decimal {
        match self {
            Urgency::Rush => Decimal::new(15, 1),    // 1.5
            Urgency::Relaxed => Decimal::new(9, 1),  // 0.9
            Urgency::Standard | Urgency::Flexible => Decimal::ONE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Rush => "Urgent (3-7 days)",
            Urgency::Standard => "Standard (10-14 days)",
            Urgency::Relaxed => "No rush (2-4 weeks)",
            Urgency::Flexible => "Flexible schedule",
        }
    }
}

/// How prepared the client already is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadinessLevel {
    IdeasOnly,
    HasDesign,
    HasSpec,
    HasBranding,
    HasContent,
}

impl ReadinessLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ReadinessLevel::IdeasOnly => "Only ideas, needs a consultation",
            ReadinessLevel::HasDesign => "Has mockups/design",
            ReadinessLevel::HasSpec => "Has a technical specification",
            ReadinessLevel::HasBranding => "Has a logo and branding",
            ReadinessLevel::HasContent => "Has social media and content",
        }
    }
}

/// Completed quiz answers
#[derive(Clone, Debug, Deserialize)]
pub struct QuizAnswers {
    pub project_type: ProjectType,
    pub urgency: Urgency,
    /// Whether the project must accept online payments
    #[serde(default)]
    pub online_payments: bool,
    pub readiness: ReadinessLevel,
}

/// Surcharge applied when the project needs payment acceptance
const PAYMENTS_SURCHARGE: i64 = 5_000;

impl QuizAnswers {
    /// Compute the ballpark quote
    pub fn estimate(&self) -> PriceEstimate {
        let mut amount = self.project_type.base_price() * self.urgency.multiplier();
        if self.online_payments {
            amount += Decimal::from(PAYMENTS_SURCHARGE);
        }
        PriceEstimate {
            amount: amount.round(),
            answers: self.clone(),
        }
    }
}

/// A computed quote plus the answers it came from
#[derive(Clone, Debug)]
pub struct PriceEstimate {
    /// Estimated price in UAH
    pub amount: Decimal,
    pub answers: QuizAnswers,
}

impl PriceEstimate {
    fn answers_summary(&self) -> String {
        format!(
            "1. {}\n2. {}\n3. Online payments: {}\n4. {}\n",
            self.answers.project_type.label(),
            self.answers.urgency.label(),
            if self.answers.online_payments { "yes" } else { "no" },
            self.answers.readiness.label(),
        )
    }

    /// Result mail for the visitor
    pub fn client_mail(&self, name: &str, email: &str) -> OutboundMail {
        OutboundMail {
            to: email.to_string(),
            subject: "Your project price estimate".into(),
            body: format!(
                "Thank you for completing the quiz!\n\n\
                 Hello, {name}!\n\n\
                 Based on your answers, the estimated project price is: {} UAH\n\n\
                 === YOUR ANSWERS ===\n{}\n\
                 === NEXT STEPS ===\n\
                 1. We will contact you within 2 hours to clarify the details\n\
                 2. We will hold a detailed consultation\n\
                 3. We will prepare a precise specification and a final price\n",
                self.amount,
                self.answers_summary(),
            ),
        }
    }

    /// Result mail for the studio inbox
    pub fn studio_mail(&self, name: &str, phone: &str, email: Option<&str>, inbox: &str) -> OutboundMail {
        OutboundMail {
            to: inbox.to_string(),
            subject: format!("[Studio] New project estimate - {} UAH", self.amount),
            body: format!(
                "New project estimate\n\n\
                 === CONTACT ===\n\
                 Name: {name}\n\
                 Phone: {phone}\n\
                 Email: {}\n\n\
                 === RESULT ===\n\
                 Estimated price: {} UAH\n\n\
                 === ANSWERS ===\n{}",
                email.unwrap_or("Not provided"),
                self.amount,
                self.answers_summary(),
            ),
        }
    }
}
