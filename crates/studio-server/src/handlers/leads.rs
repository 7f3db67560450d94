//! Lead Forms and Price Calculator

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use studio_leads::{Lead, LeadIntake, LeadStore, QuizAnswers, validate_phone};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct FormResponse {
    pub message: &'static str,
}

/// `POST /api/forms`
///
/// One endpoint for every form on the site; `kind` selects the pipeline.
/// The lead is recorded first, the inbox notification is best-effort.
pub async fn submit_form(
    State(state): State<AppState>,
    Json(intake): Json<LeadIntake>,
) -> Result<Json<FormResponse>, ApiError> {
    let lead = Lead::from_intake(intake, Utc::now())?;
    let message = lead.kind.confirmation();
    let notification = lead.notification(&state.config.contact_email);

    state.leads.save(lead)?;
    if let Err(err) = state.mailer.send(notification).await {
        tracing::error!(error = %err, "Lead notification mail failed");
    }

    Ok(Json(FormResponse { message }))
}

#[derive(Deserialize)]
pub struct CalculatorRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub answers: QuizAnswers,
}

#[derive(Serialize)]
pub struct CalculatorResponse {
    /// Estimated price in UAH
    pub amount: Decimal,
    pub message: &'static str,
}

/// `POST /api/calculator`
///
/// Computes the quote, mails it to the visitor when they left an email,
/// and always notifies the studio inbox.
pub async fn calculator(
    State(state): State<AppState>,
    Json(request): Json<CalculatorRequest>,
) -> Result<Json<CalculatorResponse>, ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Please enter your name".into()));
    }
    if !validate_phone(&request.phone) {
        return Err(ApiError::BadRequest(
            "Please enter a valid phone number".into(),
        ));
    }

    let estimate = request.answers.estimate();
    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    if let Some(email) = email {
        if let Err(err) = state.mailer.send(estimate.client_mail(name, email)).await {
            tracing::error!(error = %err, "Estimate mail to the visitor failed");
        }
    }
    let studio = estimate.studio_mail(name, &request.phone, email, &state.config.contact_email);
    if let Err(err) = state.mailer.send(studio).await {
        tracing::error!(error = %err, "Estimate mail to the inbox failed");
    }

    Ok(Json(CalculatorResponse {
        amount: estimate.amount,
        message: "We will contact you within 2 hours to discuss the details.",
    }))
}
