//! Payment Pages and Gateway Webhook
//!
//! The payer-facing routes render HTML; the webhook speaks JSON. Every
//! webhook payload is signature-checked before it can touch a link, and
//! an authentication or shape failure is a 400 with no state change.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::Utc;
use uuid::Uuid;

use studio_payments::{CallbackOutcome, InvoiceOutcome, PageView, PaymentError};

use crate::error::ApiError;
use crate::state::AppState;
use crate::views;

/// Header carrying the webhook signature
const SIGNATURE_HEADER: &str = "x-callback-signature";

/// `GET /pay/{unique_id}`
///
/// The first successful view stamps the expiry anchor; a terminal or
/// expired link renders the inactive view instead of the pay button.
pub async fn payment_page(
    State(state): State<AppState>,
    Path(unique_id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    match state.lifecycle.open(&unique_id, Utc::now())? {
        PageView::Payable(link) => Ok(views::payment_page(&link)),
        PageView::Inactive { link, reason } => Ok(views::inactive_page(&link, reason)),
    }
}

/// `POST /pay/{unique_id}/invoice`
///
/// Creates (or reuses) the gateway invoice and redirects the payer to the
/// hosted checkout page. Gateway failure renders the failure view and
/// persists nothing; the payer can simply try again.
pub async fn create_invoice(
    State(state): State<AppState>,
    Path(unique_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let gateway = state
        .gateway
        .as_deref()
        .ok_or(ApiError::Unavailable("Payments"))?;

    let outcome = state
        .lifecycle
        .request_invoice(
            &unique_id,
            gateway,
            &state.redirect_url(&unique_id),
            &state.webhook_url(),
            Utc::now(),
        )
        .await;

    match outcome {
        Ok(InvoiceOutcome::Redirect { page_url }) => Ok(Redirect::to(&page_url).into_response()),
        Ok(InvoiceOutcome::Inactive { link, reason }) => {
            Ok(views::inactive_page(&link, reason).into_response())
        }
        Err(err @ PaymentError::Gateway(_)) => {
            tracing::error!(unique_id = %unique_id, error = %err, "Invoice creation failed");
            Ok((
                StatusCode::BAD_GATEWAY,
                views::failure_page(err.user_message()),
            )
                .into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// `GET /pay/{unique_id}/success`: post-checkout landing, no mutation
pub async fn success_page(
    State(state): State<AppState>,
    Path(unique_id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let link = state.lifecycle.find(&unique_id)?;
    Ok(views::success_page(&link))
}

/// `GET /pay/{unique_id}/failure`: gateway-reported failure, no mutation
pub async fn failure_page(
    State(state): State<AppState>,
    Path(unique_id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    state.lifecycle.find(&unique_id)?;
    Ok(views::failure_page(
        "The bank reported the payment as unsuccessful.",
    ))
}

/// `POST /webhooks/acquiring`
///
/// Signature first, parse second, state change last. Duplicate deliveries
/// and out-of-order statuses are acknowledged without effect.
pub async fn acquiring_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let verifier = state
        .verifier
        .as_deref()
        .ok_or(ApiError::Unavailable("Payments"))?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Webhook without a signature header");
            ApiError::BadRequest("Missing signature header".into())
        })?;

    let callback = verifier
        .verify_and_parse(&body, signature, Utc::now())
        .map_err(|err| {
            tracing::warn!(error = %err, "Webhook rejected");
            ApiError::from(err)
        })?;

    let outcome = state.lifecycle.apply_callback(&callback).map_err(|err| {
        if matches!(err, PaymentError::LinkNotFound(_)) {
            tracing::warn!(reference = %callback.reference, "Webhook for unknown reference");
            ApiError::BadRequest("Unknown payment reference".into())
        } else {
            err.into()
        }
    })?;

    tracing::info!(
        reference = %callback.reference,
        outcome = ?outcome,
        "Webhook processed"
    );

    let changed = matches!(
        outcome,
        CallbackOutcome::MarkedPaid | CallbackOutcome::MarkedExpired
    );
    Ok(Json(serde_json::json!({ "ok": true, "changed": changed })))
}
