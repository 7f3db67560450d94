//! Administrative Endpoints
//!
//! Link creation and deactivation, guarded by a shared token in the
//! `X-Admin-Token` header. There is no session or user model; the token
//! comes from configuration and rotating it is an ops action.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use studio_payments::{Currency, LinkStatus, PaymentLink, Transition};

use crate::error::ApiError;
use crate::state::AppState;

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let presented = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    if presented != state.config.admin_token {
        tracing::warn!("Admin request with a bad token");
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct CreateLinkRequest {
    pub client_name: String,
    #[serde(default)]
    pub description: String,
    pub original_amount: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct LinkResponse {
    pub unique_id: Uuid,
    pub url: String,
    pub status: LinkStatus,
    pub amount: Decimal,
    pub currency: Currency,
}

impl LinkResponse {
    fn from_link(state: &AppState, link: &PaymentLink) -> Self {
        Self {
            unique_id: link.unique_id,
            url: state.payment_url(&link.unique_id),
            status: link.status,
            amount: link.final_amount(),
            currency: link.currency,
        }
    }
}

/// `POST /api/links`
pub async fn create_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), ApiError> {
    require_admin(&state, &headers)?;

    if request.client_name.trim().is_empty() {
        return Err(ApiError::BadRequest("client_name is required".into()));
    }
    if request.discount < Decimal::ZERO || request.original_amount <= request.discount {
        return Err(ApiError::BadRequest(
            "the discounted amount must be positive".into(),
        ));
    }

    let mut link = PaymentLink::new(
        request.client_name.trim(),
        request.description.trim(),
        request.original_amount,
        request.discount,
        request.currency,
    );
    if let Some(minutes) = request.duration_minutes {
        link = link.with_duration_minutes(minutes);
    }
    if let Some(deadline) = request.deadline {
        link = link.with_deadline(deadline);
    }

    let link = state.lifecycle.create(link)?;
    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(&state, &link)),
    ))
}

/// `GET /api/links/{unique_id}`: status inspection
pub async fn get_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(unique_id): Path<Uuid>,
) -> Result<Json<LinkResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let link = state.lifecycle.find(&unique_id)?;
    Ok(Json(LinkResponse::from_link(&state, &link)))
}

/// `POST /api/links/{unique_id}/deactivate`
///
/// Ends a link's life regardless of remaining validity. Paid links are
/// never touched; repeating the call is a no-op.
pub async fn deactivate_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(unique_id): Path<Uuid>,
) -> Result<Json<LinkResponse>, ApiError> {
    require_admin(&state, &headers)?;

    match state.lifecycle.deactivate(&unique_id)? {
        Transition::Applied | Transition::Unchanged => {
            let link = state.lifecycle.find(&unique_id)?;
            Ok(Json(LinkResponse::from_link(&state, &link)))
        }
        Transition::Refused(current) => Err(ApiError::Conflict(format!(
            "a {current} link cannot be deactivated"
        ))),
    }
}
