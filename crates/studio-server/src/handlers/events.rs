//! Events API

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use studio_content::{
    Event, EventCategory, EventFilter, EventKind, EventPhase, EventSort, EventStore, Page,
    RegistrationRequest,
};

use crate::error::ApiError;
use crate::state::AppState;

fn first_page() -> usize {
    1
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default = "first_page")]
    pub page: usize,
}

#[derive(Serialize)]
pub struct EventsIndex {
    #[serde(flatten)]
    pub page: Page<Event>,
    /// All categories, for the filter bar
    pub categories: Vec<EventCategory>,
}

/// `GET /api/events?category=&kind=&phase=&sort=&page=`
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<EventsIndex>, ApiError> {
    let kind = match &query.kind {
        Some(raw) => Some(
            EventKind::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown event kind '{raw}'")))?,
        ),
        None => None,
    };
    let phase = match &query.phase {
        Some(raw) => Some(
            EventPhase::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown event phase '{raw}'")))?,
        ),
        None => None,
    };
    let sort = match query.sort.as_deref() {
        None | Some("desc") => EventSort::StartDateDesc,
        Some("asc") => EventSort::StartDateAsc,
        Some(other) => {
            return Err(ApiError::BadRequest(format!("Unknown sort '{other}'")));
        }
    };

    let page = state.events.list(&EventFilter {
        category_slug: query.category.clone(),
        kind,
        phase,
        sort,
        page: query.page,
    })?;
    Ok(Json(EventsIndex {
        page,
        categories: state.events.categories()?,
    }))
}

#[derive(Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub current_price: Option<Decimal>,
    pub available_spots: Option<u32>,
    pub registration_open: bool,
    pub upcoming: bool,
    pub in_progress: bool,
    pub similar: Vec<Event>,
}

/// `GET /api/events/{slug}`
pub async fn event_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<EventDetail>, ApiError> {
    let event = state.events.get_by_slug(&slug)?;
    let similar = state.events.similar(&event, 3)?;
    let now = Utc::now();
    Ok(Json(EventDetail {
        current_price: event.current_price(),
        available_spots: event.available_spots(),
        registration_open: event.is_registration_open(now),
        upcoming: event.is_upcoming(now),
        in_progress: event.is_active(now),
        event,
        similar,
    }))
}

#[derive(Deserialize)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub registration_id: Uuid,
    pub message: &'static str,
}

/// `POST /api/events/{id}/register`
///
/// The store runs deadline, duplicate, and capacity checks atomically;
/// the notification mail is best-effort and never undoes a registration.
pub async fn register_for_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let event = state.events.get(&id)?;
    let registration = state.events.register(
        RegistrationRequest {
            event_id: id,
            name: body.name,
            email: body.email,
            phone: body.phone,
            company: body.company,
            message: body.message,
        },
        Utc::now(),
    )?;

    let mail = studio_leads::OutboundMail {
        to: state.config.contact_email.clone(),
        subject: format!("[Studio] New registration: {}", event.title),
        body: format!(
            "Event: {}\nName: {}\nEmail: {}\nPhone: {}\nCompany: {}\nMessage: {}\n",
            event.title,
            registration.name,
            registration.email,
            registration.phone,
            registration.company,
            registration.message,
        ),
    };
    if let Err(err) = state.mailer.send(mail).await {
        tracing::error!(error = %err, "Registration notification mail failed");
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            registration_id: registration.id,
            message: "You are registered. We will send the details by email.",
        }),
    ))
}
