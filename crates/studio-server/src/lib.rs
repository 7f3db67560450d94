//! # studio-server
//!
//! Axum HTTP server for studio-site: payment pages, the acquiring
//! webhook, and the JSON API for blog, events, and lead forms. The router
//! is exposed so integration tests can drive it in-process.

pub mod config;
pub mod error;
pub mod handlers;
pub mod seed;
pub mod state;
pub mod views;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        // Payment pages
        .route("/pay/{unique_id}", get(handlers::payment_page))
        .route("/pay/{unique_id}/invoice", post(handlers::create_invoice))
        .route("/pay/{unique_id}/success", get(handlers::success_page))
        .route("/pay/{unique_id}/failure", get(handlers::failure_page))
        .route("/webhooks/acquiring", post(handlers::acquiring_webhook))
        // Admin
        .route("/api/links", post(handlers::create_link))
        .route("/api/links/{unique_id}", get(handlers::get_link))
        .route(
            "/api/links/{unique_id}/deactivate",
            post(handlers::deactivate_link),
        )
        // Blog
        .route("/api/blog", get(handlers::list_blog))
        .route("/api/blog/search", get(handlers::search_blog))
        .route("/api/blog/{slug}", get(handlers::blog_post))
        // Events
        .route("/api/events", get(handlers::list_events))
        .route("/api/events/{slug}", get(handlers::event_detail))
        .route("/api/events/{id}/register", post(handlers::register_for_event))
        // Leads
        .route("/api/forms", post(handlers::submit_form))
        .route("/api/calculator", post(handlers::calculator))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
