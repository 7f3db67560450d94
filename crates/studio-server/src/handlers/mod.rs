//! HTTP Handlers

mod admin;
mod blog;
mod events;
mod health;
mod leads;
mod payment;

pub use admin::{create_link, deactivate_link, get_link};
pub use blog::{blog_post, list_blog, search_blog};
pub use events::{event_detail, list_events, register_for_event};
pub use health::health_check;
pub use leads::{calculator, submit_form};
pub use payment::{
    acquiring_webhook, create_invoice, failure_page, payment_page, success_page,
};
