//! # studio-content
//!
//! Blog and events domain for studio-site: models, filtered listings with
//! pagination, slug generation, and event registration with an atomic
//! participant counter.
//!
//! The stores are trait seams with in-memory implementations; every
//! registration runs its duplicate check, capacity check, counter increment,
//! and insert under one write guard, so concurrent registrations can neither
//! overbook an event nor lose counter updates.

mod error;
mod model;
mod page;
mod slug;
mod store;

pub use error::{ContentError, Result};
pub use model::{
    BlogCategory, BlogPost, Event, EventCategory, EventKind, EventPhase, EventRegistration,
};
pub use page::Page;
pub use slug::slugify;
pub use store::{
    BLOG_PER_PAGE, BlogFilter, BlogStore, EVENTS_PER_PAGE, EventFilter, EventSort, EventStore,
    MemoryBlogStore, MemoryEventStore, RegistrationRequest,
};
