//! Content Storage
//!
//! Trait seams plus in-memory implementations. The event store keeps
//! events and registrations behind one lock: a registration's duplicate
//! check, capacity check, counter increment, and insert form a single
//! critical section, so concurrent signups can neither overbook nor lose
//! counter updates.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{ContentError, Result};
use crate::model::{
    BlogCategory, BlogPost, Event, EventCategory, EventKind, EventPhase, EventRegistration,
};
use crate::page::Page;

/// Blog listing page size
pub const BLOG_PER_PAGE: usize = 9;

/// Events listing page size
pub const EVENTS_PER_PAGE: usize = 6;

/// Blog listing filter
#[derive(Clone, Debug, Default)]
pub struct BlogFilter {
    pub category: Option<BlogCategory>,
    pub page: usize,
}

/// Blog storage
pub trait BlogStore: Send + Sync {
    /// Insert a post; fails on a duplicate slug
    fn insert(&self, post: BlogPost) -> Result<()>;

    /// Published posts, newest first, filtered and paginated
    fn list(&self, filter: &BlogFilter) -> Result<Page<BlogPost>>;

    /// Fetch a published post by slug
    fn get_by_slug(&self, slug: &str) -> Result<BlogPost>;

    /// Case-insensitive search over title, content, and keywords
    fn search(&self, query: &str, page: usize) -> Result<Page<BlogPost>>;

    /// Published posts in the same category, excluding the post itself
    fn related(&self, post: &BlogPost, limit: usize) -> Result<Vec<BlogPost>>;

    /// Most recent published posts
    fn popular(&self, limit: usize) -> Result<Vec<BlogPost>>;
}

/// In-memory blog store
pub struct MemoryBlogStore {
    posts: RwLock<Vec<BlogPost>>,
}

impl Default for MemoryBlogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlogStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.posts.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn published_sorted(&self) -> Vec<BlogPost> {
        let posts = self.posts.read().unwrap();
        let mut out: Vec<BlogPost> = posts.iter().filter(|p| p.published).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

impl BlogStore for MemoryBlogStore {
    fn insert(&self, post: BlogPost) -> Result<()> {
        let mut posts = self.posts.write().unwrap();
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(ContentError::DuplicateSlug(post.slug));
        }
        posts.push(post);
        Ok(())
    }

    fn list(&self, filter: &BlogFilter) -> Result<Page<BlogPost>> {
        let mut posts = self.published_sorted();
        if let Some(category) = filter.category {
            posts.retain(|p| p.category == category);
        }
        Ok(Page::paginate(posts, filter.page, BLOG_PER_PAGE))
    }

    fn get_by_slug(&self, slug: &str) -> Result<BlogPost> {
        let posts = self.posts.read().unwrap();
        posts
            .iter()
            .find(|p| p.published && p.slug == slug)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(format!("blog post '{slug}'")))
    }

    fn search(&self, query: &str, page: usize) -> Result<Page<BlogPost>> {
        let needle = query.trim().to_lowercase();
        let mut posts = self.published_sorted();
        if !needle.is_empty() {
            posts.retain(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.content.to_lowercase().contains(&needle)
                    || p.keywords.to_lowercase().contains(&needle)
            });
        }
        Ok(Page::paginate(posts, page, BLOG_PER_PAGE))
    }

    fn related(&self, post: &BlogPost, limit: usize) -> Result<Vec<BlogPost>> {
        Ok(self
            .published_sorted()
            .into_iter()
            .filter(|p| p.category == post.category && p.id != post.id)
            .take(limit)
            .collect())
    }

    fn popular(&self, limit: usize) -> Result<Vec<BlogPost>> {
        Ok(self.published_sorted().into_iter().take(limit).collect())
    }
}

/// Sort order for event listings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventSort {
    #[default]
    StartDateDesc,
    StartDateAsc,
}

/// Events listing filter
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    pub category_slug: Option<String>,
    pub kind: Option<EventKind>,
    pub phase: Option<EventPhase>,
    pub sort: EventSort,
    pub page: usize,
}

/// A signup request for an event
#[derive(Clone, Debug)]
pub struct RegistrationRequest {
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: String,
}

/// Events storage
pub trait EventStore: Send + Sync {
    fn insert_category(&self, category: EventCategory) -> Result<()>;

    fn categories(&self) -> Result<Vec<EventCategory>>;

    /// Insert an event; fails on a duplicate slug
    fn insert(&self, event: Event) -> Result<()>;

    /// Published events, filtered, sorted, and paginated
    fn list(&self, filter: &EventFilter) -> Result<Page<Event>>;

    /// Fetch a published event by slug
    fn get_by_slug(&self, slug: &str) -> Result<Event>;

    /// Fetch a published event by id
    fn get(&self, id: &Uuid) -> Result<Event>;

    /// Published events sharing a category, excluding the event itself
    fn similar(&self, event: &Event, limit: usize) -> Result<Vec<Event>>;

    /// Register for an event: deadline, duplicate-email, and capacity
    /// checks plus the participant-counter increment run atomically.
    fn register(&self, request: RegistrationRequest, now: DateTime<Utc>)
        -> Result<EventRegistration>;

    /// Registrations for one event, newest first
    fn registrations(&self, event_id: &Uuid) -> Result<Vec<EventRegistration>>;
}

struct EventsInner {
    categories: Vec<EventCategory>,
    events: HashMap<Uuid, Event>,
    registrations: Vec<EventRegistration>,
}

/// In-memory event store, one lock over events and registrations
pub struct MemoryEventStore {
    inner: RwLock<EventsInner>,
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(EventsInner {
                categories: Vec::new(),
                events: HashMap::new(),
                registrations: Vec::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventStore for MemoryEventStore {
    fn insert_category(&self, category: EventCategory) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.categories.iter().any(|c| c.slug == category.slug) {
            return Err(ContentError::DuplicateSlug(category.slug));
        }
        inner.categories.push(category);
        Ok(())
    }

    fn categories(&self) -> Result<Vec<EventCategory>> {
        let inner = self.inner.read().unwrap();
        let mut categories = inner.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    fn insert(&self, event: Event) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.events.values().any(|e| e.slug == event.slug) {
            return Err(ContentError::DuplicateSlug(event.slug));
        }
        inner.events.insert(event.id, event);
        Ok(())
    }

    fn list(&self, filter: &EventFilter) -> Result<Page<Event>> {
        let inner = self.inner.read().unwrap();

        let category_id = match &filter.category_slug {
            Some(slug) => {
                let category = inner
                    .categories
                    .iter()
                    .find(|c| &c.slug == slug)
                    .ok_or_else(|| ContentError::NotFound(format!("event category '{slug}'")))?;
                Some(category.id)
            }
            None => None,
        };

        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.published)
            .filter(|e| category_id.is_none_or(|id| e.category_id == id))
            .filter(|e| filter.kind.is_none_or(|k| e.kind == k))
            .filter(|e| filter.phase.is_none_or(|p| e.phase == p))
            .cloned()
            .collect();

        match filter.sort {
            EventSort::StartDateDesc => events.sort_by(|a, b| b.start_at.cmp(&a.start_at)),
            EventSort::StartDateAsc => events.sort_by(|a, b| a.start_at.cmp(&b.start_at)),
        }

        Ok(Page::paginate(events, filter.page, EVENTS_PER_PAGE))
    }

    fn get_by_slug(&self, slug: &str) -> Result<Event> {
        let inner = self.inner.read().unwrap();
        inner
            .events
            .values()
            .find(|e| e.published && e.slug == slug)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(format!("event '{slug}'")))
    }

    fn get(&self, id: &Uuid) -> Result<Event> {
        let inner = self.inner.read().unwrap();
        inner
            .events
            .get(id)
            .filter(|e| e.published)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(format!("event {id}")))
    }

    fn similar(&self, event: &Event, limit: usize) -> Result<Vec<Event>> {
        let inner = self.inner.read().unwrap();
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.published && e.category_id == event.category_id && e.id != event.id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.start_at.cmp(&a.start_at));
        events.truncate(limit);
        Ok(events)
    }

    fn register(
        &self,
        request: RegistrationRequest,
        now: DateTime<Utc>,
    ) -> Result<EventRegistration> {
        let email = request.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ContentError::Validation("A valid email is required".into()));
        }

        let mut inner = self.inner.write().unwrap();

        let already = inner
            .registrations
            .iter()
            .any(|r| r.event_id == request.event_id && r.email == email);

        let event = inner
            .events
            .get_mut(&request.event_id)
            .filter(|e| e.published)
            .ok_or_else(|| ContentError::NotFound(format!("event {}", request.event_id)))?;

        if !event.is_registration_open(now) {
            return Err(ContentError::RegistrationClosed(event.title.clone()));
        }
        if already {
            return Err(ContentError::AlreadyRegistered(event.title.clone()));
        }
        if event.is_full() {
            return Err(ContentError::EventFull(event.title.clone()));
        }

        event.current_participants += 1;
        let registration = EventRegistration {
            id: Uuid::new_v4(),
            event_id: request.event_id,
            name: request.name,
            email,
            phone: request.phone,
            company: request.company,
            message: request.message,
            confirmed: false,
            created_at: now,
        };
        inner.registrations.push(registration.clone());

        tracing::info!(
            event_id = %request.event_id,
            email = %registration.email,
            "Registered for event"
        );
        Ok(registration)
    }

    fn registrations(&self, event_id: &Uuid) -> Result<Vec<EventRegistration>> {
        let inner = self.inner.read().unwrap();
        let mut out: Vec<EventRegistration> = inner
            .registrations
            .iter()
            .filter(|r| &r.event_id == event_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }
}
