//! Domain Models
//!
//! Blog posts, events, and registrations. Monetary values use
//! `rust_decimal` - never f64 for money.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slug::slugify;

/// Blog post category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlogCategory {
    WebDevelopment,
    Courses,
    TelegramBots,
    Business,
    Technology,
    AiDevelopment,
    AiAgents,
    AiAutomation,
}

impl BlogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogCategory::WebDevelopment => "web-development",
            BlogCategory::Courses => "courses",
            BlogCategory::TelegramBots => "telegram-bots",
            BlogCategory::Business => "business",
            BlogCategory::Technology => "technology",
            BlogCategory::AiDevelopment => "ai-development",
            BlogCategory::AiAgents => "ai-agents",
            BlogCategory::AiAutomation => "ai-automation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "web-development" => Some(BlogCategory::WebDevelopment),
            "courses" => Some(BlogCategory::Courses),
            "telegram-bots" => Some(BlogCategory::TelegramBots),
            "business" => Some(BlogCategory::Business),
            "technology" => Some(BlogCategory::Technology),
            "ai-development" => Some(BlogCategory::AiDevelopment),
            "ai-agents" => Some(BlogCategory::AiAgents),
            "ai-automation" => Some(BlogCategory::AiAutomation),
            _ => None,
        }
    }
}

/// A blog article
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    /// URL slug, unique; generated from the title when absent
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: BlogCategory,
    /// Comma-separated keywords
    pub keywords: String,
    /// Estimated reading time in minutes
    pub reading_time_minutes: u32,
    pub meta_title: String,
    pub meta_description: String,
    pub og_title: String,
    pub og_description: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Create a published post; slug and meta fields are filled from the
    /// title/excerpt when blank.
    pub fn new(
        title: impl Into<String>,
        excerpt: impl Into<String>,
        content: impl Into<String>,
        category: BlogCategory,
    ) -> Self {
        let now = Utc::now();
        let mut post = Self {
            id: Uuid::new_v4(),
            title: title.into(),
            slug: String::new(),
            excerpt: excerpt.into(),
            content: content.into(),
            category,
            keywords: String::new(),
            reading_time_minutes: 5,
            meta_title: String::new(),
            meta_description: String::new(),
            og_title: String::new(),
            og_description: String::new(),
            published: true,
            created_at: now,
            updated_at: now,
        };
        post.fill_derived();
        post
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn with_reading_time(mut self, minutes: u32) -> Self {
        self.reading_time_minutes = minutes;
        self
    }

    pub fn unpublished(mut self) -> Self {
        self.published = false;
        self
    }

    /// Fill the slug and blank meta/OG fields from title and excerpt
    pub fn fill_derived(&mut self) {
        if self.slug.is_empty() {
            self.slug = slugify(&self.title);
        }
        if self.meta_title.is_empty() {
            self.meta_title = truncated(&self.title, 60);
        }
        if self.meta_description.is_empty() {
            self.meta_description = truncated(&self.excerpt, 160);
        }
        if self.og_title.is_empty() {
            self.og_title = truncated(&self.title, 60);
        }
        if self.og_description.is_empty() {
            self.og_description = truncated(&self.excerpt, 160);
        }
    }

    /// Keywords split into a list
    pub fn keywords_list(&self) -> Vec<&str> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }

    /// Human-readable reading time
    pub fn reading_time_text(&self) -> String {
        if self.reading_time_minutes == 1 {
            "1 minute".into()
        } else {
            format!("{} minutes", self.reading_time_minutes)
        }
    }
}

fn truncated(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Event category (webinars, discounts, ...)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// Accent color in hex, used by the frontend
    pub color: String,
    pub icon: String,
}

impl EventCategory {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&name),
            name,
            color: "#E65100".into(),
            icon: String::new(),
        }
    }
}

/// Kind of event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Webinar,
    Discount,
    Course,
    Workshop,
    Meetup,
    Other,
}

impl EventKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "webinar" => Some(EventKind::Webinar),
            "discount" => Some(EventKind::Discount),
            "course" => Some(EventKind::Course),
            "workshop" => Some(EventKind::Workshop),
            "meetup" => Some(EventKind::Meetup),
            "other" => Some(EventKind::Other),
            _ => None,
        }
    }
}

/// Where the event sits in its own schedule
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPhase {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl EventPhase {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upcoming" => Some(EventPhase::Upcoming),
            "active" => Some(EventPhase::Active),
            "completed" => Some(EventPhase::Completed),
            "cancelled" => Some(EventPhase::Cancelled),
            _ => None,
        }
    }
}

/// A site event: webinar, course intake, discount campaign, ...
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category_id: Uuid,
    pub kind: EventKind,
    pub phase: EventPhase,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    /// Registration closes here; falls back to the start time when unset
    pub registration_deadline: Option<DateTime<Utc>>,
    pub location: String,
    pub is_online: bool,
    pub meeting_link: String,
    /// Base ticket price; `None` means free
    pub price: Option<Decimal>,
    /// Percentage off the base price
    pub discount_percent: u8,
    /// Seat cap; `None` means unlimited
    pub max_participants: Option<u32>,
    /// Maintained atomically by the store on registration
    pub current_participants: u32,
    pub published: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        title: impl Into<String>,
        category_id: Uuid,
        kind: EventKind,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> Self {
        let title = title.into();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&title),
            title,
            excerpt: String::new(),
            content: String::new(),
            category_id,
            kind,
            phase: EventPhase::Upcoming,
            start_at,
            end_at,
            registration_deadline: None,
            location: String::new(),
            is_online: true,
            meeting_link: String::new(),
            price: None,
            discount_percent: 0,
            max_participants: None,
            current_participants: 0,
            published: true,
            featured: false,
            created_at: Utc::now(),
        }
    }

    /// The price after the discount; `None` for free events
    pub fn current_price(&self) -> Option<Decimal> {
        let base = self.price?;
        if self.discount_percent == 0 {
            return Some(base);
        }
        let keep = Decimal::from(100u32 - u32::from(self.discount_percent.min(100)));
        Some(base * keep / Decimal::ONE_HUNDRED)
    }

    /// Whether registration is open at `now`: before the deadline when one
    /// is set, otherwise before the start
    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        if self.phase == EventPhase::Cancelled {
            return false;
        }
        match self.registration_deadline {
            Some(deadline) => now <= deadline,
            None => now <= self.start_at,
        }
    }

    pub fn is_full(&self) -> bool {
        self.max_participants
            .is_some_and(|max| self.current_participants >= max)
    }

    /// Remaining spots; `None` when uncapped
    pub fn available_spots(&self) -> Option<u32> {
        self.max_participants
            .map(|max| max.saturating_sub(self.current_participants))
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_at > now
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start_at <= now && now <= self.end_at
    }
}

/// A registration for an event, unique per (event, email)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: String,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}
