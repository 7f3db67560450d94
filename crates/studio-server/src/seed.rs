//! Demo Content Seed
//!
//! The stores are in-memory, so without persistence the blog and events
//! endpoints would serve nothing after a restart. Until a database lands,
//! boot seeds a small set of demo content so the site is browsable.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use studio_content::{
    BlogCategory, BlogPost, BlogStore, Event, EventCategory, EventKind, EventStore,
    MemoryBlogStore, MemoryEventStore,
};

pub fn seed_content(blog: &MemoryBlogStore, events: &MemoryEventStore) {
    let posts = [
        BlogPost::new(
            "How Much Does a Website Cost",
            "A breakdown of what goes into a website quote.",
            "Landing pages, corporate sites and stores are priced differently. \
             This post walks through the main cost drivers and what you can \
             prepare to keep the budget down.",
            BlogCategory::Business,
        )
        .with_keywords("pricing, website, budget")
        .with_reading_time(4),
        BlogPost::new(
            "Why Your Business Needs a Telegram Bot",
            "Bots handle orders and questions while you sleep.",
            "A Telegram bot answers routine questions, takes orders and frees \
             the team for work that actually needs a human.",
            BlogCategory::TelegramBots,
        )
        .with_reading_time(3),
    ];
    for post in posts {
        if let Err(err) = blog.insert(post) {
            tracing::warn!(error = %err, "Skipping demo blog post");
        }
    }

    let category = EventCategory::new("Webinars");
    let category_id = category.id;
    if let Err(err) = events.insert_category(category) {
        tracing::warn!(error = %err, "Skipping demo event category");
    }

    let now = Utc::now();
    let mut webinar = Event::new(
        "Free Webinar: Your First Website",
        category_id,
        EventKind::Webinar,
        now + Duration::days(14),
        now + Duration::days(14) + Duration::hours(2),
    );
    webinar.excerpt = "What to prepare before ordering a website.".into();
    webinar.max_participants = Some(100);

    let mut course = Event::new(
        "Python Course Intake",
        category_id,
        EventKind::Course,
        now + Duration::days(30),
        now + Duration::days(90),
    );
    course.excerpt = "Three-month practical programming course.".into();
    course.price = Some(Decimal::from(6000));
    course.discount_percent = 10;
    course.max_participants = Some(20);
    course.registration_deadline = Some(now + Duration::days(28));

    for event in [webinar, course] {
        if let Err(err) = events.insert(event) {
            tracing::warn!(error = %err, "Skipping demo event");
        }
    }

    tracing::info!(
        posts = blog.len(),
        events = events.len(),
        "Seeded demo content"
    );
}
