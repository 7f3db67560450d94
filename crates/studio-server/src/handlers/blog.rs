//! Blog API

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use studio_content::{BlogCategory, BlogFilter, BlogPost, BlogStore, Page};

use crate::error::ApiError;
use crate::state::AppState;

fn first_page() -> usize {
    1
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "first_page")]
    pub page: usize,
}

/// `GET /api/blog?category=&page=`
pub async fn list_blog(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<BlogPost>>, ApiError> {
    let category = match &query.category {
        Some(raw) => Some(
            BlogCategory::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown category '{raw}'")))?,
        ),
        None => None,
    };

    let page = state.blog.list(&BlogFilter {
        category,
        page: query.page,
    })?;
    Ok(Json(page))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "first_page")]
    pub page: usize,
}

/// `GET /api/blog/search?q=&page=`
pub async fn search_blog(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Page<BlogPost>>, ApiError> {
    Ok(Json(state.blog.search(&query.q, query.page)?))
}

#[derive(Serialize)]
pub struct BlogPostDetail {
    #[serde(flatten)]
    pub post: BlogPost,
    pub reading_time: String,
    pub keyword_list: Vec<String>,
    pub related: Vec<BlogPost>,
    pub popular: Vec<BlogPost>,
}

/// `GET /api/blog/{slug}`
pub async fn blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPostDetail>, ApiError> {
    let post = state.blog.get_by_slug(&slug)?;
    let related = state.blog.related(&post, 3)?;
    let popular = state.blog.popular(3)?;
    Ok(Json(BlogPostDetail {
        reading_time: post.reading_time_text(),
        keyword_list: post.keywords_list().into_iter().map(String::from).collect(),
        post,
        related,
        popular,
    }))
}
