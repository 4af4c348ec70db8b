use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use super::{AppState, ErrorBody};
use crate::content::dates::display_date;
use crate::content::store::StoreError;
use crate::content::{ContentEntry, SiteInfo};
use crate::render::sanitize_body;

/// Blog index row.
#[derive(Debug, Serialize)]
pub(crate) struct PostSummary<'a> {
    id: &'a str,
    title: &'a str,
    slug: &'a str,
    date: &'a str,
    display_date: Option<String>,
    excerpt: &'a str,
}

impl<'a> From<&'a ContentEntry> for PostSummary<'a> {
    fn from(p: &'a ContentEntry) -> Self {
        let title = [p.title.as_str(), p.slug.as_str(), p.id.as_str()]
            .into_iter()
            .find(|t| !t.is_empty())
            .unwrap_or_default();
        Self {
            id: &p.id,
            title,
            slug: p.route_slug(),
            date: &p.date,
            display_date: display_date(&p.date),
            excerpt: &p.excerpt,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PostDetail<'a> {
    #[serde(flatten)]
    entry: &'a ContentEntry,
    display_date: Option<String>,
    content_html: String,
}

fn unavailable(err: StoreError) -> Response {
    error!(error = %err, "content store unavailable");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// GET /api/site
pub(crate) async fn site(State(state): State<AppState>) -> Response {
    match state.content.site() {
        Ok(site) => Json::<&SiteInfo>(site).into_response(),
        Err(e) => unavailable(e),
    }
}

/// GET /api/pages
pub(crate) async fn pages(State(state): State<AppState>) -> Response {
    match state.content.pages() {
        Ok(pages) => Json(pages).into_response(),
        Err(e) => unavailable(e),
    }
}

/// GET /api/posts
pub(crate) async fn posts(State(state): State<AppState>) -> Response {
    match state.content.posts() {
        Ok(posts) => {
            let rows: Vec<PostSummary> = posts.into_iter().map(PostSummary::from).collect();
            Json(rows).into_response()
        }
        Err(e) => unavailable(e),
    }
}

/// GET /api/posts/{slug}
pub(crate) async fn post(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.content.find_post_by_route(&slug) {
        Ok(Some(entry)) => Json(PostDetail {
            entry,
            display_date: display_date(&entry.date),
            content_html: sanitize_body(&entry.content),
        })
        .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "post not found".into(),
            }),
        )
            .into_response(),
        Err(e) => unavailable(e),
    }
}
