mod content;
mod newsletter;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::content::accessor::ContentAccessor;
use crate::newsletter::mailchimp::MailchimpClient;

#[derive(Clone)]
pub struct AppState {
    content: Arc<ContentAccessor>,
    mailchimp: Arc<MailchimpClient>,
}

impl AppState {
    pub fn new(content: ContentAccessor, mailchimp: MailchimpClient) -> Self {
        Self {
            content: Arc::new(content),
            mailchimp: Arc::new(mailchimp),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct Liveness {
    status: &'static str,
    content_loaded: bool,
}

async fn live(State(state): State<AppState>) -> Json<Liveness> {
    Json(Liveness {
        status: "live",
        content_loaded: state.content.is_loaded(),
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health/live", get(live))
        .route("/api/site", get(content::site))
        .route("/api/pages", get(content::pages))
        .route("/api/posts", get(content::posts))
        .route("/api/posts/{slug}", get(content::post))
        .route("/api/newsletter", post(newsletter::subscribe))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::MailchimpSettings;
    use crate::content::store;
    use crate::export::parse_document;

    /// State backed by the fixture export, written to `dir`.
    pub fn fixture_state(dir: &Path, mailchimp: MailchimpSettings) -> AppState {
        let xml = std::fs::read_to_string("tests/fixtures/export.xml").unwrap();
        let written = store::write_store(&parse_document(&xml).unwrap(), dir).unwrap();
        AppState::new(
            ContentAccessor::new(dir.join("primary.json"), written),
            MailchimpClient::new(mailchimp).unwrap(),
        )
    }

    pub async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }
}
