//! HTTP shell around the fetch-then-extract pipeline.
//!
//! Every request re-fetches the homepage and re-extracts from scratch; nothing
//! is cached between calls.

use axum::{
    Json, Router,
    extract::State,
    handler::Handler,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use storyline_common::{Result, Story};
use storyline_web::{StoryExtractor, StoryFetcher};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

/// Shared handles for every request.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn StoryFetcher>,
    pub extractor: Arc<StoryExtractor>,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn StoryFetcher>, extractor: StoryExtractor) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
        }
    }
}

/// Body of `GET /debug`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    /// Document length in UTF-16 code units.
    pub html_length: usize,
    pub stories_found: usize,
    pub stories: Vec<Story>,
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get_only(index))
        .route("/getTimeStories", get_only(get_time_stories))
        .route("/debug", get_only(debug))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// GET only. An explicit HEAD route keeps axum from running the GET handler
/// for HEAD.
fn get_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler).head(not_found).fallback(not_found)
}

/// One fetch followed by one extraction.
pub async fn fetch_stories(state: &AppState) -> Result<(String, Vec<Story>)> {
    let html = state.fetcher.fetch_document().await?;
    let stories = state.extractor.extract_latest_stories(&html);
    Ok((html, stories))
}

fn pretty_json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_string_pretty(body) {
        Ok(text) => (status, [(header::CONTENT_TYPE, "application/json")], text).into_response(),
        Err(err) => {
            error!(error = %err, "response.serialize_failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to serialize response" })),
            )
                .into_response()
        }
    }
}

fn failure(err: storyline_common::StorylineError) -> Response {
    if err.is_fetch_failure() {
        warn!(error = %err, "request.fetch_failed");
    } else {
        error!(error = %err, "request.failed");
    }
    pretty_json(
        StatusCode::INTERNAL_SERVER_ERROR,
        &json!({
            "error": "Failed to fetch stories",
            "message": err.to_string(),
        }),
    )
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Storyline stories API",
        "endpoints": {
            "GET /getTimeStories": "Get latest 6 stories from the homepage",
            "GET /debug": "Debug extraction process",
        }
    }))
}

async fn get_time_stories(State(state): State<AppState>) -> Response {
    match fetch_stories(&state).await {
        Ok((_, stories)) => {
            info!(stories = stories.len(), "stories.served");
            pretty_json(StatusCode::OK, &stories)
        }
        Err(err) => failure(err),
    }
}

async fn debug(State(state): State<AppState>) -> Response {
    match fetch_stories(&state).await {
        Ok((html, stories)) => pretty_json(
            StatusCode::OK,
            &DebugReport {
                html_length: html.encode_utf16().count(),
                stories_found: stories.len(),
                stories,
            },
        ),
        Err(err) => failure(err),
    }
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
}
