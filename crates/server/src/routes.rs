// ABOUTME: Axum router and handlers for the castline HTTP API.
// ABOUTME: Serves cached normalized feeds, YouTube lookups, transcription jobs and book downloads.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use castline_feed::NormalizedFeed;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::book::{render_book, BookRequest};
use crate::cache::FeedCache;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::ApiError;
use crate::fetch::{build_client, HttpFeedSource};
use crate::jobs::{Job, JobStore, JobUpdate};
use crate::youtube::{VideoInfo, YoutubeClient};

const MISSING_URL: &str = "Missing url parameter";

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub feeds: Arc<FeedCache>,
    pub youtube: Arc<YoutubeClient>,
    pub jobs: Arc<JobStore>,
}

impl AppState {
    /// Production wiring: one upstream client shared by the feed source and
    /// the oEmbed client, real clock.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_client(config.fetch_timeout(), &config.user_agent)?;
        let feeds = FeedCache::new(
            Arc::new(HttpFeedSource::new(client.clone())),
            Arc::new(SystemClock),
            config.cache_ttl(),
            config.normalize_options(),
        );

        Ok(Self {
            feeds: Arc::new(feeds),
            youtube: Arc::new(YoutubeClient::new(client, config.oembed_endpoint.clone())),
            jobs: Arc::new(JobStore::new()),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/feed", get(feed))
        .route("/api/youtube", get(youtube))
        .route("/api/jobs", post(create_job).get(list_jobs))
        .route("/api/jobs/{id}", get(get_job).patch(update_job))
        .route("/api/book", post(book))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

#[derive(Debug, Default, Deserialize)]
struct UrlQuery {
    url: Option<String>,
}

impl UrlQuery {
    /// The parameter exactly as sent; only an absent or empty value is rejected.
    fn required(&self) -> Result<&str, ApiError> {
        self.url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::bad_request(MISSING_URL))
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "cachedFeeds": state.feeds.len() }))
}

async fn feed(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<Arc<NormalizedFeed>>, ApiError> {
    let url = query.required()?;
    let feed = state.feeds.get_feed(url).await?;
    Ok(Json(feed))
}

async fn youtube(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<VideoInfo>, ApiError> {
    let url = query.required()?;
    let info = state.youtube.lookup(url).await?;
    Ok(Json(info))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CreateJobRequest {
    media_url: String,
    title: Option<String>,
}

async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let media_url = request.media_url.trim();
    if media_url.is_empty() {
        return Err(ApiError::bad_request("Missing mediaUrl"));
    }

    let job = state
        .jobs
        .create(media_url, request.title.unwrap_or_default());
    info!(job_id = %job.id, media_url = %job.media_url, "transcription job queued");
    Ok((StatusCode::CREATED, Json(job)))
}

async fn list_jobs(State(state): State<AppState>) -> Json<Vec<Job>> {
    Json(state.jobs.list())
}

/// Unknown and malformed ids are both reported as missing.
fn job_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Job not found"))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let job = state
        .jobs
        .get(job_id(&id)?)
        .ok_or_else(|| ApiError::not_found("Job not found"))?;
    Ok(Json(job))
}

async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<JobUpdate>,
) -> Result<Json<Job>, ApiError> {
    let job = state
        .jobs
        .update(job_id(&id)?, update)
        .ok_or_else(|| ApiError::not_found("Job not found"))?;
    Ok(Json(job))
}

async fn book(Json(request): Json<BookRequest>) -> Result<Response, ApiError> {
    let rendered = render_book(&request)?;
    let disposition = format!("attachment; filename=\"{}\"", rendered.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, rendered.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.body,
    )
        .into_response())
}
