// ABOUTME: HTTP service for castline: a TTL feed cache over castline-feed plus companion APIs.
// ABOUTME: Exposes the router, its state and the pieces it is wired from so tests can swap them.

pub mod book;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod fetch;
pub mod jobs;
pub mod routes;
pub mod youtube;

pub use book::{render_book, BookError, BookFormat, BookRequest, Chapter, RenderedBook};
pub use cache::FeedCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use fetch::{build_client, FeedSource, HttpFeedSource, MAX_FEED_BYTES};
pub use jobs::{Job, JobStatus, JobStore, JobUpdate};
pub use routes::{router, AppState};
pub use youtube::{extract_video_id, LookupError, VideoInfo, YoutubeClient};
