// ABOUTME: Core feed library for castline.
// ABOUTME: Parses RSS/Atom into RawFeed and normalizes it into the stable NormalizedFeed JSON shape.

pub mod duration;
pub mod error;
pub mod hash;
pub mod html_utils;
pub mod image_utils;
pub mod itunes_ext;
pub mod media;
pub mod models;
pub mod normalize;
pub mod parser;

pub use duration::{format_duration, format_duration_text, format_seconds};
pub use error::FeedError;
pub use hash::stable_hash;
pub use html_utils::{clean_text, decode_entities, strip_html, truncate_text};
pub use image_utils::{pick_feed_image, pick_image_url, upgrade_https};
pub use media::{infer_kind, pick_media, MediaRef};
pub use models::{
    DurationValue, FeedMeta, ImageShape, MediaAttrs, MediaKind, MediaShape, NormalizedEpisode,
    NormalizedFeed, Numberish, RawFeed, RawFeedImage, RawFeedItem, RawFeedItunes, RawItemItunes,
};
pub use normalize::{
    normalize, normalize_item, NormalizeOptions, DEFAULT_MAX_EPISODES, DESCRIPTION_MAX_CHARS,
    TITLE_MAX_CHARS, UNTITLED,
};
pub use parser::parse_feed_bytes;

/// Parses feed bytes and normalizes them in one step.
pub fn parse_and_normalize(data: &[u8], opts: &NormalizeOptions) -> Result<NormalizedFeed, FeedError> {
    let raw = parse_feed_bytes(data)?;
    Ok(normalize(&raw, opts))
}
