// ABOUTME: Media URL selection and audio/video classification for feed items.
// ABOUTME: Picks enclosure, then alternate media, then the item link; infers kind from MIME or URL.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::image_utils::upgrade_https;
use crate::models::{non_empty, MediaKind, RawFeedItem};

/// Video container extensions at the end of the path, query string tolerated.
static VIDEO_EXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(mp4|m4v|mov|webm|mkv|avi)(\?.*)?$").unwrap());

/// HLS manifest marker.
static HLS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.m3u8").unwrap());

/// A resolved media reference. `url` is already HTTPS-normalized; `mime_type`
/// is empty when the source gave none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub url: String,
    pub mime_type: String,
}

/// Resolves the item's playable media.
///
/// Priority: primary enclosure, first alternate media representation, then
/// the item link (with empty type). `None` means the item has no media and
/// must be dropped.
pub fn pick_media(item: &RawFeedItem) -> Option<MediaRef> {
    let from_enclosure = || {
        let enclosure = item.enclosure.as_ref()?;
        let url = enclosure.url.as_deref().and_then(non_empty)?;
        Some((url, enclosure.mime_type.as_deref()))
    };
    let from_media = || {
        let media = item.media.first()?;
        Some((media.url()?, media.mime_type()))
    };
    let from_link = || Some((item.link.as_deref().and_then(non_empty)?, None));

    let (url, mime_type) = from_enclosure().or_else(from_media).or_else(from_link)?;
    Some(MediaRef {
        url: upgrade_https(url.trim()),
        mime_type: mime_type.unwrap_or_default().to_string(),
    })
}

/// Classifies media as video or audio. Defaults to audio.
pub fn infer_kind(url: &str, mime_type: &str) -> MediaKind {
    let is_video = mime_type.trim().to_ascii_lowercase().starts_with("video/")
        || HLS_RE.is_match(url)
        || VIDEO_EXT_RE.is_match(url);

    if is_video {
        MediaKind::Video
    } else {
        MediaKind::Audio
    }
}
