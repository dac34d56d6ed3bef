// ABOUTME: Display image resolution for feeds and episodes.
// ABOUTME: Walks an ordered fallback chain over image shapes and upgrades http:// to https://.

use crate::models::{non_empty, RawFeed, RawFeedItem};

/// Rewrites an `http://` scheme to `https://`. Everything else is unchanged.
pub fn upgrade_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

/// First `media:thumbnail` URL on the item.
fn item_thumbnail(item: &RawFeedItem) -> Option<&str> {
    item.thumbnail.first().and_then(|thumb| thumb.url())
}

/// Item-level iTunes image in any of its shapes.
fn item_itunes_image(item: &RawFeedItem) -> Option<&str> {
    item.itunes.image.as_ref().and_then(|image| image.url())
}

/// Resolves an episode image.
///
/// Priority: item thumbnail, item iTunes image, then `fallback` (normally the
/// feed image). Returns an empty string when nothing resolves.
pub fn pick_image_url(item: &RawFeedItem, fallback: &str) -> String {
    item_thumbnail(item)
        .or_else(|| item_itunes_image(item))
        .or_else(|| non_empty(fallback))
        .map(upgrade_https)
        .unwrap_or_default()
}

/// Resolves the feed-level image: the feed's own image, then the iTunes image.
pub fn pick_feed_image(feed: &RawFeed) -> String {
    feed.image
        .as_ref()
        .and_then(|image| image.url.as_deref())
        .and_then(non_empty)
        .or_else(|| feed.itunes.image.as_ref().and_then(|image| image.url()))
        .map(upgrade_https)
        .unwrap_or_default()
}
