// ABOUTME: Feed Normalizer turning loosely-shaped RawFeed values into NormalizedFeed.
// ABOUTME: Pure and total: missing or misshapen fields degrade to empty values or item exclusion.

use crate::duration::format_duration;
use crate::hash::stable_hash;
use crate::html_utils::{clean_text, strip_html};
use crate::image_utils::{pick_feed_image, pick_image_url};
use crate::media::{infer_kind, pick_media};
use crate::models::{
    non_empty, FeedMeta, NormalizedEpisode, NormalizedFeed, RawFeed, RawFeedItem,
};

/// Default cap on episodes kept per feed.
pub const DEFAULT_MAX_EPISODES: usize = 100;
/// Maximum title length in chars before the ellipsis.
pub const TITLE_MAX_CHARS: usize = 200;
/// Maximum description length in chars before the ellipsis.
pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// Title used when a feed has none.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Items past this position are discarded before normalization.
    pub max_episodes: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_episodes: DEFAULT_MAX_EPISODES,
        }
    }
}

/// Normalizes a raw feed.
///
/// Items are truncated to `opts.max_episodes` first, then each retained item
/// is normalized in source order; items without any media URL are dropped.
/// `index` is the item's position in the retained prefix, so it can skip
/// values where items were dropped.
pub fn normalize(raw: &RawFeed, opts: &NormalizeOptions) -> NormalizedFeed {
    let meta = normalize_meta(raw);

    let episodes = raw
        .items
        .iter()
        .take(opts.max_episodes)
        .enumerate()
        .filter_map(|(index, item)| normalize_item(item, index, &meta.image))
        .collect();

    NormalizedFeed { meta, episodes }
}

fn normalize_meta(raw: &RawFeed) -> FeedMeta {
    let title = raw
        .title
        .as_deref()
        .map(strip_html)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let description = first_present([raw.description.as_deref(), raw.itunes.summary.as_deref()])
        .map(strip_html)
        .unwrap_or_default();

    FeedMeta {
        title,
        description,
        link: raw.link.clone().unwrap_or_default(),
        image: pick_feed_image(raw),
        author: raw
            .itunes
            .author
            .as_deref()
            .map(|author| author.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Normalizes one item, or `None` when it has no resolvable media.
pub fn normalize_item(item: &RawFeedItem, index: usize, feed_image: &str) -> Option<NormalizedEpisode> {
    let media = pick_media(item)?;
    let kind = infer_kind(&media.url, &media.mime_type);

    let id_source = first_present([item.guid.as_deref(), item.link.as_deref()])
        .unwrap_or(media.url.as_str());

    Some(NormalizedEpisode {
        id: stable_hash(id_source),
        index,
        title: clean_text(item.title.as_deref().unwrap_or_default(), TITLE_MAX_CHARS),
        description: clean_text(&pick_description(item), DESCRIPTION_MAX_CHARS),
        image: pick_image_url(item, feed_image),
        pub_date: item.pub_date.clone().unwrap_or_default(),
        duration: format_duration(item.itunes.duration.as_ref()),
        season: item.itunes.season.as_ref().and_then(|n| n.as_u32()),
        episode: item.itunes.episode.as_ref().and_then(|n| n.as_u32()),
        link: item.link.clone().unwrap_or_default(),
        media_url: media.url,
        media_type: media.mime_type,
        kind,
    })
}

/// Description source, first non-empty wins: content snippet, iTunes summary,
/// stripped encoded content, raw content.
fn pick_description(item: &RawFeedItem) -> String {
    let snippet = || item.content_snippet.as_deref().and_then(non_empty).map(str::to_string);
    let summary = || item.itunes.summary.as_deref().and_then(non_empty).map(str::to_string);
    let encoded = || {
        item.content_encoded
            .as_deref()
            .map(strip_html)
            .filter(|text| !text.is_empty())
    };
    let content = || item.content.clone();

    snippet()
        .or_else(summary)
        .or_else(encoded)
        .or_else(content)
        .unwrap_or_default()
}

fn first_present<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates.into_iter().flatten().find_map(non_empty)
}
