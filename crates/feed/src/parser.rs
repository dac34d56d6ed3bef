// ABOUTME: Feed parsing implementation using feed-rs plus the raw extension pass.
// ABOUTME: Maps feed-rs types and itunes/media extensions onto the RawFeed input model.

use feed_rs::model::{Entry, FeedType, Link};

use crate::error::FeedError;
use crate::html_utils::strip_html;
use crate::itunes_ext::{parse_extensions, ItemExt};
use crate::models::{
    DurationValue, ImageShape, MediaAttrs, MediaShape, Numberish, RawFeed, RawFeedImage,
    RawFeedItem, RawFeedItunes, RawItemItunes,
};

/// Parses feed bytes (RSS, Atom or JSON Feed) into a [`RawFeed`].
///
/// The result keeps upstream values as-is; cleaning and fallbacks happen in
/// [`crate::normalize`].
pub fn parse_feed_bytes(data: &[u8]) -> Result<RawFeed, FeedError> {
    let parsed = feed_rs::parser::parse(data).map_err(FeedError::parse)?;

    // feed-rs hides most podcast extensions, so read them from the raw XML
    let mut ext = parse_extensions(data);
    let is_atom = matches!(parsed.feed_type, FeedType::Atom);

    let items = parsed
        .entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let item_ext = ext.items.get_mut(idx).map(std::mem::take).unwrap_or_default();
            map_entry(entry, item_ext, is_atom)
        })
        .collect();

    let image = parsed
        .logo
        .as_ref()
        .or(parsed.icon.as_ref())
        .map(|image| RawFeedImage {
            url: Some(image.uri.clone()),
        });

    let author = ext
        .channel
        .author
        .or_else(|| parsed.authors.first().map(|person| person.name.clone()));

    Ok(RawFeed {
        title: parsed.title.map(|t| t.content),
        description: parsed.description.map(|d| d.content),
        link: extract_home_url(&parsed.links),
        image,
        itunes: RawFeedItunes {
            image: ext.channel.image_href.map(|href| ImageShape::Href { href }),
            author,
            summary: ext.channel.summary,
        },
        items,
    })
}

fn is_enclosure_link(link: &Link) -> bool {
    link.rel.as_deref() == Some("enclosure")
}

/// Prefers the rel="alternate" link, otherwise the first link.
fn extract_home_url(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|link| link.rel.as_deref() == Some("alternate"))
        .or_else(|| links.first())
        .map(|link| link.href.clone())
}

/// Prefers the rel="alternate" link, otherwise the first non-enclosure link.
/// Unlike feed-rs ids, never falls back to a synthesized value.
fn extract_item_url(entry: &Entry) -> Option<String> {
    entry
        .links
        .iter()
        .find(|link| link.rel.as_deref() == Some("alternate"))
        .or_else(|| entry.links.iter().find(|link| !is_enclosure_link(link)))
        .map(|link| link.href.clone())
}

/// Enclosure expressed as an Atom `link rel="enclosure"`.
fn enclosure_link(entry: &Entry) -> Option<MediaAttrs> {
    entry
        .links
        .iter()
        .find(|link| is_enclosure_link(link))
        .map(|link| MediaAttrs {
            url: Some(link.href.clone()),
            mime_type: link.media_type.clone(),
        })
}

/// media:content entries as seen by feed-rs.
fn media_contents(entry: &Entry) -> Vec<MediaAttrs> {
    entry
        .media
        .iter()
        .flat_map(|media| &media.content)
        .filter_map(|content| {
            let url = content.url.as_ref()?;
            Some(MediaAttrs {
                url: Some(url.to_string()),
                mime_type: content.content_type.as_ref().map(|mime| mime.to_string()),
            })
        })
        .collect()
}

fn first_thumbnail(entry: &Entry) -> Option<String> {
    entry
        .media
        .iter()
        .find_map(|media| media.thumbnails.first())
        .map(|thumb| thumb.image.uri.clone())
}

/// Maps a feed-rs Entry plus its raw extensions to a [`RawFeedItem`].
fn map_entry(entry: &Entry, ext: ItemExt, is_atom: bool) -> RawFeedItem {
    let summary_html = entry.summary.as_ref().map(|t| t.content.clone());

    // Atom ids are mandatory and meaningful; RSS ids may be synthesized by feed-rs
    let guid = ext
        .guid
        .or_else(|| (is_atom && !entry.id.is_empty()).then(|| entry.id.clone()));

    let pub_date = ext.pub_date.or_else(|| {
        entry
            .published
            .or(entry.updated)
            .map(|dt| dt.to_rfc2822())
    });

    let media = if ext.media.is_empty() {
        media_contents(entry)
    } else {
        ext.media
    };

    let thumbnail = ext
        .thumbnail_url
        .or_else(|| first_thumbnail(entry))
        .map(|url| {
            MediaShape::Flat(MediaAttrs {
                url: Some(url),
                mime_type: None,
            })
        })
        .into_iter()
        .collect();

    RawFeedItem {
        title: entry.title.as_ref().map(|t| t.content.clone()),
        link: extract_item_url(entry),
        guid,
        pub_date,
        enclosure: ext.enclosure.or_else(|| enclosure_link(entry)),
        media: media.into_iter().map(MediaShape::Flat).collect(),
        thumbnail,
        itunes: RawItemItunes {
            image: ext.image_href.map(|href| ImageShape::Href { href }),
            duration: ext.duration.map(DurationValue::Text),
            summary: ext.summary,
            season: ext.season.map(Numberish::Text),
            episode: ext.episode.map(Numberish::Text),
            author: ext.author,
        },
        content_snippet: summary_html
            .as_deref()
            .map(strip_html)
            .filter(|snippet| !snippet.is_empty()),
        content_encoded: entry.content.as_ref().and_then(|c| c.body.clone()),
        content: summary_html,
    }
}
