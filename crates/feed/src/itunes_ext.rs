// ABOUTME: Raw XML pass for podcast extensions that feed-rs does not expose.
// ABOUTME: Extracts itunes:*, media:* and enclosure attributes plus raw guid/pubDate per item.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::html_utils::decode_entities;
use crate::models::MediaAttrs;

/// Channel-level extension values.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChannelExt {
    /// itunes:image href attribute.
    pub image_href: Option<String>,
    /// itunes:author text.
    pub author: Option<String>,
    /// itunes:summary text.
    pub summary: Option<String>,
}

/// Item-level extension values, all kept as the raw strings found in the XML.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ItemExt {
    /// `<guid>` as written; feed-rs synthesizes one when absent, this does not.
    pub guid: Option<String>,
    /// `<pubDate>` as written.
    pub pub_date: Option<String>,
    /// First `<enclosure>` url/type.
    pub enclosure: Option<MediaAttrs>,
    /// Every `<media:content>` in document order.
    pub media: Vec<MediaAttrs>,
    /// First `<media:thumbnail>` url.
    pub thumbnail_url: Option<String>,
    pub image_href: Option<String>,
    pub duration: Option<String>,
    pub season: Option<String>,
    pub episode: Option<String>,
    pub summary: Option<String>,
    pub author: Option<String>,
}

/// Extensions for a whole document. `items` follows document order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedExtensions {
    pub channel: ChannelExt,
    pub items: Vec<ItemExt>,
}

/// Elements whose text content we keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Guid,
    PubDate,
    Author,
    Duration,
    Season,
    Episode,
    Summary,
}

impl TextField {
    fn from_name(name: &str, in_item: bool) -> Option<Self> {
        let field = match name {
            "guid" if in_item => TextField::Guid,
            "pubDate" if in_item => TextField::PubDate,
            "itunes:duration" if in_item => TextField::Duration,
            "itunes:season" if in_item => TextField::Season,
            "itunes:episode" if in_item => TextField::Episode,
            "itunes:author" => TextField::Author,
            "itunes:summary" => TextField::Summary,
            _ => return None,
        };
        Some(field)
    }
}

fn is_item_tag(name: &str) -> bool {
    matches!(name, "item" | "entry")
}

/// Parses extension values from raw RSS/Atom bytes.
///
/// Never fails: malformed XML simply ends the scan early with whatever was
/// collected so far. The feed-rs pass is what reports parse errors.
pub fn parse_extensions(data: &[u8]) -> ParsedExtensions {
    let mut result = ParsedExtensions::default();
    let mut reader = Reader::from_reader(data);
    let mut buf = Vec::new();

    let mut in_item = false;
    let mut item = ItemExt::default();
    let mut capture: Option<(TextField, String)> = None;
    // Elements opened inside the current capture and not yet closed.
    let mut nested = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = qualified_name(&e);
                if capture.is_some() {
                    nested += 1;
                } else if is_item_tag(&name) {
                    in_item = true;
                    item = ItemExt::default();
                } else if let Some(field) = TextField::from_name(&name, in_item) {
                    capture = Some((field, String::new()));
                    nested = 0;
                } else {
                    apply_attributes(&name, &e, in_item, &mut item, &mut result.channel);
                }
            }
            Ok(Event::Empty(e)) => {
                let name = qualified_name(&e);
                apply_attributes(&name, &e, in_item, &mut item, &mut result.channel);
            }
            Ok(Event::Text(e)) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(&e.decode().unwrap_or_default());
                }
            }
            Ok(Event::CData(e)) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if let Some((_, text)) = capture.as_mut() {
                    let entity = format!("&{};", String::from_utf8_lossy(&e));
                    text.push_str(&decode_entities(&entity));
                }
            }
            Ok(Event::End(e)) => {
                if capture.is_some() && nested > 0 {
                    nested -= 1;
                } else if let Some((field, text)) = capture.take() {
                    commit(field, &text, in_item, &mut item, &mut result.channel);
                } else if in_item && is_item_tag(&String::from_utf8_lossy(e.name().as_ref())) {
                    result.items.push(std::mem::take(&mut item));
                    in_item = false;
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    result
}

fn qualified_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Handles attribute-bearing elements (enclosures, media, images).
fn apply_attributes(
    name: &str,
    e: &BytesStart,
    in_item: bool,
    item: &mut ItemExt,
    channel: &mut ChannelExt,
) {
    match name {
        "enclosure" if in_item && item.enclosure.is_none() => {
            item.enclosure = Some(media_attrs(e));
        }
        "media:content" if in_item => item.media.push(media_attrs(e)),
        "media:thumbnail" if in_item && item.thumbnail_url.is_none() => {
            item.thumbnail_url = attribute(e, "url");
        }
        "itunes:image" => {
            let href = attribute(e, "href");
            if in_item {
                item.image_href = href.or(item.image_href.take());
            } else {
                channel.image_href = href.or(channel.image_href.take());
            }
        }
        _ => {}
    }
}

fn commit(field: TextField, text: &str, in_item: bool, item: &mut ItemExt, channel: &mut ChannelExt) {
    let value = text.trim();
    if value.is_empty() {
        return;
    }
    let value = Some(value.to_string());

    match (field, in_item) {
        (TextField::Guid, true) => item.guid = value,
        (TextField::PubDate, true) => item.pub_date = value,
        (TextField::Duration, true) => item.duration = value,
        (TextField::Season, true) => item.season = value,
        (TextField::Episode, true) => item.episode = value,
        (TextField::Author, true) => item.author = value,
        (TextField::Author, false) => channel.author = value,
        (TextField::Summary, true) => item.summary = value,
        (TextField::Summary, false) => channel.summary = value,
        _ => {}
    }
}

fn media_attrs(e: &BytesStart) -> MediaAttrs {
    MediaAttrs {
        url: attribute(e, "url"),
        mime_type: attribute(e, "type"),
    }
}

/// Gets a non-empty, entity-decoded attribute value.
fn attribute(e: &BytesStart, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name.as_bytes())
        .map(|attr| decode_entities(&String::from_utf8_lossy(&attr.value)))
        .filter(|value| !value.trim().is_empty())
}
