// ABOUTME: Raw (upstream) and normalized feed models.
// ABOUTME: Raw shapes are closed serde enums; normalized shapes are the stable JSON output.

use serde::{Deserialize, Deserializer, Serialize};

// ----------------------------------------------------------------------------
// Raw input
// ----------------------------------------------------------------------------

/// An iTunes-style image as emitted by the various upstream parsers.
///
/// Variant order matters for untagged deserialization: an object carrying
/// `href` wins over one carrying `url`, and anything unrecognized lands in
/// `Other` so a misshapen image never fails the whole feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageShape {
    Bare(String),
    Href {
        href: String,
    },
    Url {
        url: String,
    },
    Attributes {
        #[serde(rename = "$")]
        attrs: ImageAttrs,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageAttrs {
    pub href: Option<String>,
}

impl ImageShape {
    /// Returns the URL carried by this shape, if any and non-empty.
    pub fn url(&self) -> Option<&str> {
        let url = match self {
            ImageShape::Bare(s) => s.as_str(),
            ImageShape::Href { href } => href.as_str(),
            ImageShape::Url { url } => url.as_str(),
            ImageShape::Attributes { attrs } => attrs.href.as_deref()?,
            ImageShape::Other(_) => return None,
        };
        non_empty(url)
    }
}

/// `url` + `type` attributes shared by enclosures, media:content and media:thumbnail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaAttrs {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
}

/// A media element either flattened (`{url, type}`) or wrapped in an
/// attribute bag (`{"$": {url, type}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaShape {
    Attributes {
        #[serde(rename = "$")]
        attrs: MediaAttrs,
    },
    Flat(MediaAttrs),
}

impl MediaShape {
    pub fn attrs(&self) -> &MediaAttrs {
        match self {
            MediaShape::Attributes { attrs } | MediaShape::Flat(attrs) => attrs,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.attrs().url.as_deref().and_then(non_empty)
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.attrs().mime_type.as_deref()
    }
}

/// Duration as either a seconds count or a free-form string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Fractional(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Season/episode numbers arrive as JSON numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numberish {
    Number(u64),
    Text(String),
    Other(serde_json::Value),
}

impl Numberish {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Numberish::Number(n) => u32::try_from(*n).ok(),
            Numberish::Text(s) => s.trim().parse().ok(),
            Numberish::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItemItunes {
    pub image: Option<ImageShape>,
    pub duration: Option<DurationValue>,
    pub summary: Option<String>,
    pub season: Option<Numberish>,
    pub episode: Option<Numberish>,
    pub author: Option<String>,
}

/// A single upstream item. Nothing is guaranteed present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub guid: Option<String>,
    pub pub_date: Option<String>,
    pub enclosure: Option<MediaAttrs>,
    #[serde(deserialize_with = "one_or_many")]
    pub media: Vec<MediaShape>,
    #[serde(deserialize_with = "one_or_many")]
    pub thumbnail: Vec<MediaShape>,
    pub itunes: RawItemItunes,
    pub content_snippet: Option<String>,
    pub content_encoded: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFeedImage {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFeedItunes {
    pub image: Option<ImageShape>,
    pub author: Option<String>,
    pub summary: Option<String>,
}

/// A parsed-but-not-normalized feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFeed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image: Option<RawFeedImage>,
    pub itunes: RawFeedItunes,
    pub items: Vec<RawFeedItem>,
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

/// Returns the input when it has non-whitespace content.
pub(crate) fn non_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

// ----------------------------------------------------------------------------
// Normalized output
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedMeta {
    pub title: String,
    pub description: String,
    pub link: String,
    pub image: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEpisode {
    pub id: String,
    pub index: usize,
    pub title: String,
    pub description: String,
    pub media_url: String,
    pub media_type: String,
    pub kind: MediaKind,
    pub image: String,
    pub pub_date: String,
    pub duration: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFeed {
    pub meta: FeedMeta,
    pub episodes: Vec<NormalizedEpisode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn image_shapes_deserialize_to_expected_variants() {
        let shapes: Vec<ImageShape> = serde_json::from_value(json!([
            "https://a/bare.jpg",
            {"href": "https://a/href.jpg"},
            {"url": "https://a/url.jpg"},
            {"$": {"href": "https://a/attr.jpg"}},
            {"unexpected": true}
        ]))
        .unwrap();

        let urls: Vec<Option<&str>> = shapes.iter().map(ImageShape::url).collect();
        assert_eq!(
            urls,
            vec![
                Some("https://a/bare.jpg"),
                Some("https://a/href.jpg"),
                Some("https://a/url.jpg"),
                Some("https://a/attr.jpg"),
                None,
            ]
        );
    }

    #[test]
    fn media_accepts_single_object_or_array() {
        let single: RawFeedItem = serde_json::from_value(json!({
            "media": {"$": {"url": "https://a/v.mp4", "type": "video/mp4"}}
        }))
        .unwrap();
        assert_eq!(single.media.len(), 1);
        assert_eq!(single.media[0].url(), Some("https://a/v.mp4"));
        assert_eq!(single.media[0].mime_type(), Some("video/mp4"));

        let many: RawFeedItem = serde_json::from_value(json!({
            "media": [{"url": "https://a/1.mp3"}, {"url": "https://a/2.mp3"}]
        }))
        .unwrap();
        assert_eq!(many.media.len(), 2);
        assert_eq!(many.media[1].url(), Some("https://a/2.mp3"));
    }

    #[test]
    fn numberish_accepts_numbers_and_strings() {
        assert_eq!(Numberish::Number(3).as_u32(), Some(3));
        assert_eq!(Numberish::Text(" 12 ".into()).as_u32(), Some(12));
        assert_eq!(Numberish::Text("pilot".into()).as_u32(), None);
    }

    #[test]
    fn episode_serializes_camel_case() {
        let episode = NormalizedEpisode {
            id: "abc".into(),
            index: 0,
            title: "t".into(),
            description: String::new(),
            media_url: "https://a/a.mp3".into(),
            media_type: "audio/mpeg".into(),
            kind: MediaKind::Audio,
            image: String::new(),
            pub_date: String::new(),
            duration: "1:00".into(),
            season: None,
            episode: Some(2),
            link: String::new(),
        };
        let value = serde_json::to_value(&episode).unwrap();
        assert_eq!(value["mediaUrl"], "https://a/a.mp3");
        assert_eq!(value["mediaType"], "audio/mpeg");
        assert_eq!(value["kind"], "audio");
        assert_eq!(value["pubDate"], "");
        assert_eq!(value["episode"], 2);
    }
}
