// ABOUTME: YouTube video lookup via the public oEmbed endpoint.
// ABOUTME: Extracts video ids from the common URL forms and maps oEmbed responses into VideoInfo.

use castline_feed::upgrade_https;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

static VIDEO_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

/// Path prefixes on youtube.com that are followed by the video id.
const ID_PATH_PREFIXES: &[&str] = &["embed", "shorts", "live", "v"];

/// Metadata for a single video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub author_url: String,
    pub thumbnail: String,
    pub provider: String,
    /// Canonical watch URL.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("unrecognized YouTube URL: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Upstream(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OEmbedResponse {
    title: Option<String>,
    author_name: Option<String>,
    author_url: Option<String>,
    thumbnail_url: Option<String>,
    provider_name: Option<String>,
}

/// Pulls the 11-character video id out of a YouTube URL or bare id.
///
/// Accepts `youtube.com/watch?v=`, `youtu.be/<id>`, `/embed/<id>`,
/// `/shorts/<id>` and `/live/<id>`, with or without a scheme.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if VIDEO_ID_RE.is_match(input) {
        return Some(input.to_string());
    }

    let url = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{input}")))
        .ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .or_else(|| host.strip_prefix("music."))
        .unwrap_or(&host);

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let candidate = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "youtube-nocookie.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some(prefix) if ID_PATH_PREFIXES.contains(&prefix) => {
                segments.next().map(str::to_string)
            }
            _ => None,
        },
        _ => None,
    }?;

    VIDEO_ID_RE.is_match(&candidate).then_some(candidate)
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Thumbnail used when oEmbed returns none.
pub fn fallback_thumbnail(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg")
}

/// oEmbed client.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl YoutubeClient {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub async fn lookup(&self, url: &str) -> Result<VideoInfo, LookupError> {
        let video_id =
            extract_video_id(url).ok_or_else(|| LookupError::InvalidUrl(url.to_string()))?;
        let watch = watch_url(&video_id);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", watch.as_str()), ("format", "json")])
            .send()
            .await
            .map_err(|e| LookupError::Upstream(format!("oEmbed request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Upstream(format!(
                "oEmbed returned status {}",
                status.as_u16()
            )));
        }

        let body: OEmbedResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Upstream(format!("invalid oEmbed response: {e}")))?;

        Ok(video_info(video_id, watch, body))
    }
}

fn video_info(video_id: String, watch: String, body: OEmbedResponse) -> VideoInfo {
    let thumbnail = body
        .thumbnail_url
        .filter(|url| !url.trim().is_empty())
        .map(|url| upgrade_https(&url))
        .unwrap_or_else(|| fallback_thumbnail(&video_id));

    VideoInfo {
        title: body.title.unwrap_or_default(),
        author: body.author_name.unwrap_or_default(),
        author_url: body.author_url.unwrap_or_default(),
        provider: body.provider_name.unwrap_or_else(|| "YouTube".to_string()),
        thumbnail,
        url: watch,
        video_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_video_id_forms() {
        let id = Some("dQw4w9WgXcQ".to_string());
        for input in [
            "dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ",
        ] {
            assert_eq!(extract_video_id(input), id, "input: {input}");
        }
    }

    #[test]
    fn test_extract_video_id_rejects_others() {
        for input in [
            "",
            "https://vimeo.com/123456",
            "https://www.youtube.com/channel/UC123",
            "https://www.youtube.com/watch?v=short",
            "https://youtu.be/",
            "not a url at all",
        ] {
            assert_eq!(extract_video_id(input), None, "input: {input}");
        }
    }

    #[tokio::test]
    async fn test_lookup_maps_oembed() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/oembed")
                .query_param("url", "https://www.youtube.com/watch?v=dQw4w9WgXcQ")
                .query_param("format", "json");
            then.status(200).json_body(serde_json::json!({
                "title": "Never Gonna Give You Up",
                "author_name": "Rick Astley",
                "author_url": "https://www.youtube.com/@RickAstleyYT",
                "thumbnail_url": "http://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg",
                "provider_name": "YouTube"
            }));
        });

        let client = YoutubeClient::new(reqwest::Client::new(), server.url("/oembed"));
        let info = client.lookup("https://youtu.be/dQw4w9WgXcQ").await.unwrap();
        mock.assert();

        assert_eq!(
            info,
            VideoInfo {
                video_id: "dQw4w9WgXcQ".into(),
                title: "Never Gonna Give You Up".into(),
                author: "Rick Astley".into(),
                author_url: "https://www.youtube.com/@RickAstleyYT".into(),
                thumbnail: "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".into(),
                provider: "YouTube".into(),
                url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_lookup_falls_back_to_default_thumbnail() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/oembed");
            then.status(200).json_body(serde_json::json!({ "title": "Clip" }));
        });

        let client = YoutubeClient::new(reqwest::Client::new(), server.url("/oembed"));
        let info = client.lookup("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(info.thumbnail, fallback_thumbnail("dQw4w9WgXcQ"));
        assert_eq!(info.provider, "YouTube");
    }

    #[tokio::test]
    async fn test_lookup_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/oembed");
            then.status(404).body("Not Found");
        });
        let client = YoutubeClient::new(reqwest::Client::new(), server.url("/oembed"));

        let err = client.lookup("https://vimeo.com/1").await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidUrl(_)));

        let err = client.lookup("dQw4w9WgXcQ").await.unwrap_err();
        assert_eq!(err, LookupError::Upstream("oEmbed returned status 404".into()));
    }
}
