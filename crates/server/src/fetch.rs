// ABOUTME: Upstream feed retrieval behind the FeedSource trait.
// ABOUTME: HttpFeedSource fetches over reqwest with a timeout and size cap, then parses with castline-feed.

use std::time::Duration;

use async_trait::async_trait;
use castline_feed::{parse_feed_bytes, FeedError, RawFeed};
use url::Url;

/// Maximum accepted feed body (10 MiB).
pub const MAX_FEED_BYTES: usize = 10 * 1024 * 1024;

/// Something that can turn a feed URL into a parsed [`RawFeed`].
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawFeed, FeedError>;
}

/// Fetches feeds over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
}

/// Builds the shared upstream client with a fixed timeout and user agent.
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

impl HttpFeedSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<RawFeed, FeedError> {
        let parsed =
            Url::parse(url).map_err(|e| FeedError::invalid(format!("invalid URL {url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FeedError::invalid(format!(
                "unsupported scheme {}: only http and https feeds can be fetched",
                parsed.scheme()
            )));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FeedError::fetch(describe_request_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::fetch(format!("Status code {}", status.as_u16())));
        }

        if let Some(len) = response.content_length() {
            if len > MAX_FEED_BYTES as u64 {
                return Err(FeedError::fetch("feed too large"));
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::fetch(format!("failed to read body: {e}")))?;
        if body.len() > MAX_FEED_BYTES {
            return Err(FeedError::fetch("feed too large"));
        }

        parse_feed_bytes(&body)
    }
}

fn describe_request_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        format!("request failed: {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Mock Show</title>
<item><title>Ep</title><enclosure url="https://cdn.example.com/ep.mp3" type="audio/mpeg"/></item>
</channel></rss>"#;

    fn source_with_timeout(timeout: Duration) -> HttpFeedSource {
        HttpFeedSource::new(build_client(timeout, "test-agent").unwrap())
    }

    fn source() -> HttpFeedSource {
        source_with_timeout(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/feed.xml").header("user-agent", "test-agent");
            then.status(200)
                .header("content-type", "application/rss+xml")
                .body(RSS);
        });

        let feed = source().fetch(&server.url("/feed.xml")).await.unwrap();
        mock.assert();
        assert_eq!(feed.title.as_deref(), Some("Mock Show"));
        assert_eq!(feed.items.len(), 1);
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("nope");
        });

        let err = source().fetch(&server.url("/missing")).await.unwrap_err();
        assert_eq!(err, FeedError::Fetch("Status code 404".into()));
    }

    #[tokio::test]
    async fn test_garbage_body_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/garbage");
            then.status(200).body("<html><body>not a feed</body></html>");
        });

        let err = source().fetch(&server.url("/garbage")).await.unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[tokio::test]
    async fn test_rejects_non_http_urls() {
        let err = source().fetch("ftp://example.com/feed.xml").await.unwrap_err();
        assert!(matches!(err, FeedError::Invalid(_)));

        let err = source().fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FeedError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_fetch_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).body(RSS).delay(Duration::from_millis(500));
        });

        let source = source_with_timeout(Duration::from_millis(50));
        let err = source.fetch(&server.url("/slow")).await.unwrap_err();
        assert!(err.is_fetch());
        assert!(err.to_string().contains("timed out"));
    }
}
