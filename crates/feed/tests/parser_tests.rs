// ABOUTME: Integration tests for XML feeds going through parsing and normalization.
// ABOUTME: Covers podcast RSS with iTunes tags, Media RSS video items, and plain article feeds.

use castline_feed::{parse_and_normalize, parse_feed_bytes, MediaKind, NormalizeOptions};
use pretty_assertions::assert_eq;

const PODCAST_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd"
     xmlns:media="http://search.yahoo.com/mrss/"
     xmlns:content="http://purl.org/rss/1.0/modules/content/">
    <channel>
        <title>Tech Podcast</title>
        <link>https://podcast.example.com</link>
        <description>A podcast about &lt;b&gt;technology&lt;/b&gt;</description>
        <itunes:author>Jane Host</itunes:author>
        <itunes:image href="http://podcast.example.com/cover.jpg"/>
        <item>
            <title>Episode 1</title>
            <link>https://podcast.example.com/ep1</link>
            <guid>episode-1</guid>
            <pubDate>Mon, 15 Jan 2024 10:00:00 +0000</pubDate>
            <description>Welcome to the podcast!</description>
            <enclosure url="http://cdn.example.com/show.mp3" type="audio/mpeg" length="12345"/>
            <itunes:duration>3725</itunes:duration>
            <itunes:season>1</itunes:season>
            <itunes:episode>1</itunes:episode>
            <itunes:image href="https://cdn.example.com/episode.jpg"/>
        </item>
        <item>
            <title>Episode 2 (video)</title>
            <guid>episode-2</guid>
            <media:content url="https://cdn.example.com/ep2.mp4" type="video/mp4"/>
            <media:thumbnail url="http://cdn.example.com/ep2-thumb.jpg"/>
            <itunes:duration>12:34</itunes:duration>
            <content:encoded><![CDATA[<p>Full <em>notes</em></p>]]></content:encoded>
        </item>
        <item>
            <title>Announcement without media</title>
        </item>
    </channel>
</rss>"#;

#[test]
fn test_podcast_feed_meta() {
    let feed = parse_and_normalize(PODCAST_RSS.as_bytes(), &NormalizeOptions::default()).unwrap();

    assert_eq!(feed.meta.title, "Tech Podcast");
    assert_eq!(feed.meta.description, "A podcast about technology");
    assert_eq!(feed.meta.author, "Jane Host");
    assert!(feed.meta.link.starts_with("https://podcast.example.com"));
    // feed-rs may expose the iTunes cover as the logo; either way it is upgraded
    assert_eq!(feed.meta.image, "https://podcast.example.com/cover.jpg");
}

#[test]
fn test_podcast_episodes() {
    let feed = parse_and_normalize(PODCAST_RSS.as_bytes(), &NormalizeOptions::default()).unwrap();

    // The third item has no enclosure, media or link and is dropped
    assert_eq!(feed.episodes.len(), 2);

    let first = &feed.episodes[0];
    assert_eq!(first.index, 0);
    assert_eq!(first.title, "Episode 1");
    assert_eq!(first.description, "Welcome to the podcast!");
    assert_eq!(first.media_url, "https://cdn.example.com/show.mp3");
    assert_eq!(first.media_type, "audio/mpeg");
    assert_eq!(first.kind, MediaKind::Audio);
    assert_eq!(first.image, "https://cdn.example.com/episode.jpg");
    assert_eq!(first.duration, "1:02:05");
    assert_eq!(first.season, Some(1));
    assert_eq!(first.episode, Some(1));
    assert_eq!(first.pub_date, "Mon, 15 Jan 2024 10:00:00 +0000");
    assert_eq!(first.id, castline_feed::stable_hash("episode-1"));

    let second = &feed.episodes[1];
    assert_eq!(second.index, 1);
    assert_eq!(second.kind, MediaKind::Video);
    assert_eq!(second.media_url, "https://cdn.example.com/ep2.mp4");
    assert_eq!(second.image, "https://cdn.example.com/ep2-thumb.jpg");
    assert_eq!(second.duration, "12:34");
    assert_eq!(second.description, "Full notes");
}

#[test]
fn test_ids_stable_across_parses() {
    let opts = NormalizeOptions::default();
    let a = parse_and_normalize(PODCAST_RSS.as_bytes(), &opts).unwrap();
    let b = parse_and_normalize(PODCAST_RSS.as_bytes(), &opts).unwrap();
    let ids_a: Vec<&str> = a.episodes.iter().map(|e| e.id.as_str()).collect();
    let ids_b: Vec<&str> = b.episodes.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids_a, ids_b);
}

#[test]
fn test_max_episodes_limit() {
    let feed = parse_and_normalize(PODCAST_RSS.as_bytes(), &NormalizeOptions { max_episodes: 1 }).unwrap();
    assert_eq!(feed.episodes.len(), 1);
    assert_eq!(feed.episodes[0].title, "Episode 1");
}

/// Article feeds have no enclosures, so the item link stands in as media.
#[test]
fn test_article_feed_uses_link_as_media() {
    let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
    <channel>
        <title>Tech Blog</title>
        <link>https://example.com</link>
        <item>
            <title>First Article</title>
            <link>https://example.com/post1</link>
            <description>This is a summary of the first article.</description>
        </item>
    </channel>
</rss>"#;

    let feed = parse_and_normalize(rss.as_bytes(), &NormalizeOptions::default()).unwrap();
    assert_eq!(feed.episodes.len(), 1);
    let episode = &feed.episodes[0];
    assert_eq!(episode.media_url, "https://example.com/post1");
    assert_eq!(episode.media_type, "");
    assert_eq!(episode.kind, MediaKind::Audio);
    assert_eq!(episode.duration, "");
    assert_eq!(episode.id, castline_feed::stable_hash("https://example.com/post1"));
}

#[test]
fn test_raw_feed_keeps_upstream_values() {
    let raw = parse_feed_bytes(PODCAST_RSS.as_bytes()).unwrap();
    assert_eq!(raw.items.len(), 3);
    assert_eq!(raw.items[0].guid.as_deref(), Some("episode-1"));
    assert_eq!(
        raw.items[0].enclosure.as_ref().and_then(|e| e.url.as_deref()),
        Some("http://cdn.example.com/show.mp3")
    );
    assert_eq!(raw.itunes.author.as_deref(), Some("Jane Host"));
}
