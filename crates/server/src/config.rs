// ABOUTME: Server configuration parsed from command-line flags with environment fallbacks.
// ABOUTME: Covers bind address, cache TTL, episode cap, upstream timeout, user agent and oEmbed endpoint.

use std::net::SocketAddr;
use std::time::Duration;

use castline_feed::{NormalizeOptions, DEFAULT_MAX_EPISODES};
use clap::Parser;
use thiserror::Error;

/// Default cache TTL (10 minutes).
pub const DEFAULT_CACHE_TTL_MS: u64 = 10 * 60 * 1000;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_USER_AGENT: &str = "Castline/0.1";
pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "castline-server")]
#[command(about = "Serve normalized podcast feeds and companion APIs over HTTP", long_about = None)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "CASTLINE_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// How long a fetched feed is served from cache, in milliseconds.
    #[arg(long, env = "FEED_CACHE_TTL_MS", default_value_t = DEFAULT_CACHE_TTL_MS)]
    pub cache_ttl_ms: u64,

    /// Maximum episodes kept per feed.
    #[arg(long, env = "FEED_MAX_EPISODES", default_value_t = DEFAULT_MAX_EPISODES)]
    pub max_episodes: usize,

    /// Timeout for upstream requests, in seconds.
    #[arg(long, env = "FEED_FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,

    /// User-Agent header sent upstream.
    #[arg(long, env = "CASTLINE_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// YouTube oEmbed endpoint.
    #[arg(long, env = "YOUTUBE_OEMBED_ENDPOINT", default_value = DEFAULT_OEMBED_ENDPOINT)]
    pub oembed_endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max episodes must be greater than zero")]
    ZeroMaxEpisodes,
    #[error("fetch timeout must be greater than zero")]
    ZeroTimeout,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_episodes == 0 {
            return Err(ConfigError::ZeroMaxEpisodes);
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            max_episodes: self.max_episodes,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            max_episodes: DEFAULT_MAX_EPISODES,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            oembed_endpoint: DEFAULT_OEMBED_ENDPOINT.to_string(),
        }
    }
}
