// ABOUTME: TTL cache of normalized feeds keyed by the hash of the feed URL.
// ABOUTME: Misses fetch through a FeedSource and normalize; expiry is checked lazily against an injected Clock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use castline_feed::{normalize, stable_hash, FeedError, NormalizeOptions, NormalizedFeed};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::fetch::FeedSource;

#[derive(Debug, Clone)]
struct CacheEntry {
    feed: Arc<NormalizedFeed>,
    captured_at: Instant,
}

/// Process-wide feed cache.
///
/// Entries are immutable and replaced wholesale on the next miss after they
/// expire. The lock is never held across the upstream fetch, so concurrent
/// misses for one URL each fetch and the last write wins.
pub struct FeedCache {
    source: Arc<dyn FeedSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    options: NormalizeOptions,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl FeedCache {
    pub fn new(
        source: Arc<dyn FeedSource>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        options: NormalizeOptions,
    ) -> Self {
        Self {
            source,
            clock,
            ttl,
            options,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the normalized feed for `url`, fetching it when absent or stale.
    ///
    /// Any fetch or parse failure comes back as [`FeedError::Fetch`] carrying
    /// the upstream message. Failures are not cached.
    pub async fn get_feed(&self, url: &str) -> Result<Arc<NormalizedFeed>, FeedError> {
        let key = stable_hash(url);

        if let Some(feed) = self.fresh(&key) {
            debug!(url = %url, "feed cache hit");
            return Ok(feed);
        }
        debug!(url = %url, "feed cache miss");

        let raw = match self.source.fetch(url).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(url = %url, error = %e, "failed to fetch feed");
                return Err(e.into_fetch());
            }
        };

        let feed = Arc::new(normalize(&raw, &self.options));
        let entry = CacheEntry {
            feed: Arc::clone(&feed),
            captured_at: self.clock.now(),
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);

        Ok(feed)
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fresh(&self, key: &str) -> Option<Arc<NormalizedFeed>> {
        let now = self.clock.now();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| now.saturating_duration_since(entry.captured_at) < self.ttl)
            .map(|entry| Arc::clone(&entry.feed))
    }
}
