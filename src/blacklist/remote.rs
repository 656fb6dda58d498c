// HTTP client for a remote newline-delimited blacklist feed.
//
// Without a TTL every lookup re-fetches the feed, trading bandwidth for
// freshness. With a TTL the last successful fetch is cached and reused
// until it goes stale. The cache lock is held across the fetch so
// concurrent lookups trigger a single refresh.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use super::gate::parse_entries;
use crate::error::{Error, Result};

struct CachedFeed {
    entries: Arc<HashSet<String>>,
    fetched_at: Instant,
}

/// A remote blacklist endpoint with optional TTL caching.
pub struct RemoteBlacklist {
    client: Client,
    url: String,
    ttl: Option<Duration>,
    cache: Mutex<Option<CachedFeed>>,
}

impl RemoteBlacklist {
    /// Create a client for the feed at `url`.
    ///
    /// `ttl = None` re-fetches on every lookup. `timeout` bounds each fetch.
    pub fn new(url: &str, ttl: Option<Duration>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("urlsentry/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
            ttl,
            cache: Mutex::new(None),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Fetch the feed once, bypassing the cache.
    pub async fn fetch(&self) -> Result<HashSet<String>> {
        info!(url = %self.url, "Fetching remote blacklist");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        let entries = parse_entries(&body);
        debug!(url = %self.url, entries = entries.len(), "Remote blacklist fetched");
        Ok(entries)
    }

    /// Current feed contents, honouring the TTL.
    pub async fn entries(&self) -> Result<Arc<HashSet<String>>> {
        let Some(ttl) = self.ttl else {
            return Ok(Arc::new(self.fetch().await?));
        };

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < ttl {
                return Ok(Arc::clone(&cached.entries));
            }
        }

        let entries = Arc::new(self.fetch().await?);
        *cache = Some(CachedFeed {
            entries: Arc::clone(&entries),
            fetched_at: Instant::now(),
        });
        Ok(entries)
    }

    /// Force a fetch and, when caching is enabled, replace the cached copy.
    pub async fn refresh(&self) -> Result<Arc<HashSet<String>>> {
        let entries = Arc::new(self.fetch().await?);
        if self.ttl.is_some() {
            *self.cache.lock().await = Some(CachedFeed {
                entries: Arc::clone(&entries),
                fetched_at: Instant::now(),
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_feed_is_network_error() {
        // Port 9 (discard) on localhost is closed on any sane test machine
        let remote =
            RemoteBlacklist::new("http://127.0.0.1:9/list.txt", None, Duration::from_secs(2))
                .unwrap();
        let err = remote.fetch().await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_accessors() {
        let remote = RemoteBlacklist::new(
            "http://feeds.example/list.txt",
            Some(Duration::from_secs(60)),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(remote.url(), "http://feeds.example/list.txt");
        assert_eq!(remote.ttl(), Some(Duration::from_secs(60)));
    }
}
