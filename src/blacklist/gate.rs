// The blacklist gate: local set plus optional remote feed.
//
// Membership is exact string equality against normalized URLs. The local
// set is loaded once and never mutated, so the gate can be shared across
// tasks without locking.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::remote::RemoteBlacklist;
use crate::error::{Error, Result};

/// Which list produced a blacklist hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlacklistSource {
    Local,
    Remote,
}

impl std::fmt::Display for BlacklistSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlacklistSource::Local => write!(f, "local"),
            BlacklistSource::Remote => write!(f, "remote"),
        }
    }
}

/// Recognized blacklist options.
#[derive(Debug, Clone)]
pub struct BlacklistConfig {
    /// Newline-delimited file of blacklisted URLs
    pub local_path: Option<PathBuf>,
    /// Endpoint serving a newline-delimited feed
    pub remote_url: Option<String>,
    /// Reuse a fetched feed for this long; `None` fetches on every lookup
    pub remote_ttl: Option<Duration>,
    /// Upper bound on each remote fetch
    pub fetch_timeout: Duration,
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            local_path: None,
            remote_url: None,
            remote_ttl: None,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Parse line-delimited blacklist text: trim each line, skip blanks.
///
/// Lines may end in `\n`, `\r\n` or a bare `\r`.
pub fn parse_entries(text: &str) -> HashSet<String> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Boolean membership test against the local and remote blacklists.
pub struct BlacklistGate {
    local: HashSet<String>,
    remote: Option<RemoteBlacklist>,
}

impl BlacklistGate {
    /// Build a gate from configuration.
    ///
    /// An explicitly configured local file that can't be read is fatal; the
    /// gate never silently starts empty.
    pub fn new(config: &BlacklistConfig) -> Result<Self> {
        let local = match &config.local_path {
            Some(path) => load_local(path)?,
            None => HashSet::new(),
        };

        let remote = config
            .remote_url
            .as_deref()
            .map(|url| RemoteBlacklist::new(url, config.remote_ttl, config.fetch_timeout))
            .transpose()?;

        info!(
            local_entries = local.len(),
            remote = remote.is_some(),
            "Initialized blacklist gate"
        );

        Ok(Self { local, remote })
    }

    /// Local-only gate from in-memory entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            local: entries.into_iter().map(Into::into).collect(),
            remote: None,
        }
    }

    /// Attach a remote feed to this gate.
    pub fn with_remote(mut self, remote: RemoteBlacklist) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn local_len(&self) -> usize {
        self.local.len()
    }

    pub fn remote(&self) -> Option<&RemoteBlacklist> {
        self.remote.as_ref()
    }

    /// Which list contains `url`, propagating remote fetch failures.
    ///
    /// The local set is checked first; the remote feed is only consulted
    /// when the local set has no match. A local hit therefore performs no
    /// fetch, even when no TTL is configured.
    pub async fn try_match_source(&self, url: &str) -> Result<Option<BlacklistSource>> {
        if self.local.contains(url) {
            return Ok(Some(BlacklistSource::Local));
        }

        match &self.remote {
            Some(remote) => {
                let entries = remote.entries().await?;
                Ok(entries.contains(url).then_some(BlacklistSource::Remote))
            }
            None => Ok(None),
        }
    }

    /// Which list contains `url`. A failed remote fetch is logged and the
    /// lookup degrades to the local set for this call.
    pub async fn match_source(&self, url: &str) -> Option<BlacklistSource> {
        let source = match self.try_match_source(url).await {
            Ok(source) => source,
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    "Remote blacklist unavailable, checking local list only"
                );
                None
            }
        };

        debug!(
            url = url,
            blacklisted = source.is_some(),
            source = ?source,
            "Blacklist lookup"
        );
        source
    }

    /// Whether `url` is blacklisted, degrading to local-only on fetch failure.
    ///
    /// Without a TTL the remote feed is fetched on every call that misses
    /// the local set; a local hit returns without touching the network.
    pub async fn is_blacklisted(&self, url: &str) -> bool {
        self.match_source(url).await.is_some()
    }

    /// Whether `url` is blacklisted, surfacing remote fetch failures.
    pub async fn try_is_blacklisted(&self, url: &str) -> Result<bool> {
        Ok(self.try_match_source(url).await?.is_some())
    }
}

fn load_local(path: &Path) -> Result<HashSet<String>> {
    info!(path = %path.display(), "Loading local blacklist");
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read local blacklist {}: {e}",
            path.display()
        ))
    })?;
    Ok(parse_entries(&text))
}
