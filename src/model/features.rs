// Feature extraction for the model tier.
//
// The vector order is part of the contract with any trained model:
// [url_length, num_dots_in_host, num_slashes_in_url, has_ip_address].
// Reordering fields here silently breaks every deployed artifact.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::urls::host_of;

/// Dotted quad found anywhere in the host. Unlike the heuristic rule this
/// is not anchored, so "cdn-1.2.3.4.example" counts as having an IP.
static ANY_IP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+\.\d+").expect("IP pattern is valid"));

/// Number of features the model tier consumes.
pub const FEATURE_COUNT: usize = 4;

/// Fixed-order numeric summary of a URL.
///
/// Serializes as the ordered array the model sees, e.g. `[25, 1, 3, 0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "[usize; 4]")]
pub struct FeatureVector {
    pub url_length: usize,
    pub num_dots_in_host: usize,
    pub num_slashes_in_url: usize,
    pub has_ip_address: bool,
}

impl FeatureVector {
    /// The feature values in model order, as the model consumes them.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.url_length as f64,
            self.num_dots_in_host as f64,
            self.num_slashes_in_url as f64,
            if self.has_ip_address { 1.0 } else { 0.0 },
        ]
    }
}

impl From<FeatureVector> for [usize; FEATURE_COUNT] {
    fn from(f: FeatureVector) -> Self {
        [
            f.url_length,
            f.num_dots_in_host,
            f.num_slashes_in_url,
            usize::from(f.has_ip_address),
        ]
    }
}

/// Compute the feature vector for a URL. Deterministic and pure.
pub fn extract_features(url: &str) -> FeatureVector {
    let host = host_of(url);
    FeatureVector {
        url_length: url.chars().count(),
        num_dots_in_host: host.matches('.').count(),
        num_slashes_in_url: url.matches('/').count(),
        has_ip_address: ANY_IP_PATTERN.is_match(host),
    }
}
