// URL extraction from free text.
//
// The pattern matches an http(s) scheme, a run of host characters, then
// everything up to the next whitespace. Trailing sentence punctuation is
// therefore captured as path content ("see https://a.com/x." yields
// "https://a.com/x."). That is a property of the pattern and is kept as-is.
//
// Word and whitespace classes are Unicode-aware: internationalized hosts
// are matched, and a non-breaking space ends a URL like any other space.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::normalize::normalize;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[-\w.]|%[0-9a-fA-F]{2})+\S*").expect("URL pattern is valid")
});

/// Find every http/https URL in `text`, normalize it, and deduplicate.
///
/// Results are returned in first-seen order: the position of each URL's
/// first occurrence in the text determines its position in the output.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for raw in URL_PATTERN.find_iter(text) {
        let normalized = normalize(raw.as_str());
        if seen.insert(normalized.clone()) {
            urls.push(normalized);
        }
    }

    debug!(count = urls.len(), "Extracted unique URLs");
    urls
}
