// Rule-based phishing detection over a single URL.
//
// Four independent rules produce a fixed-shape flag record; the verdict is
// their logical OR. The evaluator is pure: no I/O, no shared state, safe to
// call from any number of tasks at once.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::urls::host_of;

/// Dotted quad anchored at the start of the host, ending on a word boundary.
static HOST_IP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}(?:\.\d{1,3}){3}\b").expect("IP pattern is valid")
});

/// Keywords commonly seen in credential-harvesting URLs.
pub const DEFAULT_SUSPICIOUS_KEYWORDS: [&str; 6] =
    ["login", "verify", "account", "secure", "update", "confirm"];

/// The outcome of each heuristic rule for one URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicFlags {
    pub has_ip_address: bool,
    pub contains_suspicious_keywords: bool,
    pub long_url: bool,
    pub subdomain_count_exceeded: bool,
}

impl HeuristicFlags {
    /// The heuristic verdict: true if any rule fired.
    pub fn any(&self) -> bool {
        self.has_ip_address
            || self.contains_suspicious_keywords
            || self.long_url
            || self.subdomain_count_exceeded
    }

    /// Names of the rules that fired, in declaration order.
    pub fn fired(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.has_ip_address {
            names.push("has_ip_address");
        }
        if self.contains_suspicious_keywords {
            names.push("contains_suspicious_keywords");
        }
        if self.long_url {
            names.push("long_url");
        }
        if self.subdomain_count_exceeded {
            names.push("subdomain_count_exceeded");
        }
        names
    }
}

/// Tunable thresholds for the heuristic rules.
///
/// The defaults are the production values: six keywords, a 75-character
/// length limit, and at most three dots in the host.
#[derive(Debug, Clone)]
pub struct HeuristicRules {
    /// Lowercase keywords matched as substrings of the whole URL
    pub suspicious_keywords: Vec<String>,
    /// URLs strictly longer than this are flagged
    pub max_url_length: usize,
    /// Hosts with strictly more dots than this are flagged
    pub max_host_dots: usize,
}

impl Default for HeuristicRules {
    fn default() -> Self {
        Self {
            suspicious_keywords: DEFAULT_SUSPICIOUS_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            max_url_length: 75,
            max_host_dots: 3,
        }
    }
}

/// Stateless phishing rule evaluator.
#[derive(Debug, Clone, Default)]
pub struct PhishingHeuristic {
    rules: HeuristicRules,
}

impl PhishingHeuristic {
    pub fn new(rules: HeuristicRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &HeuristicRules {
        &self.rules
    }

    /// Evaluate every rule against `url` and return the verdict with the
    /// flag record. A URL with no parsable host is evaluated against an
    /// empty host.
    pub fn evaluate(&self, url: &str) -> (bool, HeuristicFlags) {
        let host = host_of(url);
        let lowered = url.to_lowercase();

        let flags = HeuristicFlags {
            has_ip_address: HOST_IP_PATTERN.is_match(host),
            contains_suspicious_keywords: self
                .rules
                .suspicious_keywords
                .iter()
                .any(|k| lowered.contains(k.as_str())),
            long_url: url.chars().count() > self.rules.max_url_length,
            subdomain_count_exceeded: host.matches('.').count() > self.rules.max_host_dots,
        };

        let verdict = flags.any();
        debug!(url = url, flags = ?flags, phishing = verdict, "Applied heuristic checks");
        (verdict, flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_host_with_keywords() {
        let (verdict, flags) =
            PhishingHeuristic::default().evaluate("http://192.168.1.1/secure/login");
        assert!(verdict);
        assert!(flags.has_ip_address);
        assert!(flags.contains_suspicious_keywords);
        assert!(!flags.long_url);
        assert!(!flags.subdomain_count_exceeded);
    }

    #[test]
    fn test_ip_must_start_the_host() {
        let (_, flags) = PhishingHeuristic::default().evaluate("http://host-10.0.0.1.example/x");
        assert!(!flags.has_ip_address);
    }

    #[test]
    fn test_ip_with_port() {
        let (_, flags) = PhishingHeuristic::default().evaluate("http://10.0.0.1:8080/");
        assert!(flags.has_ip_address);
    }

    #[test]
    fn test_ip_octet_too_long_is_not_an_ip() {
        let (_, flags) = PhishingHeuristic::default().evaluate("http://1234.1.1.1/");
        assert!(!flags.has_ip_address);
    }

    #[test]
    fn test_keywords_are_case_insensitive_and_match_anywhere() {
        let h = PhishingHeuristic::default();
        assert!(h.evaluate("https://LOGIN.example.com").1.contains_suspicious_keywords);
        assert!(h.evaluate("https://example.com/AccountS").1.contains_suspicious_keywords);
        assert!(h.evaluate("https://myupdates.net/").1.contains_suspicious_keywords);
    }

    #[test]
    fn test_long_url_boundary() {
        let h = PhishingHeuristic::default();
        let base = "https://example.com/";
        let exactly_75 = format!("{base}{}", "a".repeat(75 - base.len()));
        let seventy_six = format!("{base}{}", "a".repeat(76 - base.len()));
        assert!(!h.evaluate(&exactly_75).1.long_url);
        assert!(h.evaluate(&seventy_six).1.long_url);
    }

    #[test]
    fn test_subdomain_boundary() {
        let h = PhishingHeuristic::default();
        assert!(!h.evaluate("https://a.b.c.com/").1.subdomain_count_exceeded);
        assert!(h.evaluate("https://a.b.c.d.com/").1.subdomain_count_exceeded);
    }

    #[test]
    fn test_dots_in_path_do_not_count_as_subdomains() {
        let (_, flags) = PhishingHeuristic::default().evaluate("https://ex.com/a.b.c.d.e");
        assert!(!flags.subdomain_count_exceeded);
    }

    #[test]
    fn test_empty_host_evaluates_cleanly() {
        let (verdict, flags) = PhishingHeuristic::default().evaluate("not-a-url");
        assert!(!verdict);
        assert_eq!(flags, HeuristicFlags::default());
    }

    #[test]
    fn test_clean_url_passes() {
        let (verdict, flags) = PhishingHeuristic::default().evaluate("https://example.com/about");
        assert!(!verdict);
        assert!(flags.fired().is_empty());
    }

    #[test]
    fn test_custom_rules() {
        let h = PhishingHeuristic::new(HeuristicRules {
            suspicious_keywords: vec!["wallet".to_string()],
            max_url_length: 20,
            max_host_dots: 0,
        });
        let (_, flags) = h.evaluate("https://my.wallet.io/login");
        assert!(flags.contains_suspicious_keywords);
        assert!(flags.long_url);
        assert!(flags.subdomain_count_exceeded);
        assert_eq!(
            flags.fired(),
            vec!["contains_suspicious_keywords", "long_url", "subdomain_count_exceeded"]
        );
    }
}
