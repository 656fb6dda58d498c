// Text scan pipeline: find every URL in a document and classify each one.
//
// URLs are classified with bounded concurrency and reported back in the
// order they first appear in the text. The aggregate score is the fraction
// of URLs found malicious, which downstream misinformation scoring uses as
// its URL-risk signal.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use crate::classifier::{ClassificationResult, MaliciousUrlClassifier};
use crate::error::Result;
use crate::urls::extract_urls;

/// Verdict for one URL found in a scanned text.
#[derive(Debug, Clone, Serialize)]
pub struct UrlVerdict {
    pub url: String,
    pub result: ClassificationResult,
}

/// Aggregate outcome of scanning a text.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub urls_checked: usize,
    pub malicious_urls_found: usize,
    /// Fraction of URLs classified malicious (0.0 when no URLs were found)
    pub score: f64,
    pub results: Vec<UrlVerdict>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanReport {
    fn from_verdicts(results: Vec<UrlVerdict>) -> Self {
        let urls_checked = results.len();
        let malicious_urls_found = results.iter().filter(|v| v.result.is_malicious()).count();
        let score = if urls_checked == 0 {
            0.0
        } else {
            malicious_urls_found as f64 / urls_checked as f64
        };

        Self {
            urls_checked,
            malicious_urls_found,
            score,
            results,
            scanned_at: Utc::now(),
        }
    }
}

/// Extract and classify every URL in `text`.
///
/// A hard failure on any URL (model unavailable, deadline) fails the whole
/// scan. `show_progress` draws a progress bar on stderr.
pub async fn run(
    classifier: &MaliciousUrlClassifier,
    text: &str,
    concurrency: usize,
    show_progress: bool,
) -> Result<ScanReport> {
    let urls = extract_urls(text);
    info!(count = urls.len(), concurrency = concurrency, "Scanning extracted URLs");

    let pb = if show_progress {
        ProgressBar::new(urls.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::default_bar().template("  Classifying [{bar:30}] {pos}/{len}")
    {
        pb.set_style(style);
    }

    let outcomes: Vec<(usize, String, Result<ClassificationResult>)> =
        stream::iter(urls.into_iter().enumerate().map(|(idx, url)| {
            let pb = &pb;
            async move {
                let result = classifier.classify(&url).await;
                pb.inc(1);
                (idx, url, result)
            }
        }))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    pb.finish_and_clear();

    let mut ordered = Vec::with_capacity(outcomes.len());
    for (idx, url, result) in outcomes {
        ordered.push((idx, UrlVerdict { url, result: result? }));
    }
    ordered.sort_by_key(|(idx, _)| *idx);

    let report = ScanReport::from_verdicts(ordered.into_iter().map(|(_, v)| v).collect());
    info!(
        urls_checked = report.urls_checked,
        malicious = report.malicious_urls_found,
        score = report.score,
        "Scan complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::blacklist::BlacklistGate;
    use crate::error::Error;
    use crate::heuristic::PhishingHeuristic;
    use crate::model::{FixedModel, Label, UnloadedModel, UrlModel};

    fn classifier(entries: &[&str], model: Arc<dyn UrlModel>) -> MaliciousUrlClassifier {
        MaliciousUrlClassifier::new(
            BlacklistGate::from_entries(entries.iter().copied()),
            PhishingHeuristic::default(),
            model,
        )
    }

    #[tokio::test]
    async fn test_score_is_malicious_fraction() {
        let c = classifier(&["http://malicious-site.com"], Arc::new(FixedModel(Label::Safe)));
        let text = "See http://malicious-site.com, er, http://malicious-site.com and \
                    http://safe-site.org plus https://example.com/login?next=1 today";
        let report = run(&c, text, 4, false).await.unwrap();

        // "http://malicious-site.com," keeps its comma and is a distinct URL
        let urls: Vec<_> = report.results.iter().map(|v| v.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "http://malicious-site.com,",
                "http://malicious-site.com",
                "http://safe-site.org",
                "https://example.com/login",
            ]
        );
        assert_eq!(report.urls_checked, 4);
        assert_eq!(report.malicious_urls_found, 2);
        assert!((report.score - 0.5).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_no_urls_scores_zero() {
        let c = classifier(&[], Arc::new(UnloadedModel));
        let report = run(&c, "nothing to see here", 4, false).await.unwrap();
        assert_eq!(report.urls_checked, 0);
        assert_eq!(report.score, 0.0);
    }

    #[tokio::test]
    async fn test_model_failure_fails_the_scan() {
        let c = classifier(&[], Arc::new(UnloadedModel));
        let err = run(&c, "read https://example.com/about", 2, false).await.unwrap_err();
        assert!(matches!(err, Error::Model(_)));
    }
}
