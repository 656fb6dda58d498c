// The detection cascade.
//
// Tiers run in a fixed order: blacklist, then phishing heuristics, then
// the model. The first positive tier ends the evaluation; the model tier
// always produces a verdict or an error.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::result::ClassificationResult;
use crate::blacklist::BlacklistGate;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::heuristic::PhishingHeuristic;
use crate::model::{extract_features, FeatureVector, Label, UrlModel};

/// Orchestrates the blacklist, heuristic and model tiers for one URL at a
/// time. Holds no per-call state, so a single instance can serve any number
/// of concurrent callers behind an `Arc`.
pub struct MaliciousUrlClassifier {
    blacklist: BlacklistGate,
    heuristic: PhishingHeuristic,
    model: Arc<dyn UrlModel>,
    model_timeout: Option<Duration>,
}

impl MaliciousUrlClassifier {
    pub fn new(
        blacklist: BlacklistGate,
        heuristic: PhishingHeuristic,
        model: Arc<dyn UrlModel>,
    ) -> Self {
        Self {
            blacklist,
            heuristic,
            model,
            model_timeout: None,
        }
    }

    /// Build the full cascade from configuration.
    ///
    /// Fails with `Error::Config` if the blacklist file or model artifact
    /// can't be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let blacklist = BlacklistGate::new(&config.blacklist)?;
        let model = config.load_model()?;

        info!(
            model = model.name(),
            local_entries = blacklist.local_len(),
            "Initialized malicious URL classifier"
        );

        Ok(Self::new(blacklist, PhishingHeuristic::default(), model)
            .with_model_timeout(config.model_timeout))
    }

    /// Bound every model prediction by `timeout`.
    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = Some(timeout);
        self
    }

    pub fn blacklist(&self) -> &BlacklistGate {
        &self.blacklist
    }

    pub fn heuristic(&self) -> &PhishingHeuristic {
        &self.heuristic
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Classify a normalized URL.
    ///
    /// Errors only when the cascade reaches the model tier and the model
    /// can't answer; remote blacklist failures degrade to the local list.
    pub async fn classify(&self, url: &str) -> Result<ClassificationResult> {
        info!(url = url, "Classifying URL");

        if let Some(source) = self.blacklist.match_source(url).await {
            info!(url = url, source = %source, "URL is blacklisted");
            return Ok(ClassificationResult::blacklisted(source));
        }

        let (phishing, flags) = self.heuristic.evaluate(url);
        if phishing {
            info!(url = url, fired = ?flags.fired(), "Heuristics flagged URL");
            return Ok(ClassificationResult::heuristic(flags));
        }

        let features = extract_features(url);
        let label = self.predict(&features).await?;
        info!(url = url, label = %label, features = ?features.values(), "Model classified URL");
        Ok(ClassificationResult::model(label, features))
    }

    /// Classify with a deadline covering the whole cascade.
    ///
    /// On expiry the in-flight fetch or prediction is dropped and
    /// `Error::Cancelled` is returned; a partial verdict is never produced.
    pub async fn classify_within(
        &self,
        url: &str,
        deadline: Duration,
    ) -> Result<ClassificationResult> {
        match tokio::time::timeout(deadline, self.classify(url)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(url = url, deadline = ?deadline, "Classification deadline expired");
                Err(Error::Cancelled(deadline))
            }
        }
    }

    async fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let Some(limit) = self.model_timeout else {
            return self.model.predict(features).await;
        };

        tokio::time::timeout(limit, self.model.predict(features))
            .await
            .map_err(|_| Error::Model(format!("model did not answer within {limit:?}")))?
    }
}
