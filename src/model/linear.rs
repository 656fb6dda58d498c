// Logistic-regression URL model loaded from a JSON artifact.
//
// The artifact holds one weight per feature (in feature-vector order), a
// bias, and an optional decision threshold:
//
//   {"weights": [0.02, 0.4, 0.1, 2.5], "bias": -3.0, "threshold": 0.5}
//
// This is the shape a linear classifier exports to once its coefficients
// are dumped; training happens elsewhere.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::features::{FeatureVector, FEATURE_COUNT};
use super::traits::{Label, UrlModel};
use crate::error::{Error, Result};

fn default_threshold() -> f64 {
    0.5
}

/// Linear model parameters as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub weights: [f64; FEATURE_COUNT],
    pub bias: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LinearModel {
    /// Load and validate a model artifact.
    ///
    /// A missing or malformed file is a configuration error: the classifier
    /// must not start without a usable model.
    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "Loading URL model");

        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read model artifact {}: {e}", path.display()))
        })?;
        let model = Self::from_json(&raw).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{} ({})", msg, path.display())),
            other => other,
        })?;

        debug!(weights = ?model.weights, bias = model.bias, "Loaded linear URL model");
        Ok(model)
    }

    /// Parse a model artifact from its JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        let model: LinearModel = serde_json::from_str(raw)
            .map_err(|e| Error::Config(format!("Malformed model artifact: {e}")))?;

        if !model.threshold.is_finite() || !(0.0..=1.0).contains(&model.threshold) {
            return Err(Error::Config(format!(
                "Model threshold must be within [0, 1], got {}",
                model.threshold
            )));
        }
        if model.weights.iter().any(|w| !w.is_finite()) || !model.bias.is_finite() {
            return Err(Error::Config(
                "Model weights and bias must be finite numbers".to_string(),
            ));
        }

        Ok(model)
    }

    /// Probability that the URL is malicious.
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let z = self
            .weights
            .iter()
            .zip(features.values())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        sigmoid(z)
    }
}

#[async_trait]
impl UrlModel for LinearModel {
    fn name(&self) -> &str {
        "linear"
    }

    async fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let p = self.probability(features);
        let raw = i64::from(p >= self.threshold);
        debug!(probability = p, threshold = self.threshold, "Linear model prediction");
        Label::from_binary(raw)
    }
}

/// Sigmoid activation: maps any real number to (0, 1).
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::features::extract_features;

    #[test]
    fn test_sigmoid_zero() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_parse_with_default_threshold() {
        let model = LinearModel::from_json(r#"{"weights": [1, 0, 0, 0], "bias": -30}"#).unwrap();
        assert!((model.threshold - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_rejects_wrong_weight_count() {
        let err = LinearModel::from_json(r#"{"weights": [1, 2, 3], "bias": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let err = LinearModel::from_json(r#"{"weights": [0, 0, 0, 0], "bias": 0, "threshold": 1.5}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = LinearModel::load(Path::new("/nonexistent/url_model.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_length_weighted_model() {
        // Malicious once the URL is longer than 30 characters
        let model = LinearModel::from_json(r#"{"weights": [1, 0, 0, 0], "bias": -30}"#).unwrap();

        let short = extract_features("https://a.com/");
        let long = extract_features("https://example.com/some/long/path");
        assert_eq!(model.predict(&short).await.unwrap(), Label::Safe);
        assert_eq!(model.predict(&long).await.unwrap(), Label::Malicious);
    }

    #[tokio::test]
    async fn test_ip_weighted_model() {
        let model =
            LinearModel::from_json(r#"{"weights": [0, 0, 0, 10], "bias": -5}"#).unwrap();
        let ip = extract_features("http://10.1.2.3/");
        let named = extract_features("http://example.com/");
        assert_eq!(model.predict(&ip).await.unwrap(), Label::Malicious);
        assert_eq!(model.predict(&named).await.unwrap(), Label::Safe);
    }
}
