// UrlModel trait: the seam between the cascade and whatever model backs
// the final tier.
//
// Implementations receive the ordered feature vector and return a binary
// label. They must be Send + Sync because one model is shared by every
// concurrent classify call; backends that need exclusive access serialize
// internally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::features::FeatureVector;
use crate::error::{Error, Result};

/// Binary verdict for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Malicious,
    Safe,
}

impl Label {
    /// Map a raw binary model output: 1 is malicious, 0 is safe.
    /// Anything else is a model fault, never a guess.
    pub fn from_binary(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Label::Malicious),
            0 => Ok(Label::Safe),
            other => Err(Error::Model(format!(
                "model returned {other}, expected a binary label (0 or 1)"
            ))),
        }
    }

    pub fn is_malicious(&self) -> bool {
        matches!(self, Label::Malicious)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Malicious => "Malicious",
            Label::Safe => "Safe",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A predictive model over URL feature vectors.
#[async_trait]
pub trait UrlModel: Send + Sync {
    /// Short backend name for logs and status output.
    fn name(&self) -> &str;

    /// Predict the label for one feature vector.
    async fn predict(&self, features: &FeatureVector) -> Result<Label>;
}

/// Stand-in used when no model is configured.
/// Fails every prediction so a missing model can never produce a fake label.
pub struct UnloadedModel;

#[async_trait]
impl UrlModel for UnloadedModel {
    fn name(&self) -> &str {
        "none"
    }

    async fn predict(&self, _features: &FeatureVector) -> Result<Label> {
        Err(Error::Model(
            "no model is loaded; set URLSENTRY_MODEL_PATH to a model artifact".to_string(),
        ))
    }
}

/// Model that always answers with the same label. Useful for dry runs
/// where only the blacklist and heuristic tiers matter.
pub struct FixedModel(pub Label);

#[async_trait]
impl UrlModel for FixedModel {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn predict(&self, _features: &FeatureVector) -> Result<Label> {
        Ok(self.0)
    }
}
