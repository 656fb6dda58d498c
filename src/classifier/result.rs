// Classification results.
//
// A result carries the label, the tier that decided it, and tier-specific
// details. The details are a closed enum keyed by method rather than an
// open map, so consumers know the exact shape at compile time.

use serde::Serialize;

use crate::blacklist::BlacklistSource;
use crate::heuristic::HeuristicFlags;
use crate::model::{FeatureVector, Label};

/// The cascade tier that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
    Blacklist,
    Heuristic,
    #[serde(rename = "ML")]
    Ml,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Blacklist => "Blacklist",
            Method::Heuristic => "Heuristic",
            Method::Ml => "ML",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evidence attached to a verdict, one variant per tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Details {
    Blacklist { source: BlacklistSource },
    Heuristic(HeuristicFlags),
    Ml(FeatureVector),
}

impl Details {
    pub fn method(&self) -> Method {
        match self {
            Details::Blacklist { .. } => Method::Blacklist,
            Details::Heuristic(_) => Method::Heuristic,
            Details::Ml(_) => Method::Ml,
        }
    }
}

/// Outcome of classifying one URL. Immutable once built; the method always
/// agrees with the details variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    label: Label,
    method: Method,
    details: Details,
}

impl ClassificationResult {
    pub fn blacklisted(source: BlacklistSource) -> Self {
        Self::new(Label::Malicious, Details::Blacklist { source })
    }

    pub fn heuristic(flags: HeuristicFlags) -> Self {
        Self::new(Label::Malicious, Details::Heuristic(flags))
    }

    pub fn model(label: Label, features: FeatureVector) -> Self {
        Self::new(label, Details::Ml(features))
    }

    fn new(label: Label, details: Details) -> Self {
        Self {
            label,
            method: details.method(),
            details,
        }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn is_malicious(&self) -> bool {
        self.label.is_malicious()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::extract_features;
    use serde_json::json;

    #[test]
    fn test_blacklist_result_json() {
        let result = ClassificationResult::blacklisted(BlacklistSource::Local);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"label": "Malicious", "method": "Blacklist", "details": {"source": "local"}})
        );
    }

    #[test]
    fn test_heuristic_result_json() {
        let flags = HeuristicFlags {
            long_url: true,
            ..Default::default()
        };
        let result = ClassificationResult::heuristic(flags);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "label": "Malicious",
                "method": "Heuristic",
                "details": {
                    "has_ip_address": false,
                    "contains_suspicious_keywords": false,
                    "long_url": true,
                    "subdomain_count_exceeded": false
                }
            })
        );
    }

    #[test]
    fn test_model_result_json() {
        let result =
            ClassificationResult::model(Label::Safe, extract_features("https://example.com/about"));
        assert_eq!(result.method(), Method::Ml);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"label": "Safe", "method": "ML", "details": [25, 1, 3, 0]})
        );
    }
}
