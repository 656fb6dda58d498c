// Malicious URL classifier: the cascade orchestrator and its result types.

pub mod cascade;
pub mod result;

pub use cascade::MaliciousUrlClassifier;
pub use result::{ClassificationResult, Details, Method};
