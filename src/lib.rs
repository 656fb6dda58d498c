// urlsentry: Multi-tier malicious URL detection
//
// This is the library root. Each module corresponds to a stage of the
// detection cascade, leaf-first: URL discovery, the blacklist gate, the
// phishing heuristic, the model tier, and the classifier that ties them
// together.

pub mod blacklist;
pub mod classifier;
pub mod config;
pub mod error;
pub mod heuristic;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod urls;

pub use error::{Error, Result};
