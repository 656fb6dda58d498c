// Error taxonomy for the detection cascade.
//
// Only construction-time configuration problems and call-time model
// failures are hard errors. Remote blacklist failures are recovered inside
// the gate, and malformed URLs never raise at all.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the detection cascade.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or unreadable blacklist file, or a missing/malformed model
    /// artifact. Raised at construction; the classifier never starts half-built.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote blacklist feed could not be fetched (transport failure or
    /// non-2xx status).
    #[error("Remote blacklist fetch failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The model tier is unavailable or failed during prediction.
    #[error("Model error: {0}")]
    Model(String),

    /// The caller's deadline expired before the cascade reached a verdict.
    #[error("Classification cancelled after {0:?}")]
    Cancelled(Duration),
}

pub type Result<T> = std::result::Result<T, Error>;
