// ONNX Runtime backend for exported URL classifiers.
//
// Expects a model with a single float input of shape [1, 4] (the feature
// vector, in order) whose first output is either an int64 class label or a
// float malicious-probability. That covers the common converter exports of
// tree and linear classifiers.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use super::features::{FeatureVector, FEATURE_COUNT};
use super::traits::{Label, UrlModel};
use crate::error::{Error, Result};

/// Probability cut-off used when the model emits a score instead of a label.
const PROBABILITY_THRESHOLD: f32 = 0.5;

/// Local ONNX model. The session sits behind Arc<Mutex> because
/// Session::run takes &mut self and inference runs on a blocking thread.
pub struct OnnxUrlModel {
    session: Arc<Mutex<Session>>,
}

impl OnnxUrlModel {
    /// Load the ONNX model at `path`. Missing or unloadable files are
    /// configuration errors.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "ONNX model file not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| Error::Config(format!("Failed to create ONNX session builder: {e}")))?
            .commit_from_file(path)
            .map_err(|e| {
                Error::Config(format!("Failed to load ONNX model {}: {e}", path.display()))
            })?;

        debug!("Loaded ONNX URL model from {}", path.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }
}

#[async_trait]
impl UrlModel for OnnxUrlModel {
    fn name(&self) -> &str {
        "onnx"
    }

    async fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let session = Arc::clone(&self.session);
        let input: Vec<f32> = features.values().iter().map(|&v| v as f32).collect();

        // Inference is CPU-bound; keep it off the async runtime.
        let raw = tokio::task::spawn_blocking(move || -> Result<i64> {
            let shape = [1_i64, FEATURE_COUNT as i64];
            let tensor = Tensor::from_array((shape, input))
                .map_err(|e| Error::Model(format!("Failed to build input tensor: {e}")))?;

            let mut session = session
                .lock()
                .map_err(|e| Error::Model(format!("Session lock poisoned: {e}")))?;
            let outputs = session
                .run(ort::inputs![tensor])
                .map_err(|e| Error::Model(format!("ONNX inference failed: {e}")))?;

            if let Ok((_shape, labels)) = outputs[0].try_extract_tensor::<i64>() {
                return labels
                    .first()
                    .copied()
                    .ok_or_else(|| Error::Model("ONNX model returned no label".to_string()));
            }

            let (_shape, scores) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| Error::Model(format!("Unsupported ONNX output: {e}")))?;
            scores
                .first()
                .map(|&p| threshold_probability(p))
                .ok_or_else(|| Error::Model("ONNX model returned no score".to_string()))
        })
        .await
        .map_err(|e| Error::Model(format!("Inference task panicked: {e}")))??;

        Label::from_binary(raw)
    }
}

fn threshold_probability(p: f32) -> i64 {
    i64::from(p >= PROBABILITY_THRESHOLD)
}
