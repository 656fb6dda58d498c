use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::blacklist::BlacklistConfig;
use crate::error::{Error, Result};
use crate::model::{LinearModel, UnloadedModel, UrlModel};

/// Which model backs the final tier of the cascade.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelBackend {
    /// Logistic-regression weights from a JSON artifact (default)
    Linear,
    /// Exported ONNX classifier (requires the `onnx` feature)
    Onnx,
    /// No model; URLs that reach the model tier fail with a model error
    None,
}

impl ModelBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelBackend::Linear => "linear",
            ModelBackend::Onnx => "onnx",
            ModelBackend::None => "none",
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy; this struct is then
/// passed explicitly to whatever constructs the classifier.
pub struct Config {
    pub blacklist: BlacklistConfig,
    pub model_backend: ModelBackend,
    /// Model artifact (JSON weights or .onnx file)
    pub model_path: PathBuf,
    /// Upper bound on a single model prediction
    pub model_timeout: Duration,
    /// Default number of URLs classified in parallel during a scan
    pub scan_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; a blacklist file or remote feed is only
    /// used when explicitly configured.
    pub fn load() -> Result<Self> {
        let model_backend = model_backend_var("URLSENTRY_MODEL")?;

        let model_path = env::var("URLSENTRY_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_model_path(&model_backend));

        let blacklist = BlacklistConfig {
            local_path: non_empty_var("URLSENTRY_BLACKLIST_PATH").map(PathBuf::from),
            remote_url: non_empty_var("URLSENTRY_REMOTE_BLACKLIST_URL"),
            remote_ttl: secs_var("URLSENTRY_REMOTE_TTL_SECS")?,
            fetch_timeout: secs_var("URLSENTRY_FETCH_TIMEOUT_SECS")?
                .unwrap_or(Duration::from_secs(10)),
        };

        Ok(Self {
            blacklist,
            model_backend,
            model_path,
            model_timeout: secs_var("URLSENTRY_MODEL_TIMEOUT_SECS")?
                .unwrap_or(Duration::from_secs(5)),
            scan_concurrency: parse_var("URLSENTRY_SCAN_CONCURRENCY")?.unwrap_or(8),
        })
    }

    /// Check that the configured model artifact exists.
    /// Call this before building a classifier so the error names the fix.
    pub fn require_model(&self) -> Result<()> {
        match self.model_backend {
            ModelBackend::None => Ok(()),
            ModelBackend::Linear | ModelBackend::Onnx => {
                if !self.model_path.exists() {
                    return Err(Error::Config(format!(
                        "Model artifact not found at {}\n\
                         Set URLSENTRY_MODEL_PATH to a trained model, \
                         or URLSENTRY_MODEL=none to run without the model tier.",
                        self.model_path.display()
                    )));
                }
                Ok(())
            }
        }
    }

    /// Load the configured model backend.
    pub fn load_model(&self) -> Result<Arc<dyn UrlModel>> {
        match self.model_backend {
            ModelBackend::None => Ok(Arc::new(UnloadedModel)),
            ModelBackend::Linear => {
                self.require_model()?;
                Ok(Arc::new(LinearModel::load(&self.model_path)?))
            }
            ModelBackend::Onnx => self.load_onnx(),
        }
    }

    #[cfg(feature = "onnx")]
    fn load_onnx(&self) -> Result<Arc<dyn UrlModel>> {
        self.require_model()?;
        Ok(Arc::new(crate::model::onnx::OnnxUrlModel::load(
            &self.model_path,
        )?))
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx(&self) -> Result<Arc<dyn UrlModel>> {
        Err(Error::Config(
            "URLSENTRY_MODEL=onnx requires building with `--features onnx`".to_string(),
        ))
    }
}

/// Default artifact location: ~/.local/share/urlsentry/ on Linux.
pub fn default_model_path(backend: &ModelBackend) -> PathBuf {
    let file = match backend {
        ModelBackend::Onnx => "url_model.onnx",
        _ => "url_model.json",
    };
    default_data_dir().join(file)
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join("urlsentry")
}

/// Read the backend choice from `name`. Unset or blank means linear.
fn model_backend_var(name: &str) -> Result<ModelBackend> {
    match non_empty_var(name).as_deref().map(str::trim) {
        Some("onnx") => Ok(ModelBackend::Onnx),
        Some("none") => Ok(ModelBackend::None),
        Some("linear") | None => Ok(ModelBackend::Linear),
        Some(other) => Err(Error::Config(format!(
            "Unknown {name} '{other}' (expected linear, onnx or none)"
        ))),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{name} must be a non-negative integer, got '{raw}'"))),
        None => Ok(None),
    }
}

fn secs_var(name: &str) -> Result<Option<Duration>> {
    Ok(parse_var::<u64>(name)?.map(Duration::from_secs))
}
