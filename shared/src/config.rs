use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:10000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Endpoint {
    Predict,
    PredictAll,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_predict_path")]
    pub predict: String,
    #[serde(default = "default_predict_all_path")]
    pub predict_all: String,
}

fn default_predict_path() -> String {
    "/api/predict".to_string()
}

fn default_predict_all_path() -> String {
    "/api/predict-all".to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            predict: default_predict_path(),
            predict_all: default_predict_all_path(),
        }
    }
}

/// Where the prediction service lives. Built once at startup and passed to
/// whoever dispatches requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints: Endpoints::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn from_yaml(source: &str) -> PipelineResult<Self> {
        let config: ApiConfig = serde_yaml::from_str(source)
            .map_err(|e| PipelineError::Config(format!("invalid client config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &std::path::Path) -> PipelineResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&source)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> PipelineResult<Self> {
        self.base_url = base_url.into();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(PipelineError::Config("base_url is empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(PipelineError::Config(format!(
                "base_url must start with http:// or https://, got {}",
                base
            )));
        }
        Ok(())
    }

    pub fn path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Predict => &self.endpoints.predict,
            Endpoint::PredictAll => &self.endpoints.predict_all,
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let path = self.path(endpoint);
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}
