use crate::error::PredictError;
use serde::Deserialize;
use std::{fs, path::Path};

/// Environment variable naming the YAML config file.
pub const CONFIG_ENV: &str = "CARPRICE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub frontend: Option<FrontendConfig>,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ModelConfig {
    /// Path to the exported `.onnx` regression pipeline.
    pub path: String,
    /// Optional JSON sidecar describing input order and trained categories.
    #[serde(default)]
    pub schema_path: Option<String>,
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

#[derive(Deserialize, Clone, Debug)]
pub struct FrontendConfig {
    pub dir: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CorsConfig {
    #[serde(default = "default_allow_origins")]
    pub allow_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: default_allow_origins(),
        }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allow_origins.iter().any(|o| o == "*")
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_intra_threads() -> usize {
    1
}

fn default_allow_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    pub fn from_yaml(content: &str) -> Result<Self, PredictError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PredictError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Reads the file named by `CARPRICE_CONFIG`, or `config.yaml`.
    pub fn from_env() -> Result<Self, PredictError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
