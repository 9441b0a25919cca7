use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid request_timeout: {0}")]
    Timeout(#[from] humantime::DurationError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_folder")]
    pub folder: PathBuf,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_endpoint() -> String {
    "https://api.wheretheiss.at/v1/satellites/25544".to_string()
}

fn default_request_timeout() -> String {
    "30s".to_string()
}

fn default_folder() -> PathBuf {
    PathBuf::from("data")
}

fn default_file_name() -> String {
    "ISS_track.csv".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            file_name: default_file_name(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            output: OutputConfig::default(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.request_timeout()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        Ok(humantime::parse_duration(&self.request_timeout)?)
    }

    /// Full path of the CSV file the sampler rewrites every cycle.
    pub fn output_path(&self) -> PathBuf {
        self.output.folder.join(&self.output.file_name)
    }
}
