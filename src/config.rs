use crate::error::{GeoSeekError, GeoSeekResult};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub embedding: EmbeddingConfig,
    pub search: SearchConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection settings for the embedding-inference collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub endpoint: String,
    /// Expected vector dimensionality; responses of any other length are
    /// rejected. None disables the check.
    pub expected_dimensions: Option<usize>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Connection settings for the search index collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub endpoint: String,
    pub index: String,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Secondary sort key applied when no explicit sort is requested.
    #[serde(default = "default_tie_breaker")]
    pub tie_breaker_field: String,
    /// Upper bound on the requested page size.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tie_breaker_field: default_tie_breaker(),
            max_size: default_max_size(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_tie_breaker() -> String {
    "published".to_string()
}

fn default_max_size() -> usize {
    100
}

pub fn load_config(path: Option<&Path>) -> GeoSeekResult<AppConfig> {
    let mut builder = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::with_prefix("GEOSEEK").separator("__"));

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(false));
    }

    let config = builder
        .build()
        .map_err(|err| GeoSeekError::ConfigError(err.to_string()))?;

    let parsed: AppConfig = config
        .try_deserialize()
        .map_err(|err| GeoSeekError::ConfigError(err.to_string()))?;

    if parsed.pipeline.max_size == 0 {
        return Err(GeoSeekError::ConfigError(
            "pipeline.max_size must be greater than zero".to_string(),
        ));
    }

    Ok(parsed)
}
