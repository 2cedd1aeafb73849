//! # Application Configuration
//!
//! Loads the server configuration in layers: built-in defaults, an optional `config.yml`
//! (with `${VAR}` substitution), plain environment variables for top-level keys such as
//! `PORT` and `GEMINI_API_KEY`, and finally `ONBOARD_`-prefixed overrides.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use onboard::constants::{
    DEFAULT_DOWNLOAD_FILE_NAME, DEFAULT_MODEL_CANDIDATES, GEMINI_API_BASE_URL, GEMINI_API_KEY_VAR,
};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    #[error("Configuration error: {0}")]
    General(String),
    /// Indicates a required configuration file was not found.
    #[error("{0}")]
    NotFound(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The resolved server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    pub port: u16,
    /// The Gemini credential. `None` disables Q&A; everything else still works.
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    /// The versioned Gemini API root.
    pub gemini_api_base_url: String,
    /// Model identifiers tried in order for every question.
    pub model_candidates: Vec<String>,
    /// File name offered when the document is downloaded.
    pub download_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 9090,
            gemini_api_key: None,
            gemini_api_base_url: GEMINI_API_BASE_URL.to_string(),
            model_candidates: DEFAULT_MODEL_CANDIDATES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            download_file_name: DEFAULT_DOWNLOAD_FILE_NAME.to_string(),
        }
    }
}

// Reads a file and substitutes `${VAR}` references with environment values.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded.into_owned()))
}

/// Loads the application configuration.
///
/// `config_path_override` names a YAML file that must exist. Without it, `config.yml`
/// next to this crate's manifest is used when present.
/// - Top-level keys are overridden by same-named variables (`PORT`, `GEMINI_API_KEY`).
/// - `ONBOARD_...` variables override anything (`ONBOARD_MODEL_CANDIDATES=a,b,c`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Built-in defaults.
        .set_default("port", i64::from(defaults.port))?
        .set_default("gemini_api_base_url", defaults.gemini_api_base_url)?
        .set_default("model_candidates", defaults.model_candidates)?
        .set_default("download_file_name", defaults.download_file_name)?;

    // Layer 2: YAML file.
    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let user_config_path = format!("{}/config.yml", env!("CARGO_MANIFEST_DIR"));
            if let Some(content) = read_and_substitute(&user_config_path)? {
                info!("Loading user-defined configuration from '{user_config_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            }
        }
    }

    let settings = builder
        // Layer 3: Plain environment variables for top-level keys.
        .add_source(Environment::default())
        // Layer 4: Prefixed environment variables.
        .add_source(
            Environment::with_prefix("ONBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("model_candidates"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // An empty substitution (`${GEMINI_API_KEY}` with the variable unset) means no key.
    config.gemini_api_key = config
        .gemini_api_key
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            env::var(GEMINI_API_KEY_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty())
        });
    config.model_candidates = config
        .model_candidates
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();

    Ok(config)
}
