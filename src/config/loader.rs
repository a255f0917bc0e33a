//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ConfigValidationError};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RETOUCH_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ConfigValidationError>),
}

fn join_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate a TOML document.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Config path from `RETOUCH_CONFIG`, if set.
pub fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV).map(PathBuf::from)
}
