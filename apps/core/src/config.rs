use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset_source: String,
    pub debounce_ms: u64,
    pub log_level: String,
    pub log_dir: PathBuf,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            dataset_source: "data.json".to_string(),
            debounce_ms: 300,
            log_level: "info".to_string(),
            log_dir: base.join("logs"),
            config_path: base.join("config.toml"),
        }
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    std::env::temp_dir().join("cardsearch")
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.debounce_ms > 5_000 {
        return Err("debounce_ms must be between 0 and 5000".into());
    }

    if cfg.dataset_source.trim().is_empty() {
        return Err("dataset_source is required".into());
    }

    if !LOG_LEVELS.contains(&cfg.log_level.to_ascii_lowercase().as_str()) {
        return Err(format!(
            "log_level '{}' is not one of {}",
            cfg.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if cfg.log_dir.as_os_str().is_empty() {
        return Err("log_dir is required".into());
    }

    Ok(())
}

/// Reads and validates the config at `path` (or the default location). A
/// missing file yields defaults.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let cfg = read(path)?;
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

/// Like [`load`] without validation, for callers that merge overrides first.
pub fn read(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    let mut cfg = match std::fs::read_to_string(&config_path) {
        Ok(raw) => toml::from_str::<Config>(&raw)?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(source) => {
            return Err(ConfigError::Io {
                path: config_path,
                source,
            })
        }
    };
    cfg.config_path = config_path;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg).map_err(ConfigError::Invalid)?;
    let io_error = |source| ConfigError::Io {
        path: cfg.config_path.clone(),
        source,
    };

    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let encoded = toml::to_string_pretty(cfg)?;
    std::fs::write(&cfg.config_path, encoded).map_err(io_error)
}
