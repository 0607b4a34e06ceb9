use crate::error::ProvisionError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Base name of the optional settings file (`configuration.yaml`, `.toml`, ...).
pub const SETTINGS_FILE: &str = "configuration";

/// Prefix for environment overrides, e.g. `PROVISION__COMMON__LOG_LEVEL`.
pub const ENV_PREFIX: &str = "PROVISION";

/// Logging settings, read from the `common` table (`PROVISION__COMMON__LOG_LEVEL`).
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> Result<Self, ProvisionError> {
        load_settings(SETTINGS_FILE)
    }
}

/// Layered settings: optional file first, then `PROVISION__*` environment variables.
pub fn load_settings<T: DeserializeOwned>(file: &str) -> Result<T, ProvisionError> {
    dotenvy::dotenv().ok();

    let config = Cfg::builder()
        .add_source(File::with_name(file).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Load a required settings file with no environment layer.
pub fn load_file<T: DeserializeOwned>(path: &str) -> Result<T, ProvisionError> {
    let config = Cfg::builder()
        .add_source(File::with_name(path).required(true))
        .build()?;

    Ok(config.try_deserialize()?)
}
