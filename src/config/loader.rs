//! Configuration Loader
//!
//! Environment-aware configuration loading: a base TOML file, an optional
//! per-environment overlay, then `CONDO_*` environment variables, each
//! layer overriding the previous one.

use super::error::ConfigResult;
use super::CondoConfig;
use ::config::{Config, Environment, File};
use serde_json::{json, Value};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Default directory holding `condo-core.toml`
const DEFAULT_CONFIG_DIR: &str = "config";
/// Base name of the configuration files
const CONFIG_BASENAME: &str = "condo-core";

/// Loaded configuration plus the environment it was resolved for.
pub struct ConfigManager {
    config: CondoConfig,
    environment: String,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection from the default
    /// directory.
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory.
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration with an explicit environment. Useful for tests
    /// that must not touch global environment variables.
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let directory = config_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            directory.display()
        );

        let base = directory.join(CONFIG_BASENAME);
        let overlay = directory.join(format!("{CONFIG_BASENAME}.{environment}"));

        let config: CondoConfig = Config::builder()
            .add_source(File::from(base.as_path()).required(false))
            .add_source(File::from(overlay.as_path()).required(false))
            .add_source(
                Environment::with_prefix("CONDO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        debug!(
            environment = %environment,
            backend_url = %config.backend.url,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
        }))
    }

    pub fn config(&self) -> &CondoConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Configuration rendered for logs with the API key masked.
    pub fn debug_config(&self) -> Value {
        let mut value = serde_json::to_value(&self.config).unwrap_or_else(|_| json!({}));
        if let Some(backend) = value.get_mut("backend") {
            if let Some(api_key) = backend.get_mut("api_key") {
                if api_key.as_str().is_some_and(|k| !k.is_empty()) {
                    *api_key = json!("***");
                }
            }
        }
        value
    }

    /// Detect the runtime environment from environment variables.
    fn detect_environment() -> String {
        env::var("CONDO_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
    }
}
