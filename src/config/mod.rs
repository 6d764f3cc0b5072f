//! Configuration system.
//!
//! Typed configuration loaded from TOML files with environment-variable
//! overrides. Every section has explicit defaults, and the loaded result is
//! validated before use; there are no silent fallbacks at call sites.

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring `config/condo-core.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CondoConfig {
    /// Backing service connection (tables + auth endpoints)
    pub backend: BackendConfig,

    /// Permission enforcement settings
    pub auth: AuthConfig,

    /// Dialog workflow settings
    pub workflow: WorkflowConfig,

    /// Outcome notification settings
    pub events: EventsConfig,
}

impl CondoConfig {
    /// Reject configurations that cannot possibly work.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend.url.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "backend.url",
                self.backend.url.clone(),
                "backing service URL must not be empty",
            ));
        }
        if !self.backend.url.starts_with("http://") && !self.backend.url.starts_with("https://") {
            return Err(ConfigurationError::invalid_value(
                "backend.url",
                self.backend.url.clone(),
                "backing service URL must be http(s)",
            ));
        }
        if self.backend.timeout_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "backend.timeout_seconds",
                self.backend.timeout_seconds.to_string(),
                "timeout must be positive",
            ));
        }
        if self.events.channel_capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "events.channel_capacity",
                self.events.channel_capacity.to_string(),
                "channel capacity must be positive",
            ));
        }
        Ok(())
    }
}

/// Backing service connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project base URL; `/rest/v1` and `/auth/v1` hang off it
    pub url: String,
    /// Anonymous API key sent as `apikey` and bearer token
    pub api_key: String,
    /// Per-request timeout for table and auth calls
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:54321".to_string(),
            api_key: String::new(),
            timeout_seconds: 10,
        }
    }
}

/// Permission enforcement configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Require an admin session for mutating user operations
    pub enforce_admin: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enforce_admin: true,
        }
    }
}

/// Dialog workflow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Route condominium saves through the confirmation prompt
    pub confirm_condominios: bool,
    /// Route user saves through the confirmation prompt
    pub confirm_usuarios: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            confirm_condominios: false,
            confirm_usuarios: true,
        }
    }
}

/// Outcome notification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity for outcome events
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CondoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend.timeout_seconds, 10);
        assert!(config.auth.enforce_admin);
        assert!(config.workflow.confirm_usuarios);
        assert!(!config.workflow.confirm_condominios);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CondoConfig::default();
        config.backend.url = "ftp://example".to_string();
        assert!(config.validate().is_err());

        let mut config = CondoConfig::default();
        config.backend.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = CondoConfig::default();
        config.events.channel_capacity = 0;
        assert!(config.validate().is_err());
    }
}
