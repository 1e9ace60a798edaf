//! Configuration for the fabric provisioner
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`FABRIC_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use fabric::config::FabricConfig;
//!
//! let toml = r#"
//! [provisioning]
//! allow_destructive_delete = true
//! "#;
//! let config: FabricConfig = toml::from_str(toml).unwrap();
//! assert!(config.provisioning.allow_destructive_delete);
//! assert_eq!(config.provisioning.poll_interval_seconds, 10);
//! ```

pub mod api;
pub mod error;
pub mod logging;
pub mod provisioning;

pub use api::{ApiConfig, Environment};
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use provisioning::ProvisioningConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FabricConfig {
    /// Provisioning API connection
    pub api: ApiConfig,
    /// Reconciliation behaviour
    pub provisioning: ProvisioningConfig,
    pub logging: LoggingConfig,
}

impl FabricConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply `FABRIC_*` environment variable overrides.
    ///
    /// Invalid values are ignored and the prior value is kept.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(environment) = std::env::var("FABRIC_ENVIRONMENT") {
            if let Ok(e) = environment.parse() {
                self.api.environment = e;
            }
        }
        if let Ok(url) = std::env::var("FABRIC_BASE_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = Some(url);
            }
        }
        if let Ok(url) = std::env::var("FABRIC_AUTH_URL") {
            if !url.trim().is_empty() {
                self.api.auth_url = Some(url);
            }
        }

        if let Ok(level) = std::env::var("FABRIC_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FABRIC_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(destructive) = std::env::var("FABRIC_ALLOW_DESTRUCTIVE_DELETE") {
            match destructive.to_lowercase().as_str() {
                "true" | "1" => self.provisioning.allow_destructive_delete = true,
                "false" | "0" => self.provisioning.allow_destructive_delete = false,
                _ => {}
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.api.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::invalid(
                    "api.base_url",
                    "must be an http:// or https:// URL",
                ));
            }
        }
        if self.api.request_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "api.request_timeout_seconds",
                "timeout must be non-zero",
            ));
        }
        if self.api.access_key_env.trim().is_empty() {
            return Err(ConfigError::invalid("api.access_key_env", "cannot be empty"));
        }
        if self.api.secret_key_env.trim().is_empty() {
            return Err(ConfigError::invalid("api.secret_key_env", "cannot be empty"));
        }

        let provisioning = &self.provisioning;
        if provisioning.poll_interval_seconds == 0 {
            return Err(ConfigError::invalid(
                "provisioning.poll_interval_seconds",
                "interval must be non-zero",
            ));
        }
        if provisioning.provisioning_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "provisioning.provisioning_timeout_seconds",
                "timeout must be non-zero",
            ));
        }
        if provisioning.update_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "provisioning.update_timeout_seconds",
                "timeout must be non-zero",
            ));
        }

        Ok(())
    }
}
