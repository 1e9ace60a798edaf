//! Provisioning API connection settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which API deployment to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Development,
}

impl Environment {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.megaport.com",
            Environment::Staging => "https://api-staging.megaport.com",
            Environment::Development => "https://api-mpone-dev.megaport.com",
        }
    }

    pub fn default_auth_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://auth-m2m.megaport.com/oauth2/token",
            Environment::Staging => "https://auth-m2m-staging.megaport.com/oauth2/token",
            Environment::Development => "https://auth-m2m-mpone-dev.megaport.com/oauth2/token",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" | "dev" => Ok(Environment::Development),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Development => "development",
        };
        f.write_str(s)
    }
}

/// API connection configuration.
///
/// Credentials never live in the file; only the names of the environment
/// variables holding them do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub environment: Environment,
    /// Overrides the environment's API URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Overrides the environment's token endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    pub access_key_env: String,
    pub secret_key_env: String,
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            base_url: None,
            auth_url: None,
            access_key_env: "FABRIC_ACCESS_KEY".to_string(),
            secret_key_env: "FABRIC_SECRET_KEY".to_string(),
            request_timeout_seconds: 60,
        }
    }
}

impl ApiConfig {
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.environment.default_base_url().to_string())
    }

    pub fn resolved_auth_url(&self) -> String {
        self.auth_url
            .clone()
            .unwrap_or_else(|| self.environment.default_auth_url().to_string())
    }
}
