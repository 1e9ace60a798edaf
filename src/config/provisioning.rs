//! Reconciliation settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by every reconciliation in the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Issue physical-port deletes in destructive mode instead of safe mode
    pub allow_destructive_delete: bool,
    pub poll_interval_seconds: u64,
    /// Upper bound on waiting for a new order to go live
    pub provisioning_timeout_seconds: u64,
    /// Upper bound on waiting for an update to be applied
    pub update_timeout_seconds: u64,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            allow_destructive_delete: false,
            poll_interval_seconds: 10,
            provisioning_timeout_seconds: 1800,
            update_timeout_seconds: 900,
        }
    }
}

impl ProvisioningConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn provisioning_timeout(&self) -> Duration {
        Duration::from_secs(self.provisioning_timeout_seconds)
    }

    pub fn update_timeout(&self) -> Duration {
        Duration::from_secs(self.update_timeout_seconds)
    }
}
