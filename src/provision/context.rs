//! Explicit per-process provisioning context.

use super::error::ProvisionError;
use crate::catalog::{Location, PartnerPort};
use crate::client::{PollOptions, ProvisioningClient};
use crate::config::ProvisioningConfig;
use crate::resolve::{self, LocationQuery, PartnerPortQuery};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a reconciliation needs: the remote client, process-wide
/// settings and a cancellation token for the polling waits.
///
/// Built once per process and passed by reference into every operation.
#[derive(Clone)]
pub struct ProvisionContext {
    client: Arc<dyn ProvisioningClient>,
    settings: ProvisioningConfig,
    cancel: CancellationToken,
}

impl ProvisionContext {
    pub fn new(client: Arc<dyn ProvisioningClient>, settings: ProvisioningConfig) -> Self {
        Self {
            client,
            settings,
            cancel: CancellationToken::new(),
        }
    }

    pub fn client(&self) -> &dyn ProvisioningClient {
        self.client.as_ref()
    }

    pub fn settings(&self) -> &ProvisioningConfig {
        &self.settings
    }

    pub fn allow_destructive_delete(&self) -> bool {
        self.settings.allow_destructive_delete
    }

    /// Token cancelling every wait issued through this context.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Poll options for waiting on a new order.
    pub fn live_poll(&self) -> PollOptions {
        PollOptions {
            interval: self.settings.poll_interval(),
            timeout: Some(self.settings.provisioning_timeout()),
            cancel: self.cancel.child_token(),
        }
    }

    /// Poll options for waiting on an update.
    pub fn update_poll(&self) -> PollOptions {
        PollOptions {
            interval: self.settings.poll_interval(),
            timeout: Some(self.settings.update_timeout()),
            cancel: self.cancel.child_token(),
        }
    }

    /// Fetch the location catalog and resolve `query` against it.
    pub async fn resolve_location(&self, query: &LocationQuery) -> Result<Location, ProvisionError> {
        let catalog = self.client.list_locations().await?;
        Ok(resolve::resolve_location(&catalog, query)?.clone())
    }

    /// Fetch the partner-port catalog and resolve `query` against it.
    pub async fn resolve_partner_port(
        &self,
        query: &PartnerPortQuery,
    ) -> Result<PartnerPort, ProvisionError> {
        let catalog = self.client.list_partner_ports().await?;
        Ok(resolve::resolve_partner_port(&catalog, query)?.clone())
    }

    /// Fetch both catalogs and resolve the internet port in `metro`.
    pub async fn resolve_internet_port(
        &self,
        metro: &str,
        diversity_zone: Option<&str>,
    ) -> Result<PartnerPort, ProvisionError> {
        let locations = self.client.list_locations().await?;
        let catalog = self.client.list_partner_ports().await?;
        Ok(resolve::resolve_internet_port(&locations, &catalog, metro, diversity_zone)?.clone())
    }
}
