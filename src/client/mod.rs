//! Provisioning API collaborator.
//!
//! This module provides the `ProvisioningClient` trait that resolvers and
//! reconcilers depend on, together with the request/response records it
//! exchanges and the polling primitive behind the `wait_for_*` calls.

use async_trait::async_trait;

pub mod error;
pub mod http;
pub mod poll;
pub mod types;

pub use error::ClientError;
pub use http::HttpProvisioningClient;
pub use poll::{poll_until, PollOptions, PollStatus};
pub use types::{
    McrOrder, MveOrder, NetworkInterfaceOrder, OrderRequest, PortOrder, ProductKind,
    ProductRecord, ProductUpdate, VxcEndRecord, VxcOrder, VxcOrderEnd, VxcRecord, VxcUpdate,
};

use crate::catalog::{Location, PartnerPort};
use crate::provision::state::{ProvisioningState, RemoteStatus};

/// Remote catalog and ordering interface.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as
/// `Arc<dyn ProvisioningClient>`.
///
/// # Errors
///
/// Every method surfaces remote failures as [`ClientError`] with the remote
/// message intact. Nothing is retried.
#[async_trait]
pub trait ProvisioningClient: Send + Sync + 'static {
    // ========================================================================
    // Catalog
    // ========================================================================

    /// Full location catalog, in catalog order.
    async fn list_locations(&self) -> Result<Vec<Location>, ClientError>;

    /// Full partner-port catalog, in catalog order.
    async fn list_partner_ports(&self) -> Result<Vec<PartnerPort>, ClientError>;

    // ========================================================================
    // Orders
    // ========================================================================

    /// Submit a new order and return the identity the remote assigned.
    async fn submit_order(&self, order: &OrderRequest) -> Result<String, ClientError>;

    /// Submit a full update of a cross-connect.
    async fn submit_update(&self, uid: &str, update: &VxcUpdate) -> Result<(), ClientError>;

    /// Submit an update of a port, router or appliance.
    async fn submit_product_update(
        &self,
        uid: &str,
        kind: ProductKind,
        update: &ProductUpdate,
    ) -> Result<(), ClientError>;

    /// Submit a delete order. `destructive: false` asks for a safe delete
    /// that the remote may refuse or soft-delete.
    async fn submit_delete(&self, uid: &str, destructive: bool) -> Result<(), ClientError>;

    // ========================================================================
    // Details
    // ========================================================================

    async fn get_vxc(&self, uid: &str) -> Result<VxcRecord, ClientError>;

    async fn get_product(&self, uid: &str) -> Result<ProductRecord, ClientError>;

    /// Current remote provisioning status string of `uid`.
    async fn provisioning_status(&self, uid: &str, kind: ProductKind) -> Result<String, ClientError> {
        match kind {
            ProductKind::Vxc => Ok(self.get_vxc(uid).await?.provisioning_status),
            _ => Ok(self.get_product(uid).await?.provisioning_status),
        }
    }

    // ========================================================================
    // Waits
    // ========================================================================

    /// Poll until `uid` reports live, or a provisioning failure.
    async fn wait_for_live(
        &self,
        uid: &str,
        kind: ProductKind,
        options: &PollOptions,
    ) -> Result<(), ClientError> {
        poll_until(uid, options, || async move {
            let status = self.provisioning_status(uid, kind).await?;
            Ok(match ProvisioningState::from_remote(&status) {
                RemoteStatus::State(ProvisioningState::Live) => PollStatus::Done,
                RemoteStatus::Failed | RemoteStatus::State(ProvisioningState::Deleted) => {
                    PollStatus::Failed(status)
                }
                _ => PollStatus::Pending(status),
            })
        })
        .await
    }

    /// Poll until the cross-connect reflects every field of `expected`.
    async fn wait_for_updated(
        &self,
        uid: &str,
        expected: &VxcUpdate,
        options: &PollOptions,
    ) -> Result<(), ClientError> {
        poll_until(uid, options, || async move {
            let record = self.get_vxc(uid).await?;
            Ok(match ProvisioningState::from_remote(&record.provisioning_status) {
                RemoteStatus::Failed => PollStatus::Failed(record.provisioning_status),
                _ if expected.is_applied_to(&record) => PollStatus::Done,
                _ => PollStatus::Pending(record.provisioning_status),
            })
        })
        .await
    }
}
