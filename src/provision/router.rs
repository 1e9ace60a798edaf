//! Virtual router lifecycle.

use super::context::ProvisionContext;
use super::error::{ConflictError, ProvisionError};
use super::state::{LifecycleEvent, ProvisioningState};
use super::{advance, immutable, record_duration, submit_and_wait, submit_delete};
use crate::client::{McrOrder, OrderRequest, ProductKind, ProductRecord, ProductUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    pub name: String,
    pub location_id: u32,
    /// Mbps, fixed at creation
    pub port_speed: u32,
    /// Fixed at creation; the remote picks one when unset
    #[serde(default)]
    pub asn: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterState {
    pub uid: String,
    pub name: String,
    pub location_id: u32,
    pub port_speed: u32,
    pub asn: Option<u32>,
    pub provisioning_status: String,
    pub state: Option<ProvisioningState>,
    pub locked: bool,
    pub admin_locked: bool,
    pub created_by: String,
    pub create_date: Option<DateTime<Utc>>,
    pub live_date: Option<DateTime<Utc>>,
}

impl From<ProductRecord> for RouterState {
    fn from(record: ProductRecord) -> Self {
        Self {
            state: ProvisioningState::observed(&record.provisioning_status),
            uid: record.product_uid,
            name: record.product_name,
            location_id: record.location_id,
            port_speed: record.port_speed,
            asn: record.mcr_asn,
            provisioning_status: record.provisioning_status,
            locked: record.locked,
            admin_locked: record.admin_locked,
            created_by: record.created_by,
            create_date: record.create_date,
            live_date: record.live_date,
        }
    }
}

pub async fn create_router(
    ctx: &ProvisionContext,
    config: &RouterConfig,
) -> Result<RouterState, ProvisionError> {
    let started = Instant::now();
    let order = OrderRequest::Mcr(McrOrder {
        product_name: config.name.clone(),
        location_id: config.location_id,
        port_speed: config.port_speed,
        mcr_asn: config.asn,
    });
    let uid = submit_and_wait(ctx, &order).await?;
    let result = read_router(ctx, &uid).await;
    record_duration("router_create", started);
    result
}

pub async fn read_router(ctx: &ProvisionContext, uid: &str) -> Result<RouterState, ProvisionError> {
    Ok(ctx.client().get_product(uid).await?.into())
}

/// Rename the router; nothing else is updatable.
pub async fn update_router(
    ctx: &ProvisionContext,
    prior: &RouterState,
    declared: &RouterConfig,
) -> Result<RouterState, ProvisionError> {
    check_router_conflicts(prior, declared)?;
    if declared.name == prior.name {
        return Ok(prior.clone());
    }

    let updating = advance(&prior.uid, prior.state, LifecycleEvent::BeginUpdate)?;
    let update = ProductUpdate {
        name: declared.name.clone(),
        cost_centre: None,
        market_place_visibility: None,
    };
    ctx.client()
        .submit_product_update(&prior.uid, ProductKind::Mcr, &update)
        .await?;
    advance(&prior.uid, Some(updating), LifecycleEvent::UpdateApplied)?;
    read_router(ctx, &prior.uid).await
}

pub async fn delete_router(ctx: &ProvisionContext, uid: &str) -> Result<(), ProvisionError> {
    submit_delete(ctx, uid, ProductKind::Mcr, true).await
}

pub fn check_router_conflicts(prior: &RouterState, declared: &RouterConfig) -> Result<(), ConflictError> {
    immutable("location_id", &prior.location_id, &declared.location_id)?;
    immutable("port_speed", &prior.port_speed, &declared.port_speed)?;
    // An undeclared ASN accepts whatever the remote assigned.
    match (prior.asn, declared.asn) {
        (Some(created), Some(wanted)) => immutable("asn", &created, &wanted),
        (None, Some(wanted)) => Err(ConflictError::ImmutableField {
            field: "asn",
            from: "unset".to_string(),
            to: wanted.to_string(),
        }),
        (_, None) => Ok(()),
    }
}
