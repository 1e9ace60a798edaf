//! Physical port lifecycle.

use super::context::ProvisionContext;
use super::error::{ConflictError, ProvisionError};
use super::state::{LifecycleEvent, ProvisioningState};
use super::{advance, immutable, record_duration, submit_and_wait, submit_delete};
use crate::client::{OrderRequest, PortOrder, ProductKind, ProductRecord, ProductUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Declared configuration of a physical port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConfig {
    pub name: String,
    pub location_id: u32,
    /// Mbps, fixed at creation
    pub speed: u32,
    /// Contract term in months, fixed at creation
    pub term: u32,
    #[serde(default)]
    pub marketplace_visibility: bool,
    #[serde(default)]
    pub diversity_zone: Option<String>,
    #[serde(default)]
    pub cost_centre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortState {
    pub uid: String,
    pub name: String,
    pub location_id: u32,
    pub speed: u32,
    pub term: u32,
    pub marketplace_visibility: bool,
    pub diversity_zone: Option<String>,
    pub cost_centre: Option<String>,
    pub provisioning_status: String,
    pub state: Option<ProvisioningState>,
    pub locked: bool,
    pub admin_locked: bool,
    pub created_by: String,
    pub create_date: Option<DateTime<Utc>>,
    pub live_date: Option<DateTime<Utc>>,
}

impl From<ProductRecord> for PortState {
    fn from(record: ProductRecord) -> Self {
        Self {
            state: ProvisioningState::observed(&record.provisioning_status),
            uid: record.product_uid,
            name: record.product_name,
            location_id: record.location_id,
            speed: record.port_speed,
            term: record.contract_term_months,
            marketplace_visibility: record.market_place_visibility,
            diversity_zone: record.diversity_zone,
            cost_centre: record.cost_centre,
            provisioning_status: record.provisioning_status,
            locked: record.locked,
            admin_locked: record.admin_locked,
            created_by: record.created_by,
            create_date: record.create_date,
            live_date: record.live_date,
        }
    }
}

pub async fn create_port(ctx: &ProvisionContext, config: &PortConfig) -> Result<PortState, ProvisionError> {
    let started = Instant::now();
    let order = OrderRequest::Port(PortOrder {
        product_name: config.name.clone(),
        location_id: config.location_id,
        port_speed: config.speed,
        term: config.term,
        market_place_visibility: config.marketplace_visibility,
        diversity_zone: config.diversity_zone.clone(),
        cost_centre: config.cost_centre.clone(),
    });
    let uid = submit_and_wait(ctx, &order).await?;
    let result = read_port(ctx, &uid).await;
    record_duration("port_create", started);
    result
}

pub async fn read_port(ctx: &ProvisionContext, uid: &str) -> Result<PortState, ProvisionError> {
    Ok(ctx.client().get_product(uid).await?.into())
}

/// Apply name, marketplace visibility and cost centre changes.
pub async fn update_port(
    ctx: &ProvisionContext,
    prior: &PortState,
    declared: &PortConfig,
) -> Result<PortState, ProvisionError> {
    check_port_conflicts(prior, declared)?;

    if declared.name == prior.name
        && declared.marketplace_visibility == prior.marketplace_visibility
        && declared.cost_centre == prior.cost_centre
    {
        return Ok(prior.clone());
    }

    let updating = advance(&prior.uid, prior.state, LifecycleEvent::BeginUpdate)?;
    let update = ProductUpdate {
        name: declared.name.clone(),
        cost_centre: declared.cost_centre.clone(),
        market_place_visibility: Some(declared.marketplace_visibility),
    };
    ctx.client()
        .submit_product_update(&prior.uid, ProductKind::Port, &update)
        .await?;
    advance(&prior.uid, Some(updating), LifecycleEvent::UpdateApplied)?;
    read_port(ctx, &prior.uid).await
}

/// Submit the delete order, destructive only when the context allows it.
pub async fn delete_port(ctx: &ProvisionContext, uid: &str) -> Result<(), ProvisionError> {
    let destructive = ctx.allow_destructive_delete();
    if !destructive {
        tracing::warn!(uid, "Destructive delete not allowed, requesting safe delete");
    }
    submit_delete(ctx, uid, ProductKind::Port, destructive).await
}

pub fn check_port_conflicts(prior: &PortState, declared: &PortConfig) -> Result<(), ConflictError> {
    immutable("location_id", &prior.location_id, &declared.location_id)?;
    immutable("speed", &prior.speed, &declared.speed)?;
    immutable("term", &prior.term, &declared.term)
}
