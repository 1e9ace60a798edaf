//! Cross-connect reconciliation.
//!
//! Create, read, update and delete of a virtual cross-connect between an
//! A-end product and either a plain product or a resolved partner port.

use super::context::ProvisionContext;
use super::csp::{check_settings_for_port, CspSettings};
use super::error::{ConflictError, ProvisionError};
use super::rederive::rederive_b_end;
use super::state::{LifecycleEvent, ProvisioningState};
use super::{advance, immutable, record_duration, submit_and_wait, submit_delete};
use crate::catalog::ConnectType;
use crate::client::{OrderRequest, ProductKind, VxcEndRecord, VxcOrder, VxcOrderEnd, VxcRecord, VxcUpdate};
use crate::resolve::PartnerPortQuery;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// What the B-end terminates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BEndTarget {
    /// A known product, by uid
    Product { product_uid: String },
    /// The partner port that `query` resolves to at create time
    Partner(PartnerPortQuery),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AEndConfig {
    pub product_uid: String,
    #[serde(default)]
    pub requested_vlan: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BEndConfig {
    pub target: BEndTarget,
    #[serde(default)]
    pub requested_vlan: Option<u16>,
}

/// Declared configuration of a cross-connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VxcConfig {
    pub name: String,
    /// Mbps
    pub rate_limit: u32,
    pub a_end: AEndConfig,
    pub b_end: BEndConfig,
    #[serde(default)]
    pub csp: Option<CspSettings>,
    #[serde(default)]
    pub cost_centre: Option<String>,
}

/// One end of a cross-connect as last read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VxcEndState {
    pub product_uid: String,
    pub product_name: String,
    pub location_id: u32,
    /// Declared VLAN, stable across reads
    pub requested_vlan: Option<u16>,
    /// VLAN the remote actually assigned
    pub assigned_vlan: Option<u16>,
}

/// Last-known state of a cross-connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VxcState {
    pub uid: String,
    pub name: String,
    pub rate_limit: u32,
    pub a_end: VxcEndState,
    pub b_end: VxcEndState,
    /// Orderable B-end product; for cloud connections this is the
    /// rederived equivalent, not necessarily `b_end.product_uid`
    pub b_end_requested_product_uid: String,
    /// Partner connect type, when the B-end is a partner port
    pub connect_type: Option<ConnectType>,
    /// Raw remote provisioning status
    pub provisioning_status: String,
    /// `None` when the remote status does not map onto the lifecycle
    pub state: Option<ProvisioningState>,
    pub locked: bool,
    pub admin_locked: bool,
    pub created_by: String,
    pub create_date: Option<DateTime<Utc>>,
    pub live_date: Option<DateTime<Utc>>,
    pub cost_centre: Option<String>,
    /// Declared CSP settings; the remote never echoes them
    pub csp: Option<CspSettings>,
}

impl VxcState {
    pub fn is_deleted(&self) -> bool {
        self.state == Some(ProvisioningState::Deleted)
    }
}

/// Create the connection and wait for it to go live.
///
/// A failure after the order is accepted leaves the remote object in place;
/// nothing is compensated.
pub async fn create_vxc(ctx: &ProvisionContext, config: &VxcConfig) -> Result<VxcState, ProvisionError> {
    let started = Instant::now();

    let (b_end_uid, connect_type) = match &config.b_end.target {
        BEndTarget::Partner(query) => {
            let port = ctx.resolve_partner_port(query).await?;
            let kind = port.kind();
            (port.product_uid, kind)
        }
        BEndTarget::Product { product_uid } => {
            let catalog = ctx.client().list_partner_ports().await?;
            let kind = catalog
                .iter()
                .find(|p| &p.product_uid == product_uid)
                .map(|p| p.kind())
                .unwrap_or(ConnectType::Other);
            (product_uid.clone(), kind)
        }
    };
    check_settings_for_port(config.csp.as_ref(), connect_type, &b_end_uid)?;

    let order = OrderRequest::Vxc(build_order(config, &b_end_uid));
    let uid = submit_and_wait(ctx, &order).await?;

    let result = read_vxc(ctx, &uid, Some(config)).await;
    record_duration("vxc_create", started);
    result
}

/// Read the connection.
///
/// Declared VLANs are kept as the requested values whatever the remote
/// reports; with nothing declared (first import) the remote-assigned VLANs
/// are adopted. Cloud connections get their B-end rederived.
pub async fn read_vxc(
    ctx: &ProvisionContext,
    uid: &str,
    declared: Option<&VxcConfig>,
) -> Result<VxcState, ProvisionError> {
    let record = ctx.client().get_vxc(uid).await?;

    let connect_type = record.csp_connect_type().map(ConnectType::parse);
    let b_end_requested_product_uid = match connect_type {
        Some(ct) if ct.is_cloud() => {
            let catalog = ctx.client().list_partner_ports().await?;
            rederive_b_end(&catalog, &record.b_end.product_uid)?
                .product_uid
                .clone()
        }
        _ => record.b_end.product_uid.clone(),
    };

    Ok(state_from_record(
        record,
        declared,
        connect_type,
        b_end_requested_product_uid,
    ))
}

/// Bring the connection in line with `declared`.
///
/// Local conflicts are raised before any remote call. When name, rate limit
/// or either VLAN differ, the full set is re-sent and the call waits for the
/// remote to reflect it.
pub async fn update_vxc(
    ctx: &ProvisionContext,
    prior: &VxcState,
    declared: &VxcConfig,
) -> Result<VxcState, ProvisionError> {
    check_update_conflicts(prior, declared)?;

    let Some(update) = pending_update(prior, declared) else {
        tracing::debug!(uid = %prior.uid, "Connection already matches declaration");
        return Ok(prior.clone());
    };

    let started = Instant::now();
    let updating = advance(&prior.uid, prior.state, LifecycleEvent::BeginUpdate)?;

    ctx.client().submit_update(&prior.uid, &update).await?;
    ctx.client()
        .wait_for_updated(&prior.uid, &update, &ctx.update_poll())
        .await?;
    advance(&prior.uid, Some(updating), LifecycleEvent::UpdateApplied)?;

    let result = read_vxc(ctx, &prior.uid, Some(declared)).await;
    record_duration("vxc_update", started);
    result
}

/// Submit the delete order without waiting for completion.
pub async fn delete_vxc(ctx: &ProvisionContext, uid: &str) -> Result<(), ProvisionError> {
    submit_delete(ctx, uid, ProductKind::Vxc, true).await
}

fn build_order(config: &VxcConfig, b_end_uid: &str) -> VxcOrder {
    VxcOrder {
        product_uid: config.a_end.product_uid.clone(),
        product_name: config.name.clone(),
        rate_limit: config.rate_limit,
        a_end: VxcOrderEnd {
            vlan: config.a_end.requested_vlan,
            ..VxcOrderEnd::default()
        },
        b_end: VxcOrderEnd {
            product_uid: Some(b_end_uid.to_string()),
            vlan: config.b_end.requested_vlan,
            partner_config: config.csp.clone(),
        },
        cost_centre: config.cost_centre.clone(),
    }
}

fn end_state(end: VxcEndRecord, declared_vlan: Option<u16>) -> VxcEndState {
    VxcEndState {
        requested_vlan: declared_vlan.or(end.vlan),
        assigned_vlan: end.vlan,
        product_uid: end.product_uid,
        product_name: end.product_name,
        location_id: end.location_id,
    }
}

fn state_from_record(
    record: VxcRecord,
    declared: Option<&VxcConfig>,
    connect_type: Option<ConnectType>,
    b_end_requested_product_uid: String,
) -> VxcState {
    let state = ProvisioningState::observed(&record.provisioning_status);

    VxcState {
        uid: record.product_uid,
        name: record.product_name,
        rate_limit: record.rate_limit,
        a_end: end_state(record.a_end, declared.and_then(|d| d.a_end.requested_vlan)),
        b_end: end_state(record.b_end, declared.and_then(|d| d.b_end.requested_vlan)),
        b_end_requested_product_uid,
        connect_type,
        provisioning_status: record.provisioning_status,
        state,
        locked: record.locked,
        admin_locked: record.admin_locked,
        created_by: record.created_by,
        create_date: record.create_date,
        live_date: record.live_date,
        cost_centre: record.cost_centre,
        csp: declared.and_then(|d| d.csp.clone()),
    }
}

/// Conflicts between `declared` and what was created, detectable locally.
pub fn check_update_conflicts(prior: &VxcState, declared: &VxcConfig) -> Result<(), ConflictError> {
    // The remote does not always echo the connect type back.
    let connect_type = prior
        .connect_type
        .or_else(|| declared.csp.as_ref().map(CspSettings::connect_type));
    if let Some(ct) = connect_type {
        if ct.has_preallocated_bandwidth() && prior.rate_limit != declared.rate_limit {
            return Err(ConflictError::RateLimitImmutable {
                uid: prior.uid.clone(),
                connect_type: ct,
                from: prior.rate_limit,
                to: declared.rate_limit,
            });
        }
    }
    if let Some(ct) = prior.connect_type {
        if let Some(csp) = &declared.csp {
            if csp.connect_type() != ct {
                return Err(ConflictError::CspSettingsMismatch {
                    declared: csp.connect_type(),
                    port: ct,
                });
            }
        }
    }

    immutable("a_end.product_uid", &prior.a_end.product_uid, &declared.a_end.product_uid)?;
    // Either the ordered product or its rederived equivalent is no change.
    if let BEndTarget::Product { product_uid } = &declared.b_end.target {
        if *product_uid != prior.b_end_requested_product_uid {
            immutable("b_end.product_uid", &prior.b_end.product_uid, product_uid)?;
        }
    }

    Ok(())
}

/// The update to send, or `None` when nothing the update call carries has
/// changed. An undeclared VLAN is no change.
pub fn pending_update(prior: &VxcState, declared: &VxcConfig) -> Option<VxcUpdate> {
    let vlan_changed = |declared: Option<u16>, prior: Option<u16>| {
        matches!(declared, Some(v) if Some(v) != prior)
    };

    let changed = declared.name != prior.name
        || declared.rate_limit != prior.rate_limit
        || vlan_changed(declared.a_end.requested_vlan, prior.a_end.requested_vlan)
        || vlan_changed(declared.b_end.requested_vlan, prior.b_end.requested_vlan);

    changed.then(|| VxcUpdate {
        name: declared.name.clone(),
        rate_limit: declared.rate_limit,
        a_end_vlan: declared.a_end.requested_vlan.or(prior.a_end.requested_vlan),
        b_end_vlan: declared.b_end.requested_vlan.or(prior.b_end.requested_vlan),
    })
}
