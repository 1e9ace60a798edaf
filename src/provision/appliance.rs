//! Virtual network-function appliance lifecycle.
//!
//! Vendor configuration and the network-interface list are fixed once the
//! appliance is created. The remote never echoes vendor configuration back,
//! so the declared one is carried through reads.

use super::context::ProvisionContext;
use super::error::{ConflictError, ProvisionError};
use super::state::{LifecycleEvent, ProvisioningState};
use super::{advance, immutable, record_duration, submit_and_wait, submit_delete};
use crate::client::{
    MveOrder, NetworkInterfaceOrder, OrderRequest, ProductKind, ProductRecord, ProductUpdate,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Vendor image and bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "vendor", rename_all_fields = "camelCase")]
pub enum VendorConfig {
    #[serde(rename = "ARUBA")]
    Aruba {
        image_id: u32,
        account_name: String,
        account_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        system_tag: Option<String>,
    },
    #[serde(rename = "CISCO")]
    Cisco {
        image_id: u32,
        admin_ssh_public_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cloud_init: Option<String>,
    },
    #[serde(rename = "FORTINET")]
    Fortinet {
        image_id: u32,
        admin_ssh_public_key: String,
        license_data: String,
    },
    #[serde(rename = "PALO_ALTO")]
    PaloAlto {
        image_id: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        admin_ssh_public_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        admin_password_hash: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        license_data: Option<String>,
    },
    #[serde(rename = "VERSA")]
    Versa {
        image_id: u32,
        director_address: String,
        controller_address: String,
        local_auth: String,
        remote_auth: String,
        serial_number: String,
    },
    #[serde(rename = "VMWARE")]
    Vmware {
        image_id: u32,
        admin_ssh_public_key: String,
        vco_address: String,
        vco_activation_code: String,
    },
}

impl VendorConfig {
    pub fn vendor(&self) -> &'static str {
        match self {
            VendorConfig::Aruba { .. } => "ARUBA",
            VendorConfig::Cisco { .. } => "CISCO",
            VendorConfig::Fortinet { .. } => "FORTINET",
            VendorConfig::PaloAlto { .. } => "PALO_ALTO",
            VendorConfig::Versa { .. } => "VERSA",
            VendorConfig::Vmware { .. } => "VMWARE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceConfig {
    pub name: String,
    pub location_id: u32,
    /// SMALL, MEDIUM or LARGE
    pub size: String,
    pub vendor_config: VendorConfig,
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterface>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceState {
    pub uid: String,
    pub name: String,
    pub location_id: u32,
    pub size: String,
    /// Declared configuration, `None` after an import
    pub vendor_config: Option<VendorConfig>,
    pub network_interfaces: Vec<NetworkInterface>,
    pub provisioning_status: String,
    pub state: Option<ProvisioningState>,
    pub locked: bool,
    pub admin_locked: bool,
    pub created_by: String,
    pub create_date: Option<DateTime<Utc>>,
    pub live_date: Option<DateTime<Utc>>,
}

pub async fn create_appliance(
    ctx: &ProvisionContext,
    config: &ApplianceConfig,
) -> Result<ApplianceState, ProvisionError> {
    let started = Instant::now();
    let order = OrderRequest::Mve(MveOrder {
        product_name: config.name.clone(),
        location_id: config.location_id,
        mve_size: config.size.clone(),
        vendor_config: config.vendor_config.clone(),
        vnics: config
            .network_interfaces
            .iter()
            .map(|n| NetworkInterfaceOrder {
                description: n.description.clone(),
            })
            .collect(),
    });
    let uid = submit_and_wait(ctx, &order).await?;
    let result = read_appliance(ctx, &uid, Some(config)).await;
    record_duration("appliance_create", started);
    result
}

pub async fn read_appliance(
    ctx: &ProvisionContext,
    uid: &str,
    declared: Option<&ApplianceConfig>,
) -> Result<ApplianceState, ProvisionError> {
    let record = ctx.client().get_product(uid).await?;
    Ok(state_from_record(record, declared))
}

/// Rename the appliance. Any other declared change is a conflict.
pub async fn update_appliance(
    ctx: &ProvisionContext,
    prior: &ApplianceState,
    declared: &ApplianceConfig,
) -> Result<ApplianceState, ProvisionError> {
    check_appliance_conflicts(prior, declared)?;
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
        .submit_product_update(&prior.uid, ProductKind::Mve, &update)
        .await?;
    advance(&prior.uid, Some(updating), LifecycleEvent::UpdateApplied)?;
    read_appliance(ctx, &prior.uid, Some(declared)).await
}

pub async fn delete_appliance(ctx: &ProvisionContext, uid: &str) -> Result<(), ProvisionError> {
    submit_delete(ctx, uid, ProductKind::Mve, true).await
}

fn state_from_record(record: ProductRecord, declared: Option<&ApplianceConfig>) -> ApplianceState {
    let size = record
        .mve_size
        .clone()
        .or_else(|| declared.map(|d| d.size.clone()))
        .unwrap_or_default();

    ApplianceState {
        state: ProvisioningState::observed(&record.provisioning_status),
        uid: record.product_uid,
        name: record.product_name,
        location_id: record.location_id,
        size,
        vendor_config: declared.map(|d| d.vendor_config.clone()),
        network_interfaces: record
            .vnics
            .into_iter()
            .map(|n| NetworkInterface {
                description: n.description,
            })
            .collect(),
        provisioning_status: record.provisioning_status,
        locked: record.locked,
        admin_locked: record.admin_locked,
        created_by: record.created_by,
        create_date: record.create_date,
        live_date: record.live_date,
    }
}

pub fn check_appliance_conflicts(
    prior: &ApplianceState,
    declared: &ApplianceConfig,
) -> Result<(), ConflictError> {
    if let Some(created) = &prior.vendor_config {
        if created != &declared.vendor_config {
            return Err(ConflictError::UnsupportedApplianceChange {
                field: "vendor_config",
            });
        }
    }
    if prior.network_interfaces != declared.network_interfaces {
        return Err(ConflictError::UnsupportedApplianceChange {
            field: "network_interfaces",
        });
    }
    immutable("location_id", &prior.location_id, &declared.location_id)?;
    if !prior.size.eq_ignore_ascii_case(&declared.size) {
        return Err(ConflictError::ImmutableField {
            field: "size",
            from: prior.size.clone(),
            to: declared.size.clone(),
        });
    }
    Ok(())
}
