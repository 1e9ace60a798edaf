//! Request and response records exchanged with the provisioning API.

use crate::provision::appliance::VendorConfig;
use crate::provision::csp::CspSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Orderable product families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductKind {
    /// Physical port
    #[serde(rename = "MEGAPORT")]
    Port,
    /// Virtual router
    #[serde(rename = "MCR2")]
    Mcr,
    /// Virtual network-function appliance
    #[serde(rename = "MVE")]
    Mve,
    /// Virtual cross-connect
    #[serde(rename = "VXC")]
    Vxc,
}

impl ProductKind {
    /// Path segment used by product endpoints.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ProductKind::Port => "megaport",
            ProductKind::Mcr => "mcr2",
            ProductKind::Mve => "mve",
            ProductKind::Vxc => "vxc",
        }
    }
}

/// A new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "productType")]
pub enum OrderRequest {
    #[serde(rename = "MEGAPORT")]
    Port(PortOrder),
    #[serde(rename = "MCR2")]
    Mcr(McrOrder),
    #[serde(rename = "MVE")]
    Mve(MveOrder),
    #[serde(rename = "VXC")]
    Vxc(VxcOrder),
}

impl OrderRequest {
    pub fn kind(&self) -> ProductKind {
        match self {
            OrderRequest::Port(_) => ProductKind::Port,
            OrderRequest::Mcr(_) => ProductKind::Mcr,
            OrderRequest::Mve(_) => ProductKind::Mve,
            OrderRequest::Vxc(_) => ProductKind::Vxc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortOrder {
    pub product_name: String,
    pub location_id: u32,
    pub port_speed: u32,
    pub term: u32,
    pub market_place_visibility: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diversity_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_centre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McrOrder {
    pub product_name: String,
    pub location_id: u32,
    pub port_speed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcr_asn: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MveOrder {
    pub product_name: String,
    pub location_id: u32,
    pub mve_size: String,
    pub vendor_config: VendorConfig,
    pub vnics: Vec<NetworkInterfaceOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceOrder {
    pub description: String,
}

/// Cross-connect order from an A-end product to a B-end product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VxcOrder {
    /// A-end product the connection hangs off
    pub product_uid: String,
    pub product_name: String,
    pub rate_limit: u32,
    pub a_end: VxcOrderEnd,
    pub b_end: VxcOrderEnd,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_centre: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VxcOrderEnd {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_config: Option<CspSettings>,
}

/// Full update of a cross-connect.
///
/// The update call is not field-granular: every field is re-sent at its
/// current declared value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VxcUpdate {
    pub name: String,
    pub rate_limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a_end_vlan: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b_end_vlan: Option<u16>,
}

impl VxcUpdate {
    /// True when `record` reflects every field of this update.
    pub fn is_applied_to(&self, record: &VxcRecord) -> bool {
        record.product_name == self.name
            && record.rate_limit == self.rate_limit
            && self.a_end_vlan.is_none_or(|v| record.a_end.vlan == Some(v))
            && self.b_end_vlan.is_none_or(|v| record.b_end.vlan == Some(v))
    }
}

/// Update of a port, router or appliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_centre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_place_visibility: Option<bool>,
}

/// One end of a cross-connect as reported by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VxcEndRecord {
    pub product_uid: String,
    pub product_name: String,
    pub location_id: u32,
    /// Remote-assigned VLAN
    pub vlan: Option<u16>,
    pub owner_uid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CspConnectionRecord {
    pub connect_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VxcResources {
    pub csp_connection: Option<CspConnectionRecord>,
}

/// Cross-connect details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VxcRecord {
    pub product_uid: String,
    pub product_name: String,
    pub rate_limit: u32,
    pub provisioning_status: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub admin_locked: bool,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub create_date: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub live_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cost_centre: Option<String>,
    pub a_end: VxcEndRecord,
    pub b_end: VxcEndRecord,
    #[serde(default)]
    pub resources: VxcResources,
}

impl VxcRecord {
    /// Partner-side connect type, when the B-end is a cloud on-ramp.
    pub fn csp_connect_type(&self) -> Option<&str> {
        self.resources
            .csp_connection
            .as_ref()
            .map(|c| c.connect_type.as_str())
            .filter(|ct| !ct.is_empty())
    }
}

/// Port, router or appliance details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub product_uid: String,
    pub product_name: String,
    pub product_type: ProductKind,
    pub location_id: u32,
    #[serde(default)]
    pub port_speed: u32,
    pub provisioning_status: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub admin_locked: bool,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub create_date: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub live_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contract_term_months: u32,
    #[serde(default)]
    pub market_place_visibility: bool,
    #[serde(default)]
    pub diversity_zone: Option<String>,
    #[serde(default)]
    pub cost_centre: Option<String>,
    #[serde(default)]
    pub mcr_asn: Option<u32>,
    #[serde(default)]
    pub mve_size: Option<String>,
    #[serde(default)]
    pub vnics: Vec<NetworkInterfaceOrder>,
}
