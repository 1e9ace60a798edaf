//! Shared test utilities for fabric integration tests.
//!
//! Provides an in-memory provisioning API that records every call, plus
//! catalog builders.

#![allow(dead_code)]

use async_trait::async_trait;
use fabric::catalog::{Location, PartnerPort};
use fabric::client::{
    ClientError, OrderRequest, ProductKind, ProductRecord, ProductUpdate, ProvisioningClient,
    VxcEndRecord, VxcRecord, VxcUpdate,
};
use fabric::client::types::{CspConnectionRecord, VxcResources};
use fabric::config::ProvisioningConfig;
use fabric::provision::ProvisionContext;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

// =============================================================================
// Catalog Builders
// =============================================================================

pub fn make_location(id: u32, name: &str, metro: &str, market_code: &str, has_mcr: bool) -> Location {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "metro": metro,
        "marketCode": market_code,
        "hasMcr": has_mcr,
        "status": "Active"
    }))
    .unwrap()
}

pub fn make_partner_port(
    uid: &str,
    product_name: &str,
    connect_type: &str,
    location_id: u32,
    zone: Option<&str>,
    vxc_permitted: bool,
) -> PartnerPort {
    PartnerPort {
        product_uid: uid.to_string(),
        product_name: product_name.to_string(),
        company_name: match connect_type {
            "AWS" | "AWSHC" => "AWS".to_string(),
            "GOOGLE" => "Google".to_string(),
            "TRANSIT" => "Megaport".to_string(),
            other => other.to_string(),
        },
        company_uid: String::new(),
        connect_type: connect_type.to_string(),
        location_id,
        diversity_zone: zone.map(str::to_string),
        vxc_permitted,
        speed: 10000,
    }
}

/// Sydney-flavoured catalog used by most tests.
pub fn sydney_locations() -> Vec<Location> {
    vec![
        make_location(3, "Equinix SY1", "Sydney", "AU", true),
        make_location(4, "Equinix SY3", "Sydney", "AU", true),
        make_location(5, "Global Switch Sydney", "Sydney", "AU", false),
        make_location(60, "Equinix SV1", "San Jose", "US", true),
    ]
}

pub fn sydney_partner_ports() -> Vec<PartnerPort> {
    vec![
        make_partner_port("aws-hc-red", "Asia Pacific (Sydney) (ap-southeast-2)", "AWSHC", 3, Some("red"), true),
        make_partner_port("aws-hc-blue", "Asia Pacific (Sydney) (ap-southeast-2)", "AWSHC", 3, Some("blue"), true),
        // Same identity as aws-hc-red but no longer orderable
        make_partner_port("aws-hc-legacy", "Asia Pacific (Sydney) (ap-southeast-2)", "AWSHC", 3, Some("red"), false),
        make_partner_port("aws-vif", "Asia Pacific (Sydney) (ap-southeast-2)", "AWS", 3, None, true),
        make_partner_port("google-syd", "Sydney (australia-southeast1)", "GOOGLE", 4, None, true),
        make_partner_port("transit-sy1", "Internet Transit SY1", "TRANSIT", 3, Some("red"), true),
        make_partner_port("transit-sy3", "Internet Transit SY3", "TRANSIT", 4, Some("blue"), true),
    ]
}

// =============================================================================
// In-Memory Provisioning API
// =============================================================================

/// A call observed by [`MockFabric`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListLocations,
    ListPartnerPorts,
    SubmitOrder(OrderRequest),
    SubmitUpdate(String, VxcUpdate),
    SubmitProductUpdate(String, ProductKind, ProductUpdate),
    SubmitDelete(String, bool),
    GetVxc(String),
    GetProduct(String),
}

impl Call {
    /// True for calls that change remote state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::SubmitOrder(_)
                | Call::SubmitUpdate(..)
                | Call::SubmitProductUpdate(..)
                | Call::SubmitDelete(..)
        )
    }
}

/// Provisioning API that applies orders instantly and records every call.
///
/// New cross-connects get VLANs 1000+ when none are requested; every order
/// goes live on the first status poll.
pub struct MockFabric {
    pub locations: Mutex<Vec<Location>>,
    pub partner_ports: Mutex<Vec<PartnerPort>>,
    vxcs: Mutex<HashMap<String, VxcRecord>>,
    products: Mutex<HashMap<String, ProductRecord>>,
    calls: Mutex<Vec<Call>>,
    next_uid: AtomicU32,
    /// Status reported for new orders
    pub initial_status: Mutex<String>,
}

impl MockFabric {
    pub fn new(locations: Vec<Location>, partner_ports: Vec<PartnerPort>) -> Self {
        Self {
            locations: Mutex::new(locations),
            partner_ports: Mutex::new(partner_ports),
            vxcs: Mutex::new(HashMap::new()),
            products: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            next_uid: AtomicU32::new(1),
            initial_status: Mutex::new("LIVE".to_string()),
        }
    }

    pub fn sydney() -> Self {
        Self::new(sydney_locations(), sydney_partner_ports())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Seed an existing cross-connect.
    pub fn insert_vxc(&self, record: VxcRecord) {
        self.vxcs
            .lock()
            .unwrap()
            .insert(record.product_uid.clone(), record);
    }

    pub fn insert_product(&self, record: ProductRecord) {
        self.products
            .lock()
            .unwrap()
            .insert(record.product_uid.clone(), record);
    }

    pub fn vxc(&self, uid: &str) -> Option<VxcRecord> {
        self.vxcs.lock().unwrap().get(uid).cloned()
    }

    /// Overwrite the reported B-end product of a cross-connect.
    pub fn set_reported_b_end(&self, uid: &str, product_uid: &str) {
        if let Some(record) = self.vxcs.lock().unwrap().get_mut(uid) {
            record.b_end.product_uid = product_uid.to_string();
        }
    }

    /// Drop the provider resources the remote echoes for a cross-connect.
    pub fn clear_resources(&self, uid: &str) {
        if let Some(record) = self.vxcs.lock().unwrap().get_mut(uid) {
            record.resources = Default::default();
        }
    }

        fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn allocate_uid(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_uid.fetch_add(1, Ordering::SeqCst))
    }

    fn status(&self) -> String {
        self.initial_status.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProvisioningClient for MockFabric {
    async fn list_locations(&self) -> Result<Vec<Location>, ClientError> {
        self.record(Call::ListLocations);
        Ok(self.locations.lock().unwrap().clone())
    }

    async fn list_partner_ports(&self) -> Result<Vec<PartnerPort>, ClientError> {
        self.record(Call::ListPartnerPorts);
        Ok(self.partner_ports.lock().unwrap().clone())
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<String, ClientError> {
        self.record(Call::SubmitOrder(order.clone()));

        match order {
            OrderRequest::Vxc(vxc) => {
                let uid = self.allocate_uid("vxc");
                let b_end_uid = vxc.b_end.product_uid.clone().unwrap_or_default();
                let connect_type = self
                    .partner_ports
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|p| p.product_uid == b_end_uid)
                    .map(|p| p.connect_type.clone());

                self.insert_vxc(VxcRecord {
                    product_uid: uid.clone(),
                    product_name: vxc.product_name.clone(),
                    rate_limit: vxc.rate_limit,
                    provisioning_status: self.status(),
                    locked: false,
                    admin_locked: false,
                    created_by: "test@example.com".to_string(),
                    create_date: None,
                    live_date: None,
                    cost_centre: vxc.cost_centre.clone(),
                    a_end: VxcEndRecord {
                        product_uid: vxc.product_uid.clone(),
                        vlan: Some(vxc.a_end.vlan.unwrap_or(1000)),
                        ..VxcEndRecord::default()
                    },
                    b_end: VxcEndRecord {
                        product_uid: b_end_uid,
                        vlan: Some(vxc.b_end.vlan.unwrap_or(1001)),
                        ..VxcEndRecord::default()
                    },
                    resources: VxcResources {
                        csp_connection: connect_type.map(|connect_type| CspConnectionRecord { connect_type }),
                    },
                });
                Ok(uid)
            }
            other => {
                let (prefix, json) = match other {
                    OrderRequest::Port(p) => ("port", serde_json::json!({
                        "productName": p.product_name,
                        "productType": "MEGAPORT",
                        "locationId": p.location_id,
                        "portSpeed": p.port_speed,
                        "contractTermMonths": p.term,
                        "marketPlaceVisibility": p.market_place_visibility,
                        "diversityZone": p.diversity_zone,
                        "costCentre": p.cost_centre,
                    })),
                    OrderRequest::Mcr(m) => ("mcr", serde_json::json!({
                        "productName": m.product_name,
                        "productType": "MCR2",
                        "locationId": m.location_id,
                        "portSpeed": m.port_speed,
                        "mcrAsn": m.mcr_asn.unwrap_or(133937),
                    })),
                    OrderRequest::Mve(m) => ("mve", serde_json::json!({
                        "productName": m.product_name,
                        "productType": "MVE",
                        "locationId": m.location_id,
                        "mveSize": m.mve_size,
                        "vnics": m.vnics,
                    })),
                    OrderRequest::Vxc(_) => unreachable!(),
                };
                let uid = self.allocate_uid(prefix);
                let mut json = json;
                json["productUid"] = serde_json::Value::String(uid.clone());
                json["provisioningStatus"] = serde_json::Value::String(self.status());
                self.insert_product(serde_json::from_value(json).unwrap());
                Ok(uid)
            }
        }
    }

    async fn submit_update(&self, uid: &str, update: &VxcUpdate) -> Result<(), ClientError> {
        self.record(Call::SubmitUpdate(uid.to_string(), update.clone()));
        let mut vxcs = self.vxcs.lock().unwrap();
        let record = vxcs.get_mut(uid).ok_or_else(|| not_found(uid))?;
        record.product_name = update.name.clone();
        record.rate_limit = update.rate_limit;
        if update.a_end_vlan.is_some() {
            record.a_end.vlan = update.a_end_vlan;
        }
        if update.b_end_vlan.is_some() {
            record.b_end.vlan = update.b_end_vlan;
        }
        Ok(())
    }

    async fn submit_product_update(
        &self,
        uid: &str,
        kind: ProductKind,
        update: &ProductUpdate,
    ) -> Result<(), ClientError> {
        self.record(Call::SubmitProductUpdate(uid.to_string(), kind, update.clone()));
        let mut products = self.products.lock().unwrap();
        let record = products.get_mut(uid).ok_or_else(|| not_found(uid))?;
        record.product_name = update.name.clone();
        if update.cost_centre.is_some() {
            record.cost_centre = update.cost_centre.clone();
        }
        if let Some(visible) = update.market_place_visibility {
            record.market_place_visibility = visible;
        }
        Ok(())
    }

    async fn submit_delete(&self, uid: &str, destructive: bool) -> Result<(), ClientError> {
        self.record(Call::SubmitDelete(uid.to_string(), destructive));
        if let Some(record) = self.vxcs.lock().unwrap().get_mut(uid) {
            record.provisioning_status = "DECOMMISSIONED".to_string();
            return Ok(());
        }
        if let Some(record) = self.products.lock().unwrap().get_mut(uid) {
            record.provisioning_status = "DECOMMISSIONED".to_string();
            return Ok(());
        }
        Err(not_found(uid))
    }

    async fn get_vxc(&self, uid: &str) -> Result<VxcRecord, ClientError> {
        self.record(Call::GetVxc(uid.to_string()));
        self.vxc(uid).ok_or_else(|| not_found(uid))
    }

    async fn get_product(&self, uid: &str) -> Result<ProductRecord, ClientError> {
        self.record(Call::GetProduct(uid.to_string()));
        self.products
            .lock()
            .unwrap()
            .get(uid)
            .cloned()
            .ok_or_else(|| not_found(uid))
    }
}

fn not_found(uid: &str) -> ClientError {
    ClientError::Upstream {
        status: 404,
        message: format!("Could not find a service with UID {}", uid),
    }
}

// =============================================================================
// Context Builders
// =============================================================================

/// Fast-polling settings for tests.
pub fn test_settings() -> ProvisioningConfig {
    ProvisioningConfig {
        allow_destructive_delete: false,
        poll_interval_seconds: 1,
        provisioning_timeout_seconds: 5,
        update_timeout_seconds: 5,
    }
}

pub fn make_context(fabric: Arc<MockFabric>) -> ProvisionContext {
    ProvisionContext::new(fabric, test_settings())
}

pub fn make_context_with(fabric: Arc<MockFabric>, settings: ProvisioningConfig) -> ProvisionContext {
    ProvisionContext::new(fabric, settings)
}
