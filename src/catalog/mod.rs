//! Remote catalog entries.
//!
//! Locations and partner ports are read-only to this crate: they are fetched
//! from the provisioning API on every resolution pass and never cached, since
//! the catalog may change between two calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A data centre location from the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Numeric catalog identity
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub market: String,
    /// Short market code (e.g., "AU", "US")
    #[serde(default)]
    pub market_code: String,
    #[serde(default)]
    pub metro: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub site_code: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub live_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: String,
    /// Whether virtual routers can be ordered at this location
    #[serde(default)]
    pub has_mcr: bool,
}

impl Location {
    /// Approximate name match as performed by the catalog service:
    /// case-insensitive substring containment.
    pub fn matches_name_fuzzy(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// A partner-facing on-ramp port that cross-connects can terminate on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerPort {
    /// Opaque, stable product key
    pub product_uid: String,
    pub product_name: String,
    pub company_name: String,
    #[serde(default)]
    pub company_uid: String,
    /// Raw connect type as reported by the catalog (see [`ConnectType`])
    pub connect_type: String,
    pub location_id: u32,
    #[serde(default)]
    pub diversity_zone: Option<String>,
    /// Eligible for new orders
    #[serde(default)]
    pub vxc_permitted: bool,
    #[serde(default)]
    pub speed: u32,
}

impl PartnerPort {
    /// Parsed connect type of this port.
    pub fn kind(&self) -> ConnectType {
        ConnectType::parse(&self.connect_type)
    }
}

/// Connect types known to this crate.
///
/// The catalog reports connect types as free strings; anything not listed
/// here maps to [`ConnectType::Other`] and is compared by its raw string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectType {
    /// AWS hosted virtual interface
    Aws,
    /// AWS hosted connection (bandwidth pre-allocated on the partner side)
    AwsHostedConnection,
    Azure,
    Google,
    Oracle,
    /// Internet transit
    Transit,
    Other,
}

impl ConnectType {
    /// Parse a catalog connect-type string, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "AWS" => ConnectType::Aws,
            "AWSHC" => ConnectType::AwsHostedConnection,
            "AZURE" => ConnectType::Azure,
            "GOOGLE" => ConnectType::Google,
            "ORACLE" => ConnectType::Oracle,
            "TRANSIT" => ConnectType::Transit,
            _ => ConnectType::Other,
        }
    }

    /// Canonical catalog spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectType::Aws => "AWS",
            ConnectType::AwsHostedConnection => "AWSHC",
            ConnectType::Azure => "AZURE",
            ConnectType::Google => "GOOGLE",
            ConnectType::Oracle => "ORACLE",
            ConnectType::Transit => "TRANSIT",
            ConnectType::Other => "OTHER",
        }
    }

    /// Cloud on-ramp connect types carry CSP settings and get their B-end
    /// rederived on read.
    pub fn is_cloud(&self) -> bool {
        matches!(
            self,
            ConnectType::Aws
                | ConnectType::AwsHostedConnection
                | ConnectType::Azure
                | ConnectType::Google
                | ConnectType::Oracle
        )
    }

    /// Bandwidth is fixed on the partner side at order time; the rate limit
    /// of such a connection can never change afterwards.
    pub fn has_preallocated_bandwidth(&self) -> bool {
        matches!(self, ConnectType::AwsHostedConnection)
    }
}

impl fmt::Display for ConnectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
