//! Cloud service provider settings for on-ramp connections.
//!
//! Exactly one variant applies to a connection, and it must match the
//! connect type of the partner port on the B-end.

use super::error::ConflictError;
use crate::catalog::ConnectType;
use serde::{Deserialize, Serialize};

/// Connect-type-specific partner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "connectType")]
pub enum CspSettings {
    /// AWS hosted virtual interface
    #[serde(rename = "AWS")]
    Aws(AwsSettings),
    /// AWS hosted connection
    #[serde(rename = "AWSHC")]
    AwsHostedConnection(AwsSettings),
    #[serde(rename = "AZURE")]
    Azure(AzureSettings),
    #[serde(rename = "GOOGLE")]
    Google(GoogleSettings),
    #[serde(rename = "ORACLE")]
    Oracle(OracleSettings),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VifType {
    Private,
    Public,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsSettings {
    /// AWS account that owns the virtual interface or connection
    pub owner_account: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub vif_type: Option<VifType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asn: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amazon_asn: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amazon_ip_address: Option<String>,
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub connection_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AzurePeeringType {
    Private,
    Microsoft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzurePeering {
    #[serde(rename = "type")]
    pub peering_type: AzurePeeringType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_asn: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_subnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_subnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureSettings {
    /// ExpressRoute service key
    pub service_key: String,
    pub peers: Vec<AzurePeering>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoogleSettings {
    pub pairing_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OracleSettings {
    pub virtual_circuit_id: String,
}

impl CspSettings {
    /// The partner connect type these settings are for.
    pub fn connect_type(&self) -> ConnectType {
        match self {
            CspSettings::Aws(_) => ConnectType::Aws,
            CspSettings::AwsHostedConnection(_) => ConnectType::AwsHostedConnection,
            CspSettings::Azure(_) => ConnectType::Azure,
            CspSettings::Google(_) => ConnectType::Google,
            CspSettings::Oracle(_) => ConnectType::Oracle,
        }
    }

    /// Check that the settings are complete.
    pub fn validate(&self) -> Result<(), ConflictError> {
        let missing = |field: &str| ConflictError::InvalidCspSettings {
            reason: format!("{} settings require a non-empty {}", self.connect_type(), field),
        };

        match self {
            CspSettings::Aws(aws) | CspSettings::AwsHostedConnection(aws) => {
                if aws.owner_account.trim().is_empty() {
                    return Err(missing("owner_account"));
                }
            }
            CspSettings::Azure(azure) => {
                if azure.service_key.trim().is_empty() {
                    return Err(missing("service_key"));
                }
            }
            CspSettings::Google(google) => {
                if google.pairing_key.trim().is_empty() {
                    return Err(missing("pairing_key"));
                }
            }
            CspSettings::Oracle(oracle) => {
                if oracle.virtual_circuit_id.trim().is_empty() {
                    return Err(missing("virtual_circuit_id"));
                }
            }
        }
        Ok(())
    }
}

/// Check declared settings against the connect type of the B-end port.
///
/// Cloud ports require a matching block; non-cloud ports accept none.
pub fn check_settings_for_port(
    settings: Option<&CspSettings>,
    port_connect_type: ConnectType,
    product_uid: &str,
) -> Result<(), ConflictError> {
    match (settings, port_connect_type.is_cloud()) {
        (Some(settings), true) => {
            if settings.connect_type() != port_connect_type {
                return Err(ConflictError::CspSettingsMismatch {
                    declared: settings.connect_type(),
                    port: port_connect_type,
                });
            }
            settings.validate()
        }
        (None, true) => Err(ConflictError::MissingCspSettings {
            connect_type: port_connect_type,
        }),
        (Some(_), false) => Err(ConflictError::UnexpectedCspSettings {
            product_uid: product_uid.to_string(),
        }),
        (None, false) => Ok(()),
    }
}
