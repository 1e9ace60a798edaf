//! Flat key/value boundary with the declarative layer.
//!
//! Input arrives as an [`Attributes`] map. It is decoded once into typed
//! requests and never looked up by key inside the crate. State goes back out
//! through [`encode`].
//!
//! An empty string is treated as an absent key, so a resolver criterion is
//! strict exactly when its key is present and non-empty.

use crate::provision::csp::{AwsSettings, AzureSettings, CspSettings, GoogleSettings, OracleSettings};
use crate::provision::error::ConflictError;
use crate::provision::vxc::{AEndConfig, BEndConfig, BEndTarget, VxcConfig};
use crate::resolve::{LocationQuery, PartnerPortQuery};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Flat key/value record exchanged with the declarative layer.
pub type Attributes = Map<String, Value>;

#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("invalid attributes: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("missing required attribute '{0}'")]
    Missing(&'static str),

    #[error("attributes '{0}' and '{1}' are mutually exclusive")]
    Exclusive(&'static str, &'static str),

    #[error(transparent)]
    Conflict(#[from] ConflictError),
}

const CSP_BLOCKS: [&str; 4] = ["aws_config", "azure_config", "google_config", "oracle_config"];

/// Drop empty-string values, recursively, so they read as absent.
fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !matches!(v, Value::String(s) if s.trim().is_empty()))
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, normalize(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}

/// `peer_asn` -> `peerAsn`, recursively. CSP blocks are written in the
/// declarative layer's snake_case but decode into wire-format settings.
fn camelize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (camel_case(&k), camelize(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(camelize).collect()),
        other => other,
    }
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn decode<T: DeserializeOwned>(attrs: &Attributes) -> Result<T, AttributeError> {
    Ok(serde_json::from_value(normalize(Value::Object(attrs.clone())))?)
}

/// Keys: `name`, `match_exact`, `market_code`, `has_mcr`.
pub fn decode_location_query(attrs: &Attributes) -> Result<LocationQuery, AttributeError> {
    decode(attrs)
}

/// Keys: `product_name`, `connect_type`, `location_id`, `company_name`,
/// `diversity_zone`.
pub fn decode_partner_port_query(attrs: &Attributes) -> Result<PartnerPortQuery, AttributeError> {
    decode(attrs)
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct VxcAttributes {
    /// Identity of an existing connection; tracked by the caller
    #[serde(default, rename = "product_uid")]
    _product_uid: Option<IgnoredAny>,
    name: Option<String>,
    rate_limit: Option<u32>,
    a_end: Option<AEndConfig>,
    b_end: Option<BEndAttributes>,
    #[serde(default)]
    cost_centre: Option<String>,
    aws_config: Option<CspBlock<AwsSettings>>,
    azure_config: Option<AzureSettings>,
    google_config: Option<GoogleSettings>,
    oracle_config: Option<OracleSettings>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BEndAttributes {
    product_uid: Option<String>,
    partner: Option<PartnerPortQuery>,
    requested_vlan: Option<u16>,
}

/// `aws_config` covers both AWS connect types; `connect_type` picks one.
#[derive(Deserialize)]
struct CspBlock<T> {
    #[serde(default, rename = "connectType")]
    connect_type: Option<String>,
    #[serde(flatten)]
    settings: T,
}

/// Decode a cross-connect declaration.
///
/// At most one CSP settings block may be present, and the B-end needs
/// exactly one of `product_uid` or `partner`.
pub fn decode_vxc(attrs: &Attributes) -> Result<VxcConfig, AttributeError> {
    let mut attrs = attrs.clone();
    for key in CSP_BLOCKS {
        if let Some(block) = attrs.remove(key) {
            attrs.insert(key.to_string(), camelize(block));
        }
    }
    let raw: VxcAttributes = decode(&attrs)?;

    let declared: Vec<&'static str> = [
        ("aws_config", raw.aws_config.is_some()),
        ("azure_config", raw.azure_config.is_some()),
        ("google_config", raw.google_config.is_some()),
        ("oracle_config", raw.oracle_config.is_some()),
    ]
    .into_iter()
    .filter_map(|(key, present)| present.then_some(key))
    .collect();
    if declared.len() > 1 {
        return Err(ConflictError::MultipleCspSettings { declared }.into());
    }

    let csp = if let Some(block) = raw.aws_config {
        let hosted = block
            .connect_type
            .as_deref()
            .is_some_and(|ct| ct.eq_ignore_ascii_case("AWSHC"));
        Some(if hosted {
            CspSettings::AwsHostedConnection(block.settings)
        } else {
            CspSettings::Aws(block.settings)
        })
    } else if let Some(azure) = raw.azure_config {
        Some(CspSettings::Azure(azure))
    } else if let Some(google) = raw.google_config {
        Some(CspSettings::Google(google))
    } else {
        raw.oracle_config.map(CspSettings::Oracle)
    };

    let b_end = raw.b_end.ok_or(AttributeError::Missing("b_end"))?;
    let target = match (b_end.product_uid, b_end.partner) {
        (Some(product_uid), None) => BEndTarget::Product { product_uid },
        (None, Some(query)) => BEndTarget::Partner(query),
        (Some(_), Some(_)) => return Err(AttributeError::Exclusive("b_end.product_uid", "b_end.partner")),
        (None, None) => return Err(AttributeError::Missing("b_end.product_uid")),
    };

    Ok(VxcConfig {
        name: raw.name.ok_or(AttributeError::Missing("name"))?,
        rate_limit: raw.rate_limit.ok_or(AttributeError::Missing("rate_limit"))?,
        a_end: raw.a_end.ok_or(AttributeError::Missing("a_end"))?,
        b_end: BEndConfig {
            target,
            requested_vlan: b_end.requested_vlan,
        },
        csp,
        cost_centre: raw.cost_centre,
    })
}

/// Render any state struct as a flat attribute record.
pub fn encode<T: Serialize>(state: &T) -> Result<Attributes, AttributeError> {
    match serde_json::to_value(state)? {
        Value::Object(map) => Ok(map),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            Ok(map)
        }
    }
}
