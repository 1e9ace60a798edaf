//! Partner-port resolution
//!
//! Narrows the partner-port catalog to the single orderable on-ramp port a
//! cross-connect should terminate on.
//!
//! # Stage order
//! orderable → product name → connect type → location → company name →
//! diversity zone
//!
//! The order is fixed and fail-fast: a query with both a bad product name and
//! a bad connect type always reports the product name.

use super::adjudicate::{adjudicate_first_of_equals, outcome_label, Adjudication};
use super::error::ResolveError;
use super::filter::{FilterPipeline, FilterStage, Strictness};
use crate::catalog::{ConnectType, Location, PartnerPort};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Selection criteria for a partner port. Every supplied criterion is strict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartnerPortQuery {
    pub product_name: Option<String>,
    pub connect_type: Option<String>,
    pub location_id: Option<u32>,
    pub company_name: Option<String>,
    pub diversity_zone: Option<String>,
}

impl PartnerPortQuery {
    /// A query matching the identity attributes of `port`: product name,
    /// connect type, location and company.
    pub fn describing(port: &PartnerPort) -> Self {
        Self {
            product_name: Some(port.product_name.clone()),
            connect_type: Some(port.connect_type.clone()),
            location_id: Some(port.location_id),
            company_name: Some(port.company_name.clone()),
            diversity_zone: None,
        }
    }
}

const PARTNER_PORT_ADJUDICATION: Adjudication = Adjudication {
    none: ResolveError::NoPartnerPortsFound,
    many: too_many_partner_ports,
};

fn too_many_partner_ports(count: usize) -> ResolveError {
    ResolveError::TooManyPartnerPorts { count }
}

/// Two ports are interchangeable when they share every identity attribute.
fn same_identity(a: &&PartnerPort, b: &&PartnerPort) -> bool {
    a.product_name == b.product_name
        && a.connect_type.eq_ignore_ascii_case(&b.connect_type)
        && a.location_id == b.location_id
        && a.company_name == b.company_name
}

/// Build the ordered stage table for `query`.
pub fn partner_port_pipeline<'a, 'c>(query: &'a PartnerPortQuery) -> FilterPipeline<'a, &'c PartnerPort>
where
    'c: 'a,
{
    FilterPipeline::new(
        "partner_port",
        vec![
            FilterStage::new(
                "orderable",
                Strictness::Strict,
                ResolveError::NoPartnerPortsFound,
                |port: &&PartnerPort| port.vxc_permitted,
            ),
            FilterStage::optional(
                "product_name",
                query.product_name.as_deref(),
                |name| ResolveError::ProductNameFilterTooStrict {
                    product_name: name.to_string(),
                },
                |name: &&str, port: &&PartnerPort| port.product_name == *name,
            ),
            FilterStage::optional(
                "connect_type",
                query.connect_type.as_deref(),
                |ct| ResolveError::ConnectTypeFilterTooStrict {
                    connect_type: ct.to_string(),
                },
                |ct: &&str, port: &&PartnerPort| port.connect_type.eq_ignore_ascii_case(ct),
            ),
            FilterStage::optional(
                "location_id",
                query.location_id,
                |id| ResolveError::NoMatchingPartnerPortsAtLocation { location_id: *id },
                |id: &u32, port: &&PartnerPort| port.location_id == *id,
            ),
            FilterStage::optional(
                "company_name",
                query.company_name.as_deref(),
                |name| ResolveError::CompanyNameFilterTooStrict {
                    company_name: name.to_string(),
                },
                |name: &&str, port: &&PartnerPort| port.company_name == *name,
            ),
            FilterStage::optional(
                "diversity_zone",
                query.diversity_zone.as_deref(),
                |zone| ResolveError::DiversityZoneFilterTooStrict {
                    diversity_zone: zone.to_string(),
                },
                |zone: &&str, port: &&PartnerPort| {
                    port.diversity_zone
                        .as_deref()
                        .is_some_and(|z| z.eq_ignore_ascii_case(zone))
                },
            ),
        ],
    )
}

/// Resolve `query` against the partner-port catalog.
///
/// Survivors that share every identity attribute (typically the same product
/// offered in two diversity zones) resolve to the first in catalog order;
/// any other ambiguity is `TooManyPartnerPorts`.
pub fn resolve_partner_port<'c>(
    catalog: &'c [PartnerPort],
    query: &PartnerPortQuery,
) -> Result<&'c PartnerPort, ResolveError> {
    let result = partner_port_pipeline(query)
        .run(catalog.iter().collect())
        .and_then(|survivors| {
            adjudicate_first_of_equals(survivors, &PARTNER_PORT_ADJUDICATION, same_identity)
        });

    metrics::counter!(
        "fabric_resolutions_total",
        "resolver" => "partner_port",
        "outcome" => outcome_label(&result),
    )
    .increment(1);

    match &result {
        Ok(port) => tracing::debug!(
            product_uid = %port.product_uid,
            product_name = %port.product_name,
            "Partner port resolved"
        ),
        Err(e) => tracing::debug!(error = %e, "Partner port resolution failed"),
    }

    result
}

/// Resolve the orderable internet transit port in `metro`, optionally in a
/// single diversity zone.
pub fn resolve_internet_port<'c>(
    locations: &[Location],
    catalog: &'c [PartnerPort],
    metro: &str,
    diversity_zone: Option<&str>,
) -> Result<&'c PartnerPort, ResolveError> {
    let not_found = ResolveError::NoInternetPortsFound {
        metro: metro.to_string(),
        zone: diversity_zone.map(str::to_string),
    };
    let metro_locations: HashSet<u32> = locations
        .iter()
        .filter(|l| l.metro.eq_ignore_ascii_case(metro))
        .map(|l| l.id)
        .collect();

    let pipeline = FilterPipeline::new(
        "internet_port",
        vec![
            FilterStage::new("orderable", Strictness::Strict, not_found.clone(), |p: &&PartnerPort| {
                p.vxc_permitted
            }),
            FilterStage::new("transit", Strictness::Strict, not_found.clone(), |p: &&PartnerPort| {
                p.kind() == ConnectType::Transit
            }),
            FilterStage::new("metro", Strictness::Strict, not_found.clone(), |p: &&PartnerPort| {
                metro_locations.contains(&p.location_id)
            }),
            FilterStage::optional(
                "diversity_zone",
                diversity_zone,
                |_| not_found.clone(),
                |zone: &&str, p: &&PartnerPort| {
                    p.diversity_zone
                        .as_deref()
                        .is_some_and(|z| z.eq_ignore_ascii_case(zone))
                },
            ),
        ],
    );

    let rules = Adjudication {
        none: not_found.clone(),
        many: |count| ResolveError::TooManyInternetPorts { count },
    };
    let result = pipeline.run(catalog.iter().collect()).and_then(|survivors| {
        adjudicate_first_of_equals(survivors, &rules, |a, b| {
            a.location_id == b.location_id && a.diversity_zone == b.diversity_zone
        })
    });

    metrics::counter!(
        "fabric_resolutions_total",
        "resolver" => "internet_port",
        "outcome" => outcome_label(&result),
    )
    .increment(1);

    result
}
