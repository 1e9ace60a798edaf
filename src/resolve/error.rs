//! Error types for resolution failures

use crate::error::ErrorKind;
use thiserror::Error;

/// Errors that end a resolution pass.
///
/// Each filter stage owns one variant so the caller can tell exactly which
/// criterion over-constrained the search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Adjudication found no location
    #[error("no locations found")]
    NoLocationsFound,

    /// Exact-only lookup found no location with that name
    #[error("location '{name}' not found")]
    LocationNotFound { name: String },

    #[error("too many locations found ({count}), add filters to narrow the search")]
    TooManyLocations { count: usize },

    /// No orderable partner port exists at all
    #[error("no partner ports found")]
    NoPartnerPortsFound,

    #[error("no partner ports match product name '{product_name}', filter is too strict")]
    ProductNameFilterTooStrict { product_name: String },

    #[error("no partner ports match connect type '{connect_type}', filter is too strict")]
    ConnectTypeFilterTooStrict { connect_type: String },

    #[error("no matching partner ports found at location {location_id}")]
    NoMatchingPartnerPortsAtLocation { location_id: u32 },

    #[error("no partner ports match company name '{company_name}', filter is too strict")]
    CompanyNameFilterTooStrict { company_name: String },

    #[error("no partner ports match diversity zone '{diversity_zone}', filter is too strict")]
    DiversityZoneFilterTooStrict { diversity_zone: String },

    #[error("too many partner ports found ({count}), add filters to narrow the search")]
    TooManyPartnerPorts { count: usize },

    #[error("no internet ports found in metro '{metro}'{}", zone_suffix(.zone))]
    NoInternetPortsFound { metro: String, zone: Option<String> },

    #[error("too many internet ports found ({count}), add filters to narrow the search")]
    TooManyInternetPorts { count: usize },
}

fn zone_suffix(zone: &Option<String>) -> String {
    zone.as_ref()
        .map(|z| format!(" and zone '{}'", z))
        .unwrap_or_default()
}

impl ResolveError {
    /// Classify into the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::TooManyLocations { .. }
            | ResolveError::TooManyPartnerPorts { .. }
            | ResolveError::TooManyInternetPorts { .. } => ErrorKind::Ambiguity,
            _ => ErrorKind::NotFound,
        }
    }
}
