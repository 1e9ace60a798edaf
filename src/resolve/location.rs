//! Location resolution
//!
//! Resolves a place name plus optional secondary attributes to exactly one
//! catalog location.

use super::adjudicate::{adjudicate, outcome_label, Adjudication};
use super::error::ResolveError;
use super::filter::{FilterPipeline, FilterStage};
use crate::catalog::Location;
use serde::{Deserialize, Serialize};

/// Selection criteria for a location lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationQuery {
    /// Location name; tried exactly first, then fuzzily
    pub name: Option<String>,
    /// Refuse the fuzzy fallback
    pub match_exact: bool,
    pub market_code: Option<String>,
    pub has_mcr: Option<bool>,
}

impl LocationQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

const LOCATION_ADJUDICATION: Adjudication = Adjudication {
    none: ResolveError::NoLocationsFound,
    many: too_many_locations,
};

fn too_many_locations(count: usize) -> ResolveError {
    ResolveError::TooManyLocations { count }
}

/// Resolve `query` against the full location catalog.
///
/// # Algorithm
/// 1. Exact name match over the whole catalog wins outright
/// 2. With `match_exact`, a miss is `LocationNotFound`
/// 3. Fuzzy match: one hit wins outright, several become the candidate set,
///    none falls back to the whole catalog
/// 4. Secondary filters (market code, router availability) narrow the set;
///    an omitted filter is a no-op
/// 5. Adjudicate the remainder
///
/// Without a name, steps 1-3 are skipped and the whole catalog is filtered.
pub fn resolve_location<'c>(
    catalog: &'c [Location],
    query: &LocationQuery,
) -> Result<&'c Location, ResolveError> {
    let result = resolve_inner(catalog, query);

    metrics::counter!(
        "fabric_resolutions_total",
        "resolver" => "location",
        "outcome" => outcome_label(&result),
    )
    .increment(1);

    match &result {
        Ok(location) => tracing::debug!(
            query = ?query.name,
            location_id = location.id,
            location = %location.name,
            "Location resolved"
        ),
        Err(e) => tracing::debug!(query = ?query.name, error = %e, "Location resolution failed"),
    }

    result
}

fn resolve_inner<'c>(
    catalog: &'c [Location],
    query: &LocationQuery,
) -> Result<&'c Location, ResolveError> {
    let candidates: Vec<&'c Location> = match query.name.as_deref() {
        Some(name) => {
            if let Some(exact) = catalog.iter().find(|l| l.name == name) {
                return Ok(exact);
            }
            if query.match_exact {
                return Err(ResolveError::LocationNotFound {
                    name: name.to_string(),
                });
            }

            let fuzzy: Vec<&'c Location> = catalog
                .iter()
                .filter(|l| l.matches_name_fuzzy(name))
                .collect();
            tracing::trace!(query = name, matches = fuzzy.len(), "Fuzzy location match");

            match fuzzy.len() {
                1 => return Ok(fuzzy[0]),
                0 => catalog.iter().collect(),
                _ => fuzzy,
            }
        }
        None => catalog.iter().collect(),
    };

    let pipeline = FilterPipeline::new(
        "location",
        vec![
            FilterStage::optional(
                "market_code",
                query.market_code.as_deref(),
                |_| ResolveError::NoLocationsFound,
                |code: &&str, loc: &&Location| loc.market_code.eq_ignore_ascii_case(code),
            ),
            FilterStage::optional(
                "has_mcr",
                query.has_mcr,
                |_| ResolveError::NoLocationsFound,
                |flag: &bool, loc: &&Location| loc.has_mcr == *flag,
            ),
        ],
    );

    let narrowed = pipeline.run(candidates)?;
    adjudicate(narrowed, &LOCATION_ADJUDICATION)
}
