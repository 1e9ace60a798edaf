//! Location command handlers

use crate::cli::output::{format_location_json, format_location_table};
use crate::cli::{non_blank, LocationsResolveArgs};
use crate::provision::ProvisionContext;
use crate::resolve::LocationQuery;

impl From<&LocationsResolveArgs> for LocationQuery {
    fn from(args: &LocationsResolveArgs) -> Self {
        Self {
            name: non_blank(&args.name),
            match_exact: args.exact,
            market_code: non_blank(&args.market_code),
            has_mcr: args.has_mcr.then_some(true),
        }
    }
}

/// Handle `fabric locations resolve`
pub async fn handle_locations_resolve(
    ctx: &ProvisionContext,
    args: &LocationsResolveArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let location = ctx.resolve_location(&LocationQuery::from(args)).await?;

    if args.json {
        Ok(format_location_json(&location)?)
    } else {
        Ok(format_location_table(&location))
    }
}
