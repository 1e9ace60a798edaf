//! Partner port command handlers

use crate::cli::output::{format_partner_port_json, format_partner_port_table};
use crate::cli::{non_blank, InternetPortArgs, PartnerPortsResolveArgs};
use crate::provision::ProvisionContext;
use crate::resolve::PartnerPortQuery;

impl From<&PartnerPortsResolveArgs> for PartnerPortQuery {
    fn from(args: &PartnerPortsResolveArgs) -> Self {
        Self {
            product_name: non_blank(&args.product_name),
            connect_type: non_blank(&args.connect_type),
            location_id: args.location_id,
            company_name: non_blank(&args.company_name),
            diversity_zone: non_blank(&args.diversity_zone),
        }
    }
}

/// Handle `fabric partner-ports resolve`
pub async fn handle_partner_ports_resolve(
    ctx: &ProvisionContext,
    args: &PartnerPortsResolveArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let port = ctx
        .resolve_partner_port(&PartnerPortQuery::from(args))
        .await?;

    if args.json {
        Ok(format_partner_port_json(&port)?)
    } else {
        Ok(format_partner_port_table(&port))
    }
}

/// Handle `fabric partner-ports internet`
pub async fn handle_internet_port(
    ctx: &ProvisionContext,
    args: &InternetPortArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let zone = non_blank(&args.zone);
    let port = ctx
        .resolve_internet_port(&args.metro, zone.as_deref())
        .await?;

    if args.json {
        Ok(format_partner_port_json(&port)?)
    } else {
        Ok(format_partner_port_table(&port))
    }
}
