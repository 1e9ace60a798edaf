//! Output formatting helpers for CLI commands

use crate::catalog::{Location, PartnerPort};
use crate::provision::{ProvisioningState, VxcState};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

type FormatResult = Result<String, serde_json::Error>;

/// Format a location as a key/value table
pub fn format_location_table(location: &Location) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Metro", "Market", "Site", "MCR"]);

    let mcr = if location.has_mcr {
        "yes".green().to_string()
    } else {
        "no".dimmed().to_string()
    };
    table.add_row(vec![
        Cell::new(location.id),
        Cell::new(&location.name),
        Cell::new(&location.metro),
        Cell::new(&location.market_code),
        Cell::new(&location.site_code),
        Cell::new(mcr),
    ]);

    table.to_string()
}

pub fn format_location_json(location: &Location) -> FormatResult {
    serde_json::to_string_pretty(&json!({ "location": location }))
}

/// Format a partner port as a table
pub fn format_partner_port_table(port: &PartnerPort) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Product UID",
        "Name",
        "Company",
        "Type",
        "Location",
        "Zone",
    ]);

    table.add_row(vec![
        Cell::new(&port.product_uid),
        Cell::new(&port.product_name),
        Cell::new(&port.company_name),
        Cell::new(&port.connect_type),
        Cell::new(port.location_id),
        Cell::new(port.diversity_zone.as_deref().unwrap_or("-")),
    ]);

    table.to_string()
}

pub fn format_partner_port_json(port: &PartnerPort) -> FormatResult {
    serde_json::to_string_pretty(&json!({ "partner_port": port }))
}

/// Format a cross-connect as a field/value table
pub fn format_vxc_table(vxc: &VxcState) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    let vlan = |v: Option<u16>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    let status = format!(
        "{} {}",
        status_icon(vxc.state),
        colorize_status(vxc.state, &vxc.provisioning_status)
    );

    let rows: Vec<(&str, String)> = vec![
        ("UID", vxc.uid.clone()),
        ("Name", vxc.name.clone()),
        ("Rate limit", format!("{} Mbps", vxc.rate_limit)),
        ("Status", status),
        (
            "A-End",
            format!("{} ({})", vxc.a_end.product_name, vxc.a_end.product_uid),
        ),
        ("A-End VLAN", vlan(vxc.a_end.assigned_vlan)),
        (
            "B-End",
            format!("{} ({})", vxc.b_end.product_name, vxc.b_end.product_uid),
        ),
        ("B-End VLAN", vlan(vxc.b_end.assigned_vlan)),
        (
            "Connect type",
            vxc.connect_type
                .map(|ct| ct.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("Orderable B-End", vxc.b_end_requested_product_uid.clone()),
    ];

    for (field, value) in rows {
        table.add_row(vec![Cell::new(field), Cell::new(value)]);
    }

    table.to_string()
}

pub fn format_vxc_json(vxc: &VxcState) -> FormatResult {
    serde_json::to_string_pretty(&json!({ "vxc": vxc }))
}

fn colorize_status(state: Option<ProvisioningState>, raw: &str) -> String {
    match state {
        Some(ProvisioningState::Live) => raw.green().to_string(),
        Some(ProvisioningState::Deleted) => raw.red().to_string(),
        Some(ProvisioningState::Provisioning)
        | Some(ProvisioningState::Submitted)
        | Some(ProvisioningState::Updating) => raw.cyan().to_string(),
        Some(ProvisioningState::Unsubmitted) | None => raw.yellow().to_string(),
    }
}

/// Get status icon for a provisioning state
pub fn status_icon(state: Option<ProvisioningState>) -> &'static str {
    match state {
        Some(ProvisioningState::Live) => "✓",
        Some(ProvisioningState::Deleted) => "✗",
        Some(ProvisioningState::Provisioning)
        | Some(ProvisioningState::Submitted)
        | Some(ProvisioningState::Updating) => "~",
        Some(ProvisioningState::Unsubmitted) | None => "?",
    }
}
