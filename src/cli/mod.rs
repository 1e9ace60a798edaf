//! CLI module
//!
//! Command-line interface for catalog lookups and read-only inspection.
//!
//! # Commands
//!
//! - `locations resolve` - Resolve a single location
//! - `partner-ports resolve` - Resolve a single orderable partner port
//! - `partner-ports internet` - Resolve the internet port in a metro
//! - `vxc show` - Show a cross-connect as the reconciler reads it
//! - `config init` - Write an example configuration file
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! fabric locations resolve --name "Equinix SY1" --exact
//! fabric partner-ports resolve --connect-type AWSHC --location-id 3 --json
//! fabric completions zsh > ~/.zfunc/_fabric
//! ```

pub mod completions;
pub mod config;
pub mod locations;
pub mod output;
pub mod ports;
pub mod vxc;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::client::{ClientError, HttpProvisioningClient};
use crate::config::FabricConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// Fabric provisioner
#[derive(Parser, Debug)]
#[command(
    name = "fabric",
    version,
    about = "Resolve and inspect network fabric resources"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "fabric.toml")]
    pub config: PathBuf,

    /// Override API environment (production, staging, development)
    #[arg(short, long, global = true)]
    pub environment: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Location lookups
    #[command(subcommand)]
    Locations(LocationsCommands),
    /// Partner port lookups
    #[command(subcommand, name = "partner-ports")]
    PartnerPorts(PartnerPortsCommands),
    /// Cross-connect inspection
    #[command(subcommand)]
    Vxc(VxcCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Subcommand, Debug)]
pub enum LocationsCommands {
    /// Resolve a single location
    Resolve(LocationsResolveArgs),
}

#[derive(Args, Debug)]
pub struct LocationsResolveArgs {
    /// Location name; falls back to approximate matching unless --exact
    #[arg(short, long)]
    pub name: Option<String>,

    /// Require an exact name match
    #[arg(long, requires = "name")]
    pub exact: bool,

    /// Market code (e.g., AU, US)
    #[arg(short, long)]
    pub market_code: Option<String>,

    /// Only locations that can host virtual routers
    #[arg(long)]
    pub has_mcr: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum PartnerPortsCommands {
    /// Resolve a single orderable partner port
    Resolve(PartnerPortsResolveArgs),
    /// Resolve the orderable internet port in a metro
    Internet(InternetPortArgs),
}

#[derive(Args, Debug)]
pub struct PartnerPortsResolveArgs {
    #[arg(long)]
    pub product_name: Option<String>,

    /// Connect type (AWS, AWSHC, AZURE, GOOGLE, ORACLE, TRANSIT)
    #[arg(long)]
    pub connect_type: Option<String>,

    #[arg(long)]
    pub location_id: Option<u32>,

    #[arg(long)]
    pub company_name: Option<String>,

    /// Diversity zone (e.g., red, blue)
    #[arg(long)]
    pub diversity_zone: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InternetPortArgs {
    /// Metro name (e.g., Sydney)
    #[arg(short, long)]
    pub metro: String,

    /// Diversity zone
    #[arg(short, long)]
    pub zone: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum VxcCommands {
    /// Show a cross-connect
    Show(VxcShowArgs),
}

#[derive(Args, Debug)]
pub struct VxcShowArgs {
    /// Product uid of the cross-connect
    pub uid: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "fabric.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Resolve configuration for a command: file (when present), then
/// `FABRIC_*` environment, then CLI flags.
pub fn load_config(global: &GlobalArgs) -> Result<FabricConfig, crate::config::ConfigError> {
    let file = if global.config.exists() {
        Some(global.config.as_path())
    } else {
        None
    };
    let mut config = FabricConfig::load(file)?.with_env_overrides();

    if let Some(environment) = &global.environment {
        config.api.environment = environment
            .parse()
            .map_err(|message| crate::config::ConfigError::Validation {
                field: "environment".to_string(),
                message,
            })?;
    }
    if let Some(level) = &global.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// HTTP client for the configured API.
pub fn connect(config: &FabricConfig) -> Result<Arc<HttpProvisioningClient>, ClientError> {
    Ok(Arc::new(HttpProvisioningClient::from_config(&config.api)?))
}

/// A flag value, with blank strings read as not given.
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}
