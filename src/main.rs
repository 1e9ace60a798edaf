use clap::Parser;
use fabric::cli::{
    connect, handle_completions, handle_config_init, load_config, locations, ports, vxc, Cli,
    Commands, ConfigCommands, LocationsCommands, PartnerPortsCommands, VxcCommands,
};
use fabric::provision::ProvisionContext;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config(ConfigCommands::Init(args)) => handle_config_init(&args),
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(String::new())
        }
        command => run_remote(&cli.global, command).await,
    };

    match result {
        Ok(output) if output.is_empty() => {}
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Commands that talk to the provisioning API.
async fn run_remote(
    global: &fabric::cli::GlobalArgs,
    command: Commands,
) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    if let Err(e) = fabric::logging::init_tracing(&config.logging) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let client = connect(&config)?;
    let ctx = ProvisionContext::new(client, config.provisioning.clone());

    let cancel = ctx.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling outstanding waits");
            cancel.cancel();
        }
    });

    match command {
        Commands::Locations(LocationsCommands::Resolve(args)) => {
            locations::handle_locations_resolve(&ctx, &args).await
        }
        Commands::PartnerPorts(PartnerPortsCommands::Resolve(args)) => {
            ports::handle_partner_ports_resolve(&ctx, &args).await
        }
        Commands::PartnerPorts(PartnerPortsCommands::Internet(args)) => {
            ports::handle_internet_port(&ctx, &args).await
        }
        Commands::Vxc(VxcCommands::Show(args)) => vxc::handle_vxc_show(&ctx, &args).await,
        Commands::Config(_) | Commands::Completions(_) => Ok(String::new()),
    }
}
