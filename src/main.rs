//! S2GOS - local OGC API - Processes job engine
//!
//! Command line front-end over a local service populated with demo
//! processes.

mod cli;
mod cmd_process;
mod logging;

use clap::Parser;
use tracing::{info, warn};

use s2gos_config::{Config, ConfigLoader, ConfigValidator};
use s2gos_jobs::testing::register_demo_processes;
use s2gos_jobs::{LocalService, PoolConfig};

use cli::{Cli, Commands};

fn build_service(config: &Config) -> Result<LocalService, Box<dyn std::error::Error>> {
    let pool = PoolConfig::default().with_max_workers(config.jobs.max_workers);
    let mut service = LocalService::with_config(config.service.title.clone(), pool);
    if let Some(description) = &config.service.description {
        service = service.with_description(description.clone());
    }
    register_demo_processes(&service)?;
    Ok(service)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    logging::init_tracing(&config.logging)?;

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        let errors: Vec<String> = validation.errors.iter().map(ToString::to_string).collect();
        return Err(format!("Invalid configuration: {}", errors.join("; ")).into());
    }

    info!("Starting S2GOS v{}", env!("CARGO_PKG_VERSION"));
    let service = build_service(&config)?;

    let result = match cli.command {
        Commands::Info => cmd_process::handle_info(&service).await,
        Commands::Conformance => cmd_process::handle_conformance(&service).await,
        Commands::Processes => cmd_process::handle_processes(&service).await,
        Commands::Describe { process_id } => {
            cmd_process::handle_describe(&service, &process_id).await
        }
        Commands::Run { process_id, inputs } => {
            cmd_process::handle_run(&service, &process_id, inputs).await
        }
    };

    service.shutdown();
    result
}
