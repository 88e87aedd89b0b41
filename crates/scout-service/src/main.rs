use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scout_config::ConfigLoader;
use scout_monitoring::{init_tracing, TracingConfig};
use scout_service::{api, service::ScoutService};
use scout_types::ScoutConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "repo-scout")]
#[command(about = "Discovers newly created GitHub repositories", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	#[arg(
		short,
		long,
		value_name = "FILE",
		env = "SCOUT_CONFIG",
		default_value = "config/scout.toml"
	)]
	config: PathBuf,

	/// Overrides the configured log level
	#[arg(long, env = "SCOUT_LOG_LEVEL")]
	log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Start the HTTP service
	Start,
	/// Validate the configuration file
	Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

	let mut tracing_config = TracingConfig::from_settings(&config.service);
	if let Some(level) = &cli.log_level {
		tracing_config = tracing_config.with_level(level.clone());
	}
	init_tracing(tracing_config).map_err(|e| anyhow::anyhow!("{}", e))?;

	match cli.command {
		Some(Commands::Start) | None => start_service(config).await,
		Some(Commands::Validate) => validate_config(&cli, &config),
	}
}

async fn start_service(config: ScoutConfig) -> Result<()> {
	info!("Starting {}", config.service.name);

	let shutdown = CancellationToken::new();
	let service = ScoutService::from_config(&config, shutdown.clone())
		.context("Failed to build discovery service")?;

	let address = config.service.server_address();
	let mut http_handle = tokio::spawn(api::start_http_server(
		Arc::new(service),
		address,
		shutdown.clone(),
	));

	tokio::select! {
		result = &mut http_handle => {
			// only reached when binding or serving failed
			return result.context("HTTP server task panicked")?;
		}
		_ = setup_shutdown_signal() => {
			info!("Shutdown signal received, stopping service...");
		}
	}

	shutdown.cancel();
	http_handle
		.await
		.context("HTTP server task panicked")?
		.context("HTTP server failed")?;

	info!("{} stopped", config.service.name);
	Ok(())
}

fn validate_config(cli: &Cli, config: &ScoutConfig) -> Result<()> {
	info!("Configuration file {:?} is valid", cli.config);
	info!("Service: {} on {}", config.service.name, config.service.server_address());
	info!("GitHub API: {}", config.github.api_url);
	info!("Authenticated: {}", config.github.use_credentials);
	info!(
		"Discovery: output_size={}, batch_size={}, max_concurrent_enrichments={}, max_batches={}",
		config.discovery.output_size,
		config.discovery.batch_size,
		config.discovery.max_concurrent_enrichments,
		config.discovery.max_batches
	);
	Ok(())
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			error!("Failed to install Ctrl+C handler: {}", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut sigterm) => {
				sigterm.recv().await;
			}
			Err(e) => {
				error!("Failed to install SIGTERM handler: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
