//! sales-etl - regional sales ETL and aggregate query service
//!
//! `load` runs the pipeline once over the configured regional exports and
//! replaces the persisted set. `serve` exposes the aggregate queries over
//! HTTP, optionally running a load first.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sales_common::config::{
    NumericPolicy, RootFolderInitializer, RootFolderResolver, SourceConfig, TomlConfig,
};
use sales_etl::pipeline::{run_pipeline, PipelineConfig};
use sales_etl::source::{CsvSource, RecordSource};
use sales_etl::types::{REGION_A, REGION_B};
use sales_etl::{build_router, AppState, SalesStore};

/// Command-line arguments for sales-etl
#[derive(Parser, Debug)]
#[command(name = "sales-etl")]
#[command(about = "Regional sales ETL pipeline and aggregate query service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "SALES_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Database file (overrides <root_folder>/sales.db)
    #[arg(short, long, env = "SALES_DATABASE")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline once and replace the persisted set
    Load(LoadArgs),

    /// Serve aggregate queries over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "SALES_PORT")]
        port: Option<u16>,

        /// Run the pipeline before starting the server
        #[arg(long)]
        load_first: bool,

        #[command(flatten)]
        load: LoadArgs,
    },
}

#[derive(clap::Args, Debug)]
struct LoadArgs {
    /// CSV export for region A
    #[arg(long)]
    region_a: Option<PathBuf>,

    /// CSV export for region B
    #[arg(long)]
    region_b: Option<PathBuf>,

    /// Handling of malformed numerics: zero-fill or reject
    #[arg(long)]
    numeric_policy: Option<NumericPolicy>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=info", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting sales-etl v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &args.config {
        Some(path) if path.exists() => info!("Configuration: {}", path.display()),
        Some(path) => warn!("Config file not found: {} (using built-in defaults)", path.display()),
        None => info!("Configuration: built-in defaults"),
    }

    let db_path = match args.database.clone().or_else(|| config.database_path.clone()) {
        Some(path) => path,
        None => {
            let root_folder = RootFolderResolver::new()
                .with_cli_arg(args.root_folder.clone())
                .with_config(&config)
                .resolve();
            let initializer = RootFolderInitializer::new(root_folder);
            initializer.ensure_directory_exists()?;
            initializer.database_path()
        }
    };
    info!("Database path: {}", db_path.display());

    let store = SalesStore::open(&db_path)
        .await
        .context("Failed to open sales database")?;

    match args.command {
        Command::Load(load) => {
            run_load(&load, &config, &store).await?;
        }
        Command::Serve {
            port,
            load_first,
            load,
        } => {
            if load_first {
                run_load(&load, &config, &store).await?;
            }
            serve(store, port.unwrap_or_else(|| config.port())).await?;
        }
    }

    Ok(())
}

/// Sources from the command line, falling back to the config file
fn resolve_sources(load: &LoadArgs, config: &TomlConfig) -> Vec<SourceConfig> {
    let cli: Vec<SourceConfig> = [(REGION_A, &load.region_a), (REGION_B, &load.region_b)]
        .into_iter()
        .filter_map(|(region, path)| {
            path.as_ref().map(|path| SourceConfig {
                region: region.to_string(),
                path: path.clone(),
            })
        })
        .collect();

    if cli.is_empty() {
        config.sources.clone()
    } else {
        cli
    }
}

async fn run_load(load: &LoadArgs, config: &TomlConfig, store: &SalesStore) -> Result<()> {
    let source_configs = resolve_sources(load, config);
    if source_configs.is_empty() {
        anyhow::bail!("No sources configured: pass --region-a/--region-b or add [[sources]] to the config file");
    }

    let mut sources: Vec<Box<dyn RecordSource + Send>> = source_configs
        .iter()
        .map(|source| Box::new(CsvSource::from_config(source)) as Box<dyn RecordSource + Send>)
        .collect();

    let pipeline_config = PipelineConfig {
        numeric_policy: load.numeric_policy.unwrap_or(config.numeric_policy),
    };
    info!(
        "Running pipeline over {} sources (numeric policy: {})",
        sources.len(),
        pipeline_config.numeric_policy
    );

    match run_pipeline(&mut sources, &pipeline_config, store).await {
        Ok(report) => {
            info!(
                "✓ Pipeline complete: {} read, {} defaulted, {} superseded, {} dropped, {} loaded",
                report.records_read,
                report.values_defaulted,
                report.duplicates_superseded,
                report.invalid_dropped,
                report.rows_inserted
            );
            Ok(())
        }
        Err(e) => {
            error!("Pipeline failed, persisted set unchanged: {}", e);
            Err(e.into())
        }
    }
}

async fn serve(store: SalesStore, port: u16) -> Result<()> {
    let app = build_router(AppState::new(store));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("sales-etl listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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

    info!("Shutdown signal received");
}
