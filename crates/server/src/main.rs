//! ArchPlan Server
//!
//! Command-line and HTTP entry point around the core planning pipeline.
//! Rendering, flag parsing and transport live here; every decision is made
//! by `archplan_core`.

mod api;

use anyhow::{Context, Result};
use archplan_core::catalog::StaticCatalog;
use archplan_core::config::{self, ENV_FILE};
use archplan_core::models::CloudProvider;
use archplan_core::swarm::{render_markdown, MemorySink};
use archplan_core::{Orchestrator, OrchestratorConfig, PlanError};
use axum::Router;
use clap::{Parser, Subcommand, ValueEnum};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::api::plan::plan_routes;

const DEFAULT_LOG_FILTER: &str = "archplan_core=info,archplan_server=info";

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

#[derive(Parser, Clone, Debug)]
#[command(
    author,
    version,
    about = "ArchPlan - cloud architecture recommendations from a problem description"
)]
struct Args {
    /// Print the pipeline event trail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone, Debug)]
enum CliCommand {
    /// Plan an architecture for a problem description
    Plan {
        /// Natural-language description of the system to build
        description: String,
        /// Target cloud provider (defaults to the configured provider)
        #[arg(short, long)]
        provider: Option<CloudProvider>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Skip specialist review
        #[arg(long)]
        no_specialists: bool,
        /// JSON catalog file replacing the built-in catalog
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Per-specialist timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Start the HTTP server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Print the built-in catalog as JSON
    Catalog,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Markdown,
}

/// Flags that override the loaded config
#[derive(Debug, Default)]
struct Overrides {
    no_specialists: bool,
    catalog: Option<PathBuf>,
    timeout_ms: Option<u64>,
}

impl Overrides {
    fn apply(self, mut config: OrchestratorConfig) -> Result<OrchestratorConfig> {
        if self.no_specialists {
            config.specialists.clear();
        }
        if self.catalog.is_some() {
            config.catalog_path = self.catalog;
        }
        if let Some(ms) = self.timeout_ms {
            config.specialist_timeout_ms = ms;
        }
        config::validate(&config)?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Cancel `token` on Ctrl-C
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling");
            token.cancel();
        }
    });
}

async fn run_plan(
    config: OrchestratorConfig,
    description: String,
    provider: Option<CloudProvider>,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let sink = Arc::new(MemorySink::new());
    let mut orchestrator =
        Orchestrator::from_config(config).context("Failed to build the orchestrator")?;
    if verbose {
        orchestrator = orchestrator.with_event_sink(sink.clone());
    }

    let token = CancellationToken::new();
    cancel_on_ctrl_c(token.clone());
    let result = orchestrator
        .plan_with_cancellation(&description, provider, token)
        .await;

    if verbose {
        for event in sink.events() {
            eprintln!(
                "[{}] {:?} {}",
                event.timestamp.format("%H:%M:%S%.3f"),
                event.kind,
                event.agent
            );
        }
    }

    match result {
        Ok(plan) => {
            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&plan)?,
                OutputFormat::Markdown => render_markdown(&plan),
            };
            println!("{}", rendered);
            Ok(())
        }
        Err(PlanError::CatalogUnavailable {
            stage,
            reason,
            partial,
        }) => {
            println!("{}", serde_json::to_string_pretty(&*partial)?);
            anyhow::bail!(
                "planning aborted during {:?}: catalog unavailable: {}",
                stage,
                reason
            )
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_server(config: OrchestratorConfig, port: u16) -> Result<()> {
    let orchestrator =
        Orchestrator::from_config(config).context("Failed to build the orchestrator")?;
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
    };

    let app = Router::new()
        .nest("/api/v1", plan_routes())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("ArchPlan server running at http://{}", addr);
    println!("ArchPlan server running at http://{}", addr);
    println!("   Plan:   POST /api/v1/plan");
    println!("   Health: GET  /api/v1/health");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let runtime_dir = config::get_runtime_path();
    let _ = dotenvy::from_path(runtime_dir.join(ENV_FILE));
    init_tracing();

    let args = Args::parse();
    let config = config::load_config(&runtime_dir)
        .await
        .with_context(|| format!("Failed to load config from {:?}", runtime_dir))?;

    match args.command {
        Some(CliCommand::Plan {
            description,
            provider,
            format,
            no_specialists,
            catalog,
            timeout_ms,
        }) => {
            let config = Overrides {
                no_specialists,
                catalog,
                timeout_ms,
            }
            .apply(config)?;
            run_plan(config, description, provider, format, args.verbose).await
        }
        Some(CliCommand::Catalog) => {
            println!("{}", StaticCatalog::builtin().to_json()?);
            Ok(())
        }
        Some(CliCommand::Serve { port }) => run_server(config, port).await,
        None => run_server(config, 8080).await,
    }
}
