//! Launch Dash - interactive launch-outcome dashboard
//!
//! CLI commands:
//! - serve (default): Start HTTP server
//! - summary: Print the loaded dataset's derived constants

mod charts;
mod config;
mod dashboard;
mod dataset;
mod engine;
mod error;
mod logging;
mod selection;
mod server;
mod state;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "launch_dash")]
#[command(about = "Interactive dashboard over launch outcome records")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to dashboard.yaml page config (optional)
    #[arg(short, long, default_value = "dashboard.yaml")]
    config: PathBuf,

    /// Launch records CSV (overrides DASH_DATA_FILE)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Port to listen on (overrides DASH_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve,

    /// Print dataset summary and registered callbacks
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = config::Settings::load();
    if let Some(data) = cli.data {
        settings.data_file = data;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }

    // Initialize logging first
    let _log_guard = logging::init_logging(&settings.log_dir)?;
    tracing::info!("Launch Dash starting up");
    tracing::debug!("Settings: {:?}", settings);

    let dash_config = config::DashboardConfig::load_or_default(&cli.config)?;

    // Fatal on any load error: no partial dataset
    let dataset = dataset::Dataset::load(&settings.data_file)
        .with_context(|| format!("loading launch records from {:?}", settings.data_file))?;

    let state = state::AppState::new(dataset, dash_config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            server::serve(state, &settings.host, settings.port).await?;
        }
        Commands::Summary => {
            print_summary(&state.dashboard);
        }
    }

    Ok(())
}

fn print_summary(dashboard: &dashboard::Dashboard) {
    let layout = dashboard.layout();
    let summary = &layout.dataset;

    println!("{}", layout.title);
    println!();
    println!("Records: {}", summary.records);
    match (summary.min_payload, summary.max_payload) {
        (Some(min), Some(max)) => println!("Payload: {} - {} kg", min, max),
        _ => println!("Payload: n/a"),
    }
    println!("Loaded:  {}", summary.loaded_at);
    println!();

    println!("Sites ({}):", summary.sites);
    for site in dashboard.dataset().sites() {
        let launches = dashboard
            .dataset()
            .records()
            .iter()
            .filter(|r| &r.launch_site == site)
            .count();
        println!("  - {} ({} launches)", site, launches);
    }
    println!();

    println!("Callbacks:");
    for callback in dashboard.callbacks() {
        println!("  {} <- {}", callback.output, callback.inputs.join(", "));
    }
}
