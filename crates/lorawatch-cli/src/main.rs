//! Command-line interface for the lorawatch sensor reader.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use lorawatch_core::{ConnectionConfig, HttpTransport, NoEnrichment, SensorReader};
use lorawatch_store::SnapshotCache;
use lorawatch_types::Snapshot;

#[derive(Parser)]
#[command(name = "lorawatch")]
#[command(author, version, about = "Reader for LoRaWAN sensor telemetry", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the connection configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the aggregated sensor snapshot
    Read {
        /// Bypass the cache and fetch fresh data from the platform
        #[arg(short, long)]
        refresh: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete the cached snapshot
    Invalidate,
}

/// Output format for the read command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => ConnectionConfig::load(path)?,
        None => ConnectionConfig::load_default()?,
    };
    config.log_summary();
    let config = Arc::new(config);

    let cache = Arc::new(SnapshotCache::new(
        lorawatch_store::default_cache_path(),
        config.cache_ttl(),
    ));

    match cli.command {
        Commands::Read { refresh, format } => {
            let transport = Arc::new(HttpTransport::from_config(&config)?);
            let reader = SensorReader::new(
                Arc::clone(&config),
                Arc::clone(&cache),
                transport,
                Arc::new(NoEnrichment),
            );

            match reader.read_sensors_data(refresh).await {
                Ok(snapshot) => print!("{}", render_snapshot(&snapshot, format)?),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Invalidate => {
            cache.invalidate();
            println!("Cache cleared.");
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn render_snapshot(snapshot: &Snapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(snapshot)?
        )),
        OutputFormat::Text => {
            let mut out = format!(
                "{} project(s), {} sensor(s)\n",
                snapshot.projects.len(),
                snapshot.sensors.len()
            );
            for device in &snapshot.sensors {
                let last_seen = device.created_at.as_deref().unwrap_or("never");
                let gateways = device.lrr_ids.as_ref().map_or(0, Vec::len);
                out.push_str(&format!(
                    "  {}  last seen {}  via {} gateway(s)\n",
                    device.dev_eui, last_seen, gateways
                ));
            }
            Ok(out)
        }
    }
}
