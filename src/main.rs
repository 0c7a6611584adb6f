//! Debrief CLI
//!
//! Command-line interface for exploring agent debug bundles:
//! - Query metrics by name or wildcard pattern
//! - List indexed metric names
//! - Summarize a bundle's capture window
//! - Manage the active bundle path

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use debrief::bundle::Bundle;
use debrief::catalog::CatalogClient;
use debrief::config::{generate_default_config, Config};
use debrief::metrics::MetricIndex;
use debrief::query::{QueryEngine, QueryOptions};

#[derive(Parser)]
#[command(name = "debrief")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query metrics from agent debug bundles")]
#[command(
    long_about = "Debrief decodes the metrics stream captured in an agent debug bundle,\nindexes it by metric name, and answers name and wildcard queries with\nunit-aware formatting."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Bundle directory or metrics file (overrides the configured path)
    #[arg(short, long, global = true)]
    pub bundle: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Query metrics by name or wildcard pattern
    Query {
        /// Metric name or pattern, e.g. "consul.raft.apply" or "consul.raft.*"
        pattern: String,
        /// Reject names the telemetry catalog does not know
        #[arg(short, long)]
        validate: bool,
        /// Sort rows descending by value
        #[arg(short, long)]
        sort_by_value: bool,
        /// Render only timestamp and value columns
        #[arg(long)]
        short: bool,
        /// Skip the catalog fetch (no validation, placeholder units)
        #[arg(long)]
        skip_catalog: bool,
    },

    /// List indexed metric names with observation counts
    List {
        /// Substring filter over metric names
        filter: Option<String>,
    },

    /// Summarize the bundle's captures
    Summary,

    /// Persist the active bundle path
    SetPath {
        /// Bundle directory or metrics file
        path: PathBuf,
    },

    /// Show the active bundle path
    ShowPath,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    init_logging(&config);

    let cli = Cli::parse();
    match cli.command {
        Commands::Query {
            pattern,
            validate,
            sort_by_value,
            short,
            skip_catalog,
        } => {
            let bundle = open_bundle(cli.bundle.as_deref(), &config)?;
            let snapshots = bundle
                .decode_snapshots()
                .context("Failed to decode bundle metrics")?;
            let index = MetricIndex::from_snapshots(&snapshots);

            let mut engine =
                QueryEngine::new(index).with_proxy_prefix(config.query.proxy_prefix.clone());
            if !skip_catalog {
                match CatalogClient::new(config.catalog_client_config()).fetch().await {
                    Ok(catalog) => engine = engine.with_catalog(catalog),
                    Err(err) => {
                        tracing::warn!("Proceeding without telemetry catalog: {}", err)
                    }
                }
            }

            let options = QueryOptions {
                validate,
                sort_by_value,
                short_form: short,
            };
            let table = engine.query(&pattern, options)?;
            println!("{}", table);
        }

        Commands::List { filter } => {
            let bundle = open_bundle(cli.bundle.as_deref(), &config)?;
            let snapshots = bundle
                .decode_snapshots()
                .context("Failed to decode bundle metrics")?;
            let index = MetricIndex::from_snapshots(&snapshots);

            let filter = filter.as_deref().unwrap_or("");
            let names: Vec<&str> = index
                .names()
                .filter(|name| name.contains(filter))
                .collect();
            if names.is_empty() {
                println!("No metric names match {:?}", filter);
                return Ok(());
            }

            let width = names.iter().map(|name| name.len()).max().unwrap_or(0);
            for name in names {
                let count = index.get(name).map(|obs| obs.len()).unwrap_or(0);
                println!("{:<width$}  {}", name, count, width = width);
            }
        }

        Commands::Summary => {
            let bundle = open_bundle(cli.bundle.as_deref(), &config)?;
            let snapshots = bundle
                .decode_snapshots()
                .context("Failed to decode bundle metrics")?;
            let index = MetricIndex::from_snapshots(&snapshots);

            println!("Bundle: {}", bundle.metrics_path().display());
            if let Some(meta) = bundle.index() {
                if !meta.agent_version.is_empty() {
                    println!("Agent version: {}", meta.agent_version);
                }
                if !meta.targets.is_empty() {
                    println!("Targets: {}", meta.targets.join(", "));
                }
            }
            match bundle.expected_captures() {
                Some(expected) => println!("Captures: {} (expected {})", snapshots.len(), expected),
                None => println!("Captures: {}", snapshots.len()),
            }
            if let (Some(first), Some(last)) = (snapshots.first(), snapshots.last()) {
                println!("Capture window: {} to {}", first.timestamp, last.timestamp);
            }
            println!("Metric names: {}", index.metric_count());

            let gauges: usize = snapshots.iter().map(|s| s.gauges.len()).sum();
            let points: usize = snapshots.iter().map(|s| s.points.len()).sum();
            let counters: usize = snapshots.iter().map(|s| s.counters.len()).sum();
            let samples: usize = snapshots.iter().map(|s| s.samples.len()).sum();
            println!(
                "Records: {} gauges, {} points, {} counters, {} samples",
                gauges, points, counters, samples
            );
        }

        Commands::SetPath { path } => {
            // Open it first so a typo never gets persisted.
            Bundle::open(&path)
                .with_context(|| format!("Cannot use {} as bundle path", path.display()))?;

            let mut config = config;
            config.bundle.path = Some(path.clone());
            let saved = config.save().context("Failed to save config")?;
            println!("Bundle path set to {} ({})", path.display(), saved.display());
        }

        Commands::ShowPath => match (&cli.bundle, &config.bundle.path) {
            (Some(path), _) => println!("{} (from --bundle)", path.display()),
            (None, Some(path)) => println!("{}", path.display()),
            (None, None) => {
                println!("No bundle path configured. Pass --bundle <path> or run `debrief set-path <path>`.")
            }
        },

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Wrote default config to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Initialize logging from RUST_LOG, falling back to the configured level
fn init_logging(config: &Config) {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("debrief={}", config.logging.level));

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolve the bundle path from the flag or config and open it
fn open_bundle(flag: Option<&Path>, config: &Config) -> anyhow::Result<Bundle> {
    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| config.bundle.path.clone())
        .context(
            "No bundle path configured. Pass --bundle <path> or run `debrief set-path <path>`",
        )?;
    Bundle::open(&path).with_context(|| format!("Failed to open bundle at {}", path.display()))
}
