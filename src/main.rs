use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use seattle_airbnb::config::Config;
use seattle_airbnb::logging;
use seattle_airbnb::pipeline::ingestion::CsvTableSource;
use seattle_airbnb::pipeline::output::CsvTableSink;
use seattle_airbnb::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "seattle_airbnb")]
#[command(about = "Seattle short-term rental investment analysis")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every cleaning step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the housing and listing data and compute investment metrics
    Run {
        /// Directory for the cleaned tables
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Only build the housing market table
    Market {
        /// Directory for the cleaned table
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("loading config from {}", path.display())),
        None => Config::load_or_default().context("loading config.toml"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Run { output_dir } => {
            if let Some(dir) = output_dir {
                config.paths.output_dir = dir;
            }
            let source = CsvTableSource::from_paths(&config.paths);
            let sink = CsvTableSink::new(&config.paths.output_dir);
            info!("🚀 Cleaning data into {}", sink.output_dir().display());

            match Pipeline::run(&source, &sink, &config.financing) {
                Ok(result) => {
                    let stats = &result.summary.listings;
                    println!("\n📊 Pipeline Results:");
                    println!("   Market segments: {}", result.summary.market_segments);
                    println!("   Listings read: {}", stats.total_listings);
                    println!("   Listings enriched: {}", stats.enriched_listings);
                    for file in &result.output_files {
                        println!("   Output file: {}", file.display());
                    }
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    return Err(e).context("cleaning pipeline failed");
                }
            }
        }
        Commands::Market { output_dir } => {
            if let Some(dir) = output_dir {
                config.paths.output_dir = dir;
            }
            let source = CsvTableSource::from_paths(&config.paths);
            let sink = CsvTableSink::new(&config.paths.output_dir);
            info!("🏠 Building market table into {}", sink.output_dir().display());

            let (market, files) = Pipeline::run_market(&source, &sink).context("building market table failed")?;
            info!("Market table has {} segments", market.len());
            for file in &files {
                println!("   Output file: {}", file.display());
            }
        }
    }
    Ok(())
}
