// Data pipeline: ingestion, processing, and output

pub mod ingestion;
pub mod output;
pub mod processing;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, instrument};

use crate::config::FinancingConfig;
use crate::error::Result;
use crate::types::EnrichedListing;
use ingestion::TableSource;
use output::{RunOutput, TableSink};
use processing::{
    BedroomAdjuster, FinancialCalculator, ListingPipeline, ListingStats, MarketTable, MarketTableBuilder,
    NeighborhoodMapper,
};

/// Summary of a complete pipeline run, persisted next to the output tables
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub financing: FinancingConfig,
    pub market_segments: usize,
    pub listings: ListingStats,
    pub duration_secs: f64,
}

/// Result of a complete pipeline run
#[derive(Debug)]
pub struct PipelineResult {
    pub market: MarketTable,
    pub listings: Vec<EnrichedListing>,
    pub summary: RunSummary,
    pub output_files: Vec<PathBuf>,
}

pub struct Pipeline;

impl Pipeline {
    /// Clean the housing cost tables into the segment x bedroom market table.
    #[instrument(skip_all)]
    pub fn build_market_table(source: &dyn TableSource) -> Result<MarketTable> {
        info!("🏠 Cleaning the housing cost data");
        let bedroom_rows = source.bedroom_prices()?;
        let neighborhood_rows = source.neighborhood_prices()?;

        let factors = BedroomAdjuster::build(&bedroom_rows)?;
        MarketTableBuilder::build(&neighborhood_rows, &factors)
    }

    /// Build and write only the market table
    pub fn run_market(source: &dyn TableSource, sink: &dyn TableSink) -> Result<(MarketTable, Vec<PathBuf>)> {
        let market = Self::build_market_table(source)?;
        let files = sink.write(&RunOutput {
            market: &market,
            listings: None,
            summary: None,
        })?;
        Ok((market, files))
    }

    /// Run the full cleaning pipeline.
    ///
    /// Nothing is written unless every stage succeeds.
    #[instrument(skip_all)]
    pub fn run(source: &dyn TableSource, sink: &dyn TableSink, financing: &FinancingConfig) -> Result<PipelineResult> {
        info!("🚀 Starting cleaning process");
        let started = Instant::now();

        let market = Self::build_market_table(source)?;

        info!("🏘️ Cleaning the listing data");
        let raw_listings = source.listings()?;
        let calculator = FinancialCalculator::new(financing.clone());
        let mapper = NeighborhoodMapper::new();
        let (listings, stats) = ListingPipeline::run_with_stats(&raw_listings, &market, &mapper, &calculator)?;

        let summary = RunSummary {
            generated_at: Utc::now(),
            financing: financing.clone(),
            market_segments: market.len(),
            listings: stats,
            duration_secs: started.elapsed().as_secs_f64(),
        };

        let output_files = sink.write(&RunOutput {
            market: &market,
            listings: Some(&listings),
            summary: Some(&summary),
        })?;

        info!("✅ End cleaning process ({:.2}s)", summary.duration_secs);
        Ok(PipelineResult {
            market,
            listings,
            summary,
            output_files,
        })
    }
}
