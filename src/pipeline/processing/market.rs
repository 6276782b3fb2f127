use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::bedroom::BedroomFactors;
use crate::error::{AnalysisError, Result};
use crate::types::{BedroomCount, NeighborhoodPriceRow, Segment};

/// Home prices for one market segment
#[derive(Debug, Clone, PartialEq)]
pub struct MarketEntry {
    pub median_price: i64,
    pub price_by_bedroom: BTreeMap<BedroomCount, i64>,
}

impl MarketEntry {
    pub fn price(&self, bedrooms: BedroomCount) -> Option<i64> {
        self.price_by_bedroom.get(&bedrooms).copied()
    }
}

/// Segment x bedroom count -> equivalent home price.
///
/// Built once per run and read-only afterwards. Iteration follows the
/// canonical segment order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketTable {
    entries: BTreeMap<Segment, MarketEntry>,
}

impl MarketTable {
    pub fn get(&self, segment: Segment) -> Option<&MarketEntry> {
        self.entries.get(&segment)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Segment, &MarketEntry)> {
        self.entries.iter().map(|(segment, entry)| (*segment, entry))
    }
}

pub struct MarketTableBuilder;

impl MarketTableBuilder {
    /// Combine the neighborhood price table with bedroom adjustment factors.
    ///
    /// Rows whose name is not one of the canonical segments are dropped.
    /// If a segment appears more than once, the last row wins.
    pub fn build(rows: &[NeighborhoodPriceRow], factors: &BedroomFactors) -> Result<MarketTable> {
        if let Some(missing) = BedroomCount::ALL.into_iter().find(|c| !factors.contains_key(c)) {
            return Err(AnalysisError::IncompleteAdjustment(missing));
        }

        let mut entries = BTreeMap::new();
        let mut dropped = 0usize;

        for row in rows {
            let Some(segment) = Segment::from_name(&row.segment_name) else {
                debug!("Dropping neighborhood outside the segment list: {}", row.segment_name);
                dropped += 1;
                continue;
            };

            let price_by_bedroom: BTreeMap<BedroomCount, i64> = BedroomCount::ALL
                .into_iter()
                .map(|count| (count, adjusted_price(row.median_price, factors[&count])))
                .collect();
            for (count, price) in &price_by_bedroom {
                debug!("{} {} = {}", segment, count.column(), price);
            }

            let entry = MarketEntry {
                median_price: row.median_price,
                price_by_bedroom,
            };
            if entries.insert(segment, entry).is_some() {
                warn!("Duplicate neighborhood price row for {}; keeping the last one", segment);
            }
        }

        info!(
            "Built market table with {} segments ({} neighborhood rows dropped)",
            entries.len(),
            dropped
        );
        Ok(MarketTable { entries })
    }
}

/// Scale a median price and truncate toward zero to whole currency units
fn adjusted_price(median_price: i64, factor: f64) -> i64 {
    (median_price as f64 * factor).trunc() as i64
}
