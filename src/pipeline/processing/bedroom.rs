use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::types::{BedroomCount, BedroomPriceRow};

/// Price-scaling factor per bedroom count, relative to the 3 bedroom median
pub type BedroomFactors = BTreeMap<BedroomCount, f64>;

pub struct BedroomAdjuster;

impl BedroomAdjuster {
    /// Derive adjustment factors from the bedroom price table.
    ///
    /// The 3 bedroom row is the basis, so its factor is exactly 1.0.
    pub fn build(rows: &[BedroomPriceRow]) -> Result<BedroomFactors> {
        let basis = rows
            .iter()
            .find(|row| row.bedroom_count == BedroomCount::Three)
            .map(|row| row.median_price)
            .ok_or(AnalysisError::MissingBasis)?;

        if basis <= 0 {
            return Err(AnalysisError::InvalidBasis(basis));
        }
        debug!("Bedroom price basis: {}", basis);

        let mut factors = BedroomFactors::new();
        for row in rows {
            let factor = row.median_price as f64 / basis as f64;
            if factors.insert(row.bedroom_count, factor).is_some() {
                return Err(AnalysisError::MalformedInput(format!(
                    "bedroom price table has more than one row for {} bedrooms",
                    row.bedroom_count
                )));
            }
            debug!("Adjustment for {} bedrooms: {:.6}", row.bedroom_count, factor);
        }

        Ok(factors)
    }
}
