use metrics::counter;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::finance::FinancialCalculator;
use super::market::MarketTable;
use super::neighborhood::NeighborhoodMapper;
use crate::constants::{ALLOWED_PROPERTY_TYPES, AVAILABILITY_WINDOW_DAYS, ENTIRE_HOME_ROOM_TYPE, MIN_BEDROOMS};
use crate::error::{AnalysisError, Result};
use crate::types::{EnrichedListing, RawListing, Segment};

/// Row counts for each filtering stage of a listings run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingStats {
    pub total_listings: usize,
    pub dropped_property_type: usize,
    pub dropped_room_type: usize,
    pub dropped_bedrooms: usize,
    pub dropped_neighborhood: usize,
    pub enriched_listings: usize,
}

pub fn is_allowed_property_type(listing: &RawListing) -> bool {
    ALLOWED_PROPERTY_TYPES.contains(&listing.property_type.as_str())
}

pub fn is_entire_home(listing: &RawListing) -> bool {
    listing.room_type == ENTIRE_HOME_ROOM_TYPE
}

pub fn has_bedrooms(listing: &RawListing) -> bool {
    listing.bedroom_count.is_some_and(|b| b >= MIN_BEDROOMS)
}

/// Nights booked in the 30 day window
pub fn days_occupied(listing: &RawListing) -> Result<u32> {
    AVAILABILITY_WINDOW_DAYS
        .checked_sub(listing.availability_30)
        .ok_or_else(|| {
            AnalysisError::MalformedInput(format!(
                "listing {} has availability_30 = {}, expected 0..={}",
                listing.id, listing.availability_30, AVAILABILITY_WINDOW_DAYS
            ))
        })
}

pub struct ListingPipeline;

impl ListingPipeline {
    /// Filter raw listings and derive investment metrics for the survivors.
    ///
    /// Output order follows input order.
    pub fn run(
        raw_listings: &[RawListing],
        market: &MarketTable,
        mapper: &NeighborhoodMapper,
        calculator: &FinancialCalculator,
    ) -> Result<Vec<EnrichedListing>> {
        Self::run_with_stats(raw_listings, market, mapper, calculator).map(|(listings, _)| listings)
    }

    #[instrument(skip_all, fields(listings = raw_listings.len()))]
    pub fn run_with_stats(
        raw_listings: &[RawListing],
        market: &MarketTable,
        mapper: &NeighborhoodMapper,
        calculator: &FinancialCalculator,
    ) -> Result<(Vec<EnrichedListing>, ListingStats)> {
        let mut stats = ListingStats {
            total_listings: raw_listings.len(),
            ..ListingStats::default()
        };

        debug!("Filtering out the property types we don't analyze");
        let working: Vec<&RawListing> = raw_listings.iter().filter(|l| is_allowed_property_type(l)).collect();
        stats.dropped_property_type = raw_listings.len() - working.len();

        debug!("Filtering out listings that are not the entire home");
        let before = working.len();
        let working: Vec<&RawListing> = working.into_iter().filter(|l| is_entire_home(l)).collect();
        stats.dropped_room_type = before - working.len();

        debug!("Filtering out listings without bedrooms");
        let before = working.len();
        let working: Vec<&RawListing> = working.into_iter().filter(|l| has_bedrooms(l)).collect();
        stats.dropped_bedrooms = before - working.len();

        debug!("Computing days occupied");
        let occupied = working
            .into_iter()
            .map(|l| days_occupied(l).map(|days| (l, days)))
            .collect::<Result<Vec<_>>>()?;

        debug!("Mapping platform neighborhoods to market segments");
        let before = occupied.len();
        let mapped: Vec<(&RawListing, u32, Segment)> = occupied
            .into_iter()
            .filter_map(|(l, days)| mapper.lookup(&l.platform_neighborhood).map(|segment| (l, days, segment)))
            .collect();
        stats.dropped_neighborhood = before - mapped.len();

        debug!("Computing revenue, home price and net operating income");
        let enriched = mapped
            .into_iter()
            .map(|(listing, days, segment)| Self::enrich(listing, days, segment, market, calculator))
            .collect::<Result<Vec<_>>>()?;
        stats.enriched_listings = enriched.len();

        record_stats(&stats);
        info!(
            "Enriched {} of {} listings ({} property type, {} room type, {} bedrooms, {} neighborhood dropped)",
            stats.enriched_listings,
            stats.total_listings,
            stats.dropped_property_type,
            stats.dropped_room_type,
            stats.dropped_bedrooms,
            stats.dropped_neighborhood
        );

        Ok((enriched, stats))
    }

    fn enrich(
        listing: &RawListing,
        days_occupied: u32,
        segment: Segment,
        market: &MarketTable,
        calculator: &FinancialCalculator,
    ) -> Result<EnrichedListing> {
        // has_bedrooms already guaranteed a count
        let bedrooms = listing.bedroom_count.unwrap_or(MIN_BEDROOMS);

        let monthly_revenue = calculator.revenue_per_property(listing.nightly_rate, days_occupied);
        let equivalent_home_price = calculator.home_price_for(segment, bedrooms, market)?;
        let net_operating_income =
            calculator.net_operating_income(listing.nightly_rate, days_occupied, equivalent_home_price)?;

        Ok(EnrichedListing {
            listing: listing.clone(),
            days_occupied,
            monthly_revenue,
            mapped_segment: segment,
            equivalent_home_price,
            net_operating_income,
        })
    }
}

fn record_stats(stats: &ListingStats) {
    counter!("listings_read_total").increment(stats.total_listings as u64);
    counter!("listings_dropped_total", "stage" => "property_type").increment(stats.dropped_property_type as u64);
    counter!("listings_dropped_total", "stage" => "room_type").increment(stats.dropped_room_type as u64);
    counter!("listings_dropped_total", "stage" => "bedrooms").increment(stats.dropped_bedrooms as u64);
    counter!("listings_dropped_total", "stage" => "neighborhood").increment(stats.dropped_neighborhood as u64);
    counter!("listings_enriched_total").increment(stats.enriched_listings as u64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FinancingConfig;
    use crate::pipeline::processing::bedroom::BedroomAdjuster;
    use crate::pipeline::processing::market::MarketTableBuilder;
    use crate::types::{BedroomCount, BedroomPriceRow, NeighborhoodPriceRow};

    fn market() -> MarketTable {
        let bedrooms: Vec<BedroomPriceRow> = [500_000, 600_000, 700_000, 800_000, 900_000]
            .into_iter()
            .zip(BedroomCount::ALL)
            .map(|(median_price, bedroom_count)| BedroomPriceRow { bedroom_count, median_price })
            .collect();
        let factors = BedroomAdjuster::build(&bedrooms).unwrap();
        let rows: Vec<NeighborhoodPriceRow> = Segment::ALL
            .iter()
            .map(|s| NeighborhoodPriceRow {
                segment_name: s.as_str().to_string(),
                median_price: 800_000,
            })
            .collect();
        MarketTableBuilder::build(&rows, &factors).unwrap()
    }

    fn listing(id: &str) -> RawListing {
        RawListing {
            id: id.to_string(),
            name: format!("Listing {id}"),
            platform_neighborhood: "Northgate".to_string(),
            property_type: "Apartment".to_string(),
            room_type: "Entire home/apt".to_string(),
            bedroom_count: Some(2),
            nightly_rate: 100.0,
            availability_30: 10,
        }
    }

    fn run(listings: &[RawListing]) -> Result<(Vec<EnrichedListing>, ListingStats)> {
        let calculator = FinancialCalculator::new(FinancingConfig::default());
        ListingPipeline::run_with_stats(listings, &market(), &NeighborhoodMapper::new(), &calculator)
    }

    #[test]
    fn test_enriches_valid_listing() {
        let (enriched, stats) = run(&[listing("1")]).unwrap();

        assert_eq!(enriched.len(), 1);
        let e = &enriched[0];
        assert_eq!(e.days_occupied, 20);
        assert_eq!(e.monthly_revenue, 2000.0);
        assert_eq!(e.mapped_segment, Segment::NorthSeattle);
        assert_eq!(e.equivalent_home_price, 685_714);
        assert_eq!(e.net_operating_income, -1795.96);
        assert_eq!(stats.enriched_listings, 1);
    }

    #[test]
    fn test_shared_room_excluded() {
        let mut shared = listing("1");
        shared.room_type = "Shared room".to_string();

        let (enriched, stats) = run(&[shared]).unwrap();
        assert!(enriched.is_empty());
        assert_eq!(stats.dropped_room_type, 1);
    }

    #[test]
    fn test_zero_and_missing_bedrooms_excluded() {
        let mut studio = listing("1");
        studio.bedroom_count = Some(0);
        let mut unknown = listing("2");
        unknown.bedroom_count = None;

        let (enriched, stats) = run(&[studio, unknown]).unwrap();
        assert!(enriched.is_empty());
        assert_eq!(stats.dropped_bedrooms, 2);
    }

    #[test]
    fn test_property_type_and_neighborhood_filters() {
        let mut boat = listing("1");
        boat.property_type = "Boat".to_string();
        let mut elsewhere = listing("2");
        elsewhere.platform_neighborhood = "Other neighborhoods".to_string();
        let kept = listing("3");

        let (enriched, stats) = run(&[boat, elsewhere, kept]).unwrap();
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].listing.id, "3");
        assert_eq!(stats.dropped_property_type, 1);
        assert_eq!(stats.dropped_neighborhood, 1);
    }

    #[test]
    fn test_order_preserved_and_days_invariant() {
        let listings: Vec<RawListing> = (0..=30)
            .map(|availability| RawListing {
                availability_30: availability,
                ..listing(&availability.to_string())
            })
            .collect();

        let (enriched, _) = run(&listings).unwrap();
        assert_eq!(enriched.len(), 31);
        for (e, raw) in enriched.iter().zip(&listings) {
            assert_eq!(e.listing.id, raw.id);
            assert_eq!(e.days_occupied + raw.availability_30, 30);
            assert_eq!(e.monthly_revenue, raw.nightly_rate * e.days_occupied as f64);
        }
    }

    #[test]
    fn test_availability_over_window_is_malformed() {
        let mut bad = listing("1");
        bad.availability_30 = 31;
        assert!(matches!(run(&[bad]), Err(AnalysisError::MalformedInput(_))));
    }

    #[test]
    fn test_segment_missing_from_market_is_error() {
        let calculator = FinancialCalculator::new(FinancingConfig::default());
        let result = ListingPipeline::run(
            &[listing("1")],
            &MarketTable::default(),
            &NeighborhoodMapper::new(),
            &calculator,
        );
        assert!(matches!(result, Err(AnalysisError::UnknownSegment(_))));
    }
}
