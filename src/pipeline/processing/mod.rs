// Pipeline processing: market table construction and listing enrichment

pub mod bedroom;
pub mod finance;
pub mod listings;
pub mod market;
pub mod neighborhood;

pub use bedroom::{BedroomAdjuster, BedroomFactors};
pub use finance::FinancialCalculator;
pub use listings::{ListingPipeline, ListingStats};
pub use market::{MarketEntry, MarketTable, MarketTableBuilder};
pub use neighborhood::NeighborhoodMapper;
