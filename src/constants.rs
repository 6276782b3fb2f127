//! Fixed filter values and file locations shared across the pipeline.

// Listing filters
pub const ALLOWED_PROPERTY_TYPES: [&str; 4] = ["Apartment", "House", "Cabin", "Condominium"];
pub const ENTIRE_HOME_ROOM_TYPE: &str = "Entire home/apt";
pub const MIN_BEDROOMS: u32 = 1;

/// Length of the availability window the listings export reports on.
pub const AVAILABILITY_WINDOW_DAYS: u32 = 30;

/// Longest loan term the financing config accepts
pub const MAX_LOAN_TERM_YEARS: u32 = 100;

/// Sentinel returned by the neighborhood mapper for unmapped labels
pub const OTHER_NEIGHBORHOOD: &str = "Other";

// Default file locations
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_BEDROOMS_PATH: &str = "data/raw/Home_Cost_by_Bedrooms.csv";
pub const DEFAULT_NEIGHBORHOODS_PATH: &str = "data/raw/Home_Cost_By_Neighborhood.csv";
pub const DEFAULT_LISTINGS_PATH: &str = "data/raw/listings.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "data/clean";

pub const MARKET_TABLE_FILE: &str = "seattle_housing_market_data.csv";
pub const LISTINGS_FILE: &str = "seattle_airbnb_listings.csv";
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";
