use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use seattle_airbnb::config::{FinancingConfig, PathsConfig};
use seattle_airbnb::constants::{LISTINGS_FILE, MARKET_TABLE_FILE, RUN_SUMMARY_FILE};
use seattle_airbnb::error::AnalysisError;
use seattle_airbnb::pipeline::ingestion::CsvTableSource;
use seattle_airbnb::pipeline::output::CsvTableSink;
use seattle_airbnb::pipeline::Pipeline;
use seattle_airbnb::types::{BedroomCount, Segment};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn fixture_paths(output_dir: &Path) -> PathsConfig {
    PathsConfig {
        bedroom_prices: fixture("Home_Cost_by_Bedrooms.csv"),
        neighborhood_prices: fixture("Home_Cost_By_Neighborhood.csv"),
        listings: fixture("listings.csv"),
        output_dir: output_dir.to_path_buf(),
    }
}

#[test]
fn test_full_pipeline_on_fixtures() -> Result<()> {
    let temp_dir = tempdir()?;
    let paths = fixture_paths(&temp_dir.path().join("clean"));
    let source = CsvTableSource::from_paths(&paths);
    let sink = CsvTableSink::new(&paths.output_dir);

    let result = Pipeline::run(&source, &sink, &FinancingConfig::default())?;

    // 9 allow-listed segments out of 12 neighborhood rows
    assert_eq!(result.market.len(), 9);
    let north = result.market.get(Segment::NorthSeattle).unwrap();
    assert_eq!(north.price(BedroomCount::Two), Some(685_714));
    assert_eq!(north.price(BedroomCount::Three), Some(800_000));

    let ids: Vec<&str> = result.listings.iter().map(|l| l.listing.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "7"]);

    let northgate = &result.listings[0];
    assert_eq!(northgate.days_occupied, 20);
    assert_eq!(northgate.monthly_revenue, 2000.0);
    assert_eq!(northgate.equivalent_home_price, 685_714);
    assert_eq!(northgate.net_operating_income, -1795.96);

    let ballard = &result.listings[1];
    assert_eq!(ballard.mapped_segment, Segment::BallardGreenlake);
    assert_eq!(ballard.equivalent_home_price, 850_000);
    assert!((ballard.net_operating_income - 2292.51).abs() < 0.011);

    let cabin = &result.listings[2];
    assert_eq!(cabin.days_occupied, 0);
    assert_eq!(cabin.listing.nightly_rate, 1200.0);
    assert_eq!(cabin.equivalent_home_price, 900_000);
    assert!((cabin.net_operating_income + 4719.70).abs() < 0.011);

    let stats = &result.summary.listings;
    assert_eq!(stats.total_listings, 8);
    assert_eq!(stats.dropped_property_type, 1);
    assert_eq!(stats.dropped_room_type, 1);
    assert_eq!(stats.dropped_bedrooms, 2);
    assert_eq!(stats.dropped_neighborhood, 1);
    assert_eq!(stats.enriched_listings, 3);

    assert_eq!(result.output_files.len(), 3);

    let market_csv = fs::read_to_string(paths.output_dir.join(MARKET_TABLE_FILE))?;
    assert_eq!(market_csv.lines().count(), 10);
    assert!(market_csv.contains("North Seattle,800000,571428,685714,800000,914285,1028571"));

    let listings_csv = fs::read_to_string(paths.output_dir.join(LISTINGS_FILE))?;
    assert_eq!(listings_csv.lines().count(), 4);
    assert!(listings_csv.contains(",North Seattle,685714,-1795.96"));

    let summary: serde_json::Value = serde_json::from_str(&fs::read_to_string(paths.output_dir.join(RUN_SUMMARY_FILE))?)?;
    assert_eq!(summary["market_segments"], 9);
    assert_eq!(summary["listings"]["enriched_listings"], 3);
    assert_eq!(summary["financing"]["loan_term_years"], 30);

    Ok(())
}

#[test]
fn test_malformed_currency_writes_nothing() -> Result<()> {
    let temp_dir = tempdir()?;
    let raw_dir = temp_dir.path().join("raw");
    fs::create_dir_all(&raw_dir)?;

    let neighborhoods = fs::read_to_string(fixture("Home_Cost_By_Neighborhood.csv"))?
        .replace("\"$700,000\",\"$680,000\"", "\"seven hundred\",\"$680,000\"");
    fs::write(raw_dir.join("neighborhoods.csv"), neighborhoods)?;

    let mut paths = fixture_paths(&temp_dir.path().join("clean"));
    paths.neighborhood_prices = raw_dir.join("neighborhoods.csv");

    let source = CsvTableSource::from_paths(&paths);
    let sink = CsvTableSink::new(&paths.output_dir);
    let result = Pipeline::run(&source, &sink, &FinancingConfig::default());

    assert!(matches!(result, Err(AnalysisError::MalformedInput(_))));
    assert!(!paths.output_dir.exists());
    Ok(())
}

#[test]
fn test_missing_three_bedroom_basis_fails() -> Result<()> {
    let temp_dir = tempdir()?;
    let bedrooms = fs::read_to_string(fixture("Home_Cost_by_Bedrooms.csv"))?
        .lines()
        .filter(|line| !line.starts_with("3,"))
        .collect::<Vec<_>>()
        .join("\n");
    let bedrooms_path = temp_dir.path().join("bedrooms.csv");
    fs::write(&bedrooms_path, bedrooms)?;

    let mut paths = fixture_paths(&temp_dir.path().join("clean"));
    paths.bedroom_prices = bedrooms_path;

    let source = CsvTableSource::from_paths(&paths);
    let result = Pipeline::build_market_table(&source);
    assert!(matches!(result, Err(AnalysisError::MissingBasis)));
    Ok(())
}

#[test]
fn test_market_only_run() -> Result<()> {
    let temp_dir = tempdir()?;
    let paths = fixture_paths(temp_dir.path());
    let source = CsvTableSource::from_paths(&paths);
    let sink = CsvTableSink::new(&paths.output_dir);

    let (market, files) = Pipeline::run_market(&source, &sink)?;

    assert_eq!(market.len(), 9);
    assert_eq!(files, vec![temp_dir.path().join(MARKET_TABLE_FILE)]);
    assert!(!temp_dir.path().join(LISTINGS_FILE).exists());
    Ok(())
}

#[test]
fn test_custom_financing_changes_noi() -> Result<()> {
    let temp_dir = tempdir()?;
    let paths = fixture_paths(temp_dir.path());
    let source = CsvTableSource::from_paths(&paths);
    let sink = CsvTableSink::new(&paths.output_dir);

    let cheap_money = FinancingConfig {
        mortgage_annual_rate: 0.03,
        ..FinancingConfig::default()
    };
    let baseline = Pipeline::run(&source, &sink, &FinancingConfig::default())?;
    let cheaper = Pipeline::run(&source, &sink, &cheap_money)?;

    for (a, b) in baseline.listings.iter().zip(&cheaper.listings) {
        assert_eq!(a.monthly_revenue, b.monthly_revenue);
        assert!(b.net_operating_income > a.net_operating_income);
    }
    Ok(())
}
