//! Loading of the raw real-estate and listings tables.
//!
//! The processing stages only see typed rows; everything that knows about
//! file formats and raw column names lives here.

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::PathsConfig;
use crate::error::{AnalysisError, Result};
use crate::types::{BedroomCount, BedroomPriceRow, NeighborhoodPriceRow, RawListing};

/// Supplies the three raw input tables to the pipeline
pub trait TableSource {
    fn bedroom_prices(&self) -> Result<Vec<BedroomPriceRow>>;
    fn neighborhood_prices(&self) -> Result<Vec<NeighborhoodPriceRow>>;
    fn listings(&self) -> Result<Vec<RawListing>>;
}

#[derive(Debug, Deserialize)]
struct BedroomRecord {
    #[serde(rename = "Bedrooms")]
    bedrooms: String,
    #[serde(rename = "Median Sale Price")]
    median_price: String,
}

#[derive(Debug, Deserialize)]
struct NeighborhoodRecord {
    #[serde(rename = "Map Area")]
    map_area: String,
    #[serde(rename = "Median Price, 2020")]
    median_price: String,
}

#[derive(Debug, Deserialize)]
struct ListingRecord {
    id: String,
    #[serde(default)]
    name: String,
    neighbourhood_group_cleansed: String,
    property_type: String,
    room_type: String,
    bedrooms: Option<f64>,
    price: String,
    availability_30: u32,
}

/// Parse a whole-dollar amount such as `"$1,250,000"`.
pub fn parse_currency(raw: &str) -> Result<i64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned
        .parse::<i64>()
        .map_err(|_| AnalysisError::MalformedInput(format!("'{raw}' is not a currency amount")))
}

/// Parse a nightly rate, with or without currency formatting (`"$1,200.00"`, `"85"`).
pub fn parse_rate(raw: &str) -> Result<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '$' && *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate >= 0.0 => Ok(rate),
        _ => Err(AnalysisError::MalformedInput(format!("'{raw}' is not a nightly rate"))),
    }
}

fn parse_bedrooms(id: &str, raw: Option<f64>) -> Result<Option<u32>> {
    match raw {
        None => Ok(None),
        Some(b) if b >= 0.0 && b.fract() == 0.0 && b <= u32::MAX as f64 => Ok(Some(b as u32)),
        Some(b) => Err(AnalysisError::MalformedInput(format!(
            "listing {id} has a bedroom count of {b}"
        ))),
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Read the bedroom price table. Rows with a bedroom label outside 1..4 and
/// "5 or more" are ignored.
pub fn read_bedroom_prices<R: Read>(reader: R) -> Result<Vec<BedroomPriceRow>> {
    let mut rows = Vec::new();
    for record in csv_reader(reader).deserialize::<BedroomRecord>() {
        let record = record?;
        let Some(bedroom_count) = BedroomCount::from_label(&record.bedrooms) else {
            warn!("Ignoring bedroom price row with label '{}'", record.bedrooms);
            continue;
        };
        rows.push(BedroomPriceRow {
            bedroom_count,
            median_price: parse_currency(&record.median_price)?,
        });
    }
    Ok(rows)
}

pub fn read_neighborhood_prices<R: Read>(reader: R) -> Result<Vec<NeighborhoodPriceRow>> {
    csv_reader(reader)
        .deserialize::<NeighborhoodRecord>()
        .map(|record| -> Result<NeighborhoodPriceRow> {
            let record = record?;
            Ok(NeighborhoodPriceRow {
                median_price: parse_currency(&record.median_price)?,
                segment_name: record.map_area,
            })
        })
        .collect()
}

/// Read the listings export, projected to the fields the analysis uses.
pub fn read_listings<R: Read>(reader: R) -> Result<Vec<RawListing>> {
    csv_reader(reader)
        .deserialize::<ListingRecord>()
        .map(|record| -> Result<RawListing> {
            let record = record?;
            Ok(RawListing {
                bedroom_count: parse_bedrooms(&record.id, record.bedrooms)?,
                nightly_rate: parse_rate(&record.price)?,
                id: record.id,
                name: record.name,
                platform_neighborhood: record.neighbourhood_group_cleansed,
                property_type: record.property_type,
                room_type: record.room_type,
                availability_30: record.availability_30,
            })
        })
        .collect()
}

/// Reads the raw tables from CSV files on disk
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    pub bedroom_prices: PathBuf,
    pub neighborhood_prices: PathBuf,
    pub listings: PathBuf,
}

impl CsvTableSource {
    pub fn from_paths(paths: &PathsConfig) -> Self {
        Self {
            bedroom_prices: paths.bedroom_prices.clone(),
            neighborhood_prices: paths.neighborhood_prices.clone(),
            listings: paths.listings.clone(),
        }
    }

    fn open(path: &Path) -> Result<File> {
        debug!("Opening {}", path.display());
        File::open(path).map_err(|e| {
            AnalysisError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to open '{}': {}", path.display(), e),
            ))
        })
    }
}

impl TableSource for CsvTableSource {
    fn bedroom_prices(&self) -> Result<Vec<BedroomPriceRow>> {
        let rows = read_bedroom_prices(Self::open(&self.bedroom_prices)?)?;
        info!("Read {} bedroom price rows", rows.len());
        Ok(rows)
    }

    fn neighborhood_prices(&self) -> Result<Vec<NeighborhoodPriceRow>> {
        let rows = read_neighborhood_prices(Self::open(&self.neighborhood_prices)?)?;
        info!("Read {} neighborhood price rows", rows.len());
        Ok(rows)
    }

    fn listings(&self) -> Result<Vec<RawListing>> {
        let rows = read_listings(Self::open(&self.listings)?)?;
        info!("Read {} listings", rows.len());
        Ok(rows)
    }
}
