use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::{LISTINGS_FILE, MARKET_TABLE_FILE, RUN_SUMMARY_FILE};
use crate::error::Result;
use crate::pipeline::processing::market::MarketTable;
use crate::pipeline::RunSummary;
use crate::types::{BedroomCount, EnrichedListing};

/// Everything a run produces, handed to a sink in one piece
#[derive(Debug, Clone, Copy)]
pub struct RunOutput<'a> {
    pub market: &'a MarketTable,
    pub listings: Option<&'a [EnrichedListing]>,
    pub summary: Option<&'a RunSummary>,
}

/// Destination for the cleaned tables.
///
/// Implementations either write every artifact of a `RunOutput` or none.
pub trait TableSink {
    fn write(&self, output: &RunOutput<'_>) -> Result<Vec<PathBuf>>;
}

const MARKET_COLUMNS: [&str; 7] = [
    "neighborhood",
    "median_price",
    "one_br",
    "two_br",
    "three_br",
    "four_br",
    "five_plus_br",
];

const LISTING_COLUMNS: [&str; 13] = [
    "id",
    "name",
    "neighbourhood_group_cleansed",
    "property_type",
    "room_type",
    "bedrooms",
    "price",
    "availability_30",
    "days_occupied",
    "rpp",
    "re_neighborhood",
    "re_home_price",
    "noi",
];

#[derive(Debug, Serialize)]
struct MarketRow<'a> {
    neighborhood: &'a str,
    median_price: i64,
    one_br: Option<i64>,
    two_br: Option<i64>,
    three_br: Option<i64>,
    four_br: Option<i64>,
    five_plus_br: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ListingRow<'a> {
    id: &'a str,
    name: &'a str,
    neighbourhood_group_cleansed: &'a str,
    property_type: &'a str,
    room_type: &'a str,
    bedrooms: Option<u32>,
    price: f64,
    availability_30: u32,
    days_occupied: u32,
    rpp: f64,
    re_neighborhood: &'a str,
    re_home_price: i64,
    noi: f64,
}

/// CSV writer that emits `columns` up front, so an empty table still has
/// its header row.
fn table_writer<W: Write>(writer: W, columns: &[&str]) -> Result<csv::Writer<W>> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(columns)?;
    Ok(csv)
}

/// Write the market table, one row per segment in canonical order
pub fn write_market_csv<W: Write>(writer: W, market: &MarketTable) -> Result<()> {
    let mut csv = table_writer(writer, &MARKET_COLUMNS)?;
    for (segment, entry) in market.iter() {
        csv.serialize(MarketRow {
            neighborhood: segment.as_str(),
            median_price: entry.median_price,
            one_br: entry.price(BedroomCount::One),
            two_br: entry.price(BedroomCount::Two),
            three_br: entry.price(BedroomCount::Three),
            four_br: entry.price(BedroomCount::Four),
            five_plus_br: entry.price(BedroomCount::FivePlus),
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_listings_csv<W: Write>(writer: W, listings: &[EnrichedListing]) -> Result<()> {
    let mut csv = table_writer(writer, &LISTING_COLUMNS)?;
    for enriched in listings {
        let raw = &enriched.listing;
        csv.serialize(ListingRow {
            id: &raw.id,
            name: &raw.name,
            neighbourhood_group_cleansed: &raw.platform_neighborhood,
            property_type: &raw.property_type,
            room_type: &raw.room_type,
            bedrooms: raw.bedroom_count,
            price: raw.nightly_rate,
            availability_30: raw.availability_30,
            days_occupied: enriched.days_occupied,
            rpp: enriched.monthly_revenue,
            re_neighborhood: enriched.mapped_segment.as_str(),
            re_home_price: enriched.equivalent_home_price,
            noi: enriched.net_operating_income,
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes CSV tables and the JSON run summary into one directory
#[derive(Debug, Clone)]
pub struct CsvTableSink {
    output_dir: PathBuf,
}

impl CsvTableSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn staging_path(path: &Path) -> PathBuf {
        let mut staged = path.as_os_str().to_owned();
        staged.push(".tmp");
        PathBuf::from(staged)
    }

    /// Write every file to a `.tmp` sibling first and only rename once all
    /// writes have succeeded.
    ///
    /// Each rename is atomic but the set is not: if a rename fails, files
    /// already renamed stay in place and the remaining `.tmp` files are removed.
    fn write_staged(&self, files: Vec<(PathBuf, Vec<u8>)>) -> Result<Vec<PathBuf>> {
        let mut staged = Vec::with_capacity(files.len());
        for (path, bytes) in &files {
            let tmp = Self::staging_path(path);
            if let Err(e) = fs::write(&tmp, bytes) {
                for (tmp, _) in &staged {
                    let _ = fs::remove_file(tmp);
                }
                return Err(e.into());
            }
            debug!("Staged {}", tmp.display());
            staged.push((tmp, path.clone()));
        }

        let mut written = Vec::with_capacity(staged.len());
        for (i, (tmp, path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(tmp, path) {
                for (tmp, _) in &staged[i..] {
                    let _ = fs::remove_file(tmp);
                }
                return Err(e.into());
            }
            info!("💾 Wrote {}", path.display());
            written.push(path.clone());
        }
        Ok(written)
    }
}

impl TableSink for CsvTableSink {
    fn write(&self, output: &RunOutput<'_>) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;

        let mut files = Vec::new();

        let mut market_bytes = Vec::new();
        write_market_csv(&mut market_bytes, output.market)?;
        files.push((self.output_dir.join(MARKET_TABLE_FILE), market_bytes));

        if let Some(listings) = output.listings {
            let mut listing_bytes = Vec::new();
            write_listings_csv(&mut listing_bytes, listings)?;
            files.push((self.output_dir.join(LISTINGS_FILE), listing_bytes));
        }

        if let Some(summary) = output.summary {
            let json = serde_json::to_vec_pretty(summary)?;
            files.push((self.output_dir.join(RUN_SUMMARY_FILE), json));
        }

        self.write_staged(files)
    }
}
