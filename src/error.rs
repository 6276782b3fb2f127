use thiserror::Error;

use crate::types::BedroomCount;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Bedroom price table has no 3 bedroom row to use as the price basis")]
    MissingBasis,

    #[error("Bedroom price basis must be positive, got {0}")]
    InvalidBasis(i64),

    #[error("No bedroom adjustment factor for {0} bedrooms")]
    IncompleteAdjustment(BedroomCount),

    #[error("Segment '{0}' is not in the market table")]
    UnknownSegment(String),

    #[error("Invalid loan parameters: {0}")]
    InvalidLoanParameters(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
