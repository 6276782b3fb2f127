use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub financing: FinancingConfig,
    pub paths: PathsConfig,
}

/// Loan and operating assumptions applied to every listing in a run
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FinancingConfig {
    pub mortgage_annual_rate: f64,
    pub management_fee_fraction: f64,
    pub downpayment_fraction: f64,
    pub loan_term_years: u32,
}

impl Default for FinancingConfig {
    fn default() -> Self {
        Self {
            mortgage_annual_rate: 0.075,
            management_fee_fraction: 0.10,
            // 25% down for an investment property
            downpayment_fraction: 0.25,
            loan_term_years: 30,
        }
    }
}

impl FinancingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.mortgage_annual_rate > 0.0) {
            return Err(AnalysisError::Config(format!(
                "mortgage_annual_rate must be positive, got {}",
                self.mortgage_annual_rate
            )));
        }
        if !(1..=constants::MAX_LOAN_TERM_YEARS).contains(&self.loan_term_years) {
            return Err(AnalysisError::Config(format!(
                "loan_term_years must be between 1 and {}, got {}",
                constants::MAX_LOAN_TERM_YEARS,
                self.loan_term_years
            )));
        }
        for (name, value) in [
            ("management_fee_fraction", self.management_fee_fraction),
            ("downpayment_fraction", self.downpayment_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalysisError::Config(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub bedroom_prices: PathBuf,
    pub neighborhood_prices: PathBuf,
    pub listings: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            bedroom_prices: PathBuf::from(constants::DEFAULT_BEDROOMS_PATH),
            neighborhood_prices: PathBuf::from(constants::DEFAULT_NEIGHBORHOODS_PATH),
            listings: PathBuf::from(constants::DEFAULT_LISTINGS_PATH),
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            AnalysisError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml(&config_content)
    }

    /// Load `config.toml` from the working directory, falling back to defaults
    /// when it does not exist.
    pub fn load_or_default() -> Result<Self> {
        let path = Path::new(constants::DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.financing.validate()?;
        Ok(config)
    }
}
