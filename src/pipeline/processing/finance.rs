use crate::config::FinancingConfig;
use crate::error::{AnalysisError, Result};
use crate::pipeline::processing::market::MarketTable;
use crate::types::{BedroomCount, Segment};

/// Per-listing investment arithmetic under one set of financing assumptions.
///
/// The configuration is fixed at construction and shared by every listing in
/// a run.
#[derive(Debug, Clone)]
pub struct FinancialCalculator {
    config: FinancingConfig,
}

impl FinancialCalculator {
    pub fn new(config: FinancingConfig) -> Self {
        Self { config }
    }

    /// Revenue per property for the month: nightly rate times nights booked
    pub fn revenue_per_property(&self, nightly_rate: f64, days_occupied: u32) -> f64 {
        nightly_rate * days_occupied as f64
    }

    pub fn downpayment(&self, home_price: f64) -> f64 {
        home_price * self.config.downpayment_fraction
    }

    /// Fixed-rate amortized monthly payment on `loan_amount`.
    ///
    /// Zero and negative rates are rejected rather than special-cased.
    pub fn monthly_mortgage_payment(&self, loan_amount: f64) -> Result<f64> {
        let r = self.config.mortgage_annual_rate / 12.0;
        if !(r > 0.0) {
            return Err(AnalysisError::InvalidLoanParameters(format!(
                "monthly rate must be positive, got {r}"
            )));
        }

        let years = self.config.loan_term_years;
        let n = years
            .checked_mul(12)
            .and_then(|months| i32::try_from(months).ok())
            .ok_or_else(|| {
                AnalysisError::InvalidLoanParameters(format!("loan term of {years} years is out of range"))
            })?;
        if n == 0 {
            return Err(AnalysisError::InvalidLoanParameters(
                "loan term must be at least one month".to_string(),
            ));
        }

        let growth = (1.0 + r).powi(n);
        Ok(loan_amount * r * growth / (growth - 1.0))
    }

    /// Monthly revenue less mortgage payment and management fee, rounded to cents
    pub fn net_operating_income(&self, nightly_rate: f64, days_occupied: u32, home_price: i64) -> Result<f64> {
        let home_price = home_price as f64;
        let loan_amount = home_price - self.downpayment(home_price);
        let mortgage_expense = self.monthly_mortgage_payment(loan_amount)?;

        let monthly_revenue = self.revenue_per_property(nightly_rate, days_occupied);
        let management_expense = monthly_revenue * self.config.management_fee_fraction;

        Ok(round_cents(monthly_revenue - mortgage_expense - management_expense))
    }

    /// Equivalent home price for a listing's segment and bedroom count.
    pub fn home_price_for(&self, segment: Segment, bedrooms: u32, market: &MarketTable) -> Result<i64> {
        let bucket = BedroomCount::bucket(bedrooms);
        market
            .get(segment)
            .ok_or_else(|| AnalysisError::UnknownSegment(segment.to_string()))?
            .price(bucket)
            .ok_or(AnalysisError::IncompleteAdjustment(bucket))
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
