use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Line fitted in (index, ln price) space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
    pub fit_quality: f64,
}

impl TrendFit {
    /// Projected price at a position on the fitted index axis
    pub fn price_at(&self, index: f64) -> f64 {
        (self.slope * index + self.intercept).exp()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub start_price: f64,
    pub end_price: f64,
    pub growth_percent: f64,
    pub max_upper_bound: f64,
    pub min_lower_bound: f64,
    pub day_365_price: f64,
    pub day_1825_price: f64,
}

impl ForecastSummary {
    pub fn is_growth(&self) -> bool {
        self.growth_percent > 0.0
    }
}

/// Round to cents, the precision every emitted price carries
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
