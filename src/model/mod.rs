//! Forecasting engine: smoothing, log-linear trend fit, projection with
//! volatility bands, and the headline summary.
//!
//! Every function here is pure. Calling it again with new input yields a new,
//! independent result.

pub mod error;
pub mod projection;
pub mod summary;
pub mod trend;
pub mod types;

use crate::data::types::HistoricalPoint;
use error::ForecastError;
use serde::Serialize;
use types::{ForecastPoint, ForecastSummary, TrendFit};

pub use projection::forecast;
pub use summary::summarize;
pub use trend::fit_with_window;

/// Everything one forecast run produces
#[derive(Debug, Clone, Serialize)]
pub struct ForecastOutcome {
    pub trend: TrendFit,
    pub volatility: f64,
    pub points: Vec<ForecastPoint>,
    pub summary: Option<ForecastSummary>,
}

/// Fit, project and summarize in one pass over a historical series
pub fn run(
    history: &[HistoricalPoint],
    horizon_years: u32,
    window: usize,
) -> Result<ForecastOutcome, ForecastError> {
    let prices: Vec<f64> = history.iter().map(|p| p.price).collect();
    let trend = fit_with_window(&prices, window)?;

    let last_date = history
        .last()
        .map(|p| p.date)
        .ok_or(ForecastError::TooFewPoints(0))?;

    let points = forecast(&prices, &trend, last_date, horizon_years)?;
    let summary = summarize(&points);

    Ok(ForecastOutcome {
        trend,
        volatility: projection::volatility(&prices),
        points,
        summary,
    })
}
