use chrono::{Duration, NaiveDate};
use crate::model::error::{ensure_positive, ForecastError};
use crate::model::types::{round2, ForecastPoint, TrendFit};

/// Calendar simplification: every forecast year is 365 days
pub const DAYS_PER_YEAR: usize = 365;

/// Volatility assumed when there are not enough prices to measure one
pub const FALLBACK_VOLATILITY: f64 = 0.1;

/// Population standard deviation of daily log returns
pub fn volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return FALLBACK_VOLATILITY;
    }

    let returns: Vec<f64> = prices
        .windows(2)
        .map(|pair| (pair[1] / pair[0]).ln())
        .collect();

    let mean_return = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| (r - mean_return).powi(2))
        .sum::<f64>()
        / returns.len() as f64;

    variance.sqrt()
}

/// Project the trend forward one day at a time over `horizon_years * 365` days.
///
/// The index axis continues from the fit: the first forecast day sits at
/// index `n`, where `n` is the number of historical prices. The confidence
/// band widens with the square root of elapsed days, scaled by the projected
/// price, and the lower bound is floored at zero.
pub fn forecast(
    historical_prices: &[f64],
    trend: &TrendFit,
    last_date: NaiveDate,
    horizon_years: u32,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    if horizon_years < 1 {
        return Err(ForecastError::InvalidHorizon(horizon_years));
    }
    ensure_positive(historical_prices)?;

    let volatility = volatility(historical_prices);
    let last_index = historical_prices.len() as f64 - 1.0;
    let days = horizon_years as usize * DAYS_PER_YEAR;

    let points = (1..=days)
        .map(|day| {
            let price = trend.price_at(last_index + day as f64);
            let width = volatility * (day as f64).sqrt() * price;

            ForecastPoint {
                date: last_date + Duration::days(day as i64),
                price: round2(price),
                upper_bound: round2(price + width),
                lower_bound: round2((price - width).max(0.0)),
            }
        })
        .collect();

    Ok(points)
}
