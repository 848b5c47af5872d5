use crate::model::error::{ensure_positive, ForecastError};
use crate::model::types::TrendFit;
use tracing::debug;

/// Trailing window used to smooth daily prices before fitting
pub const SMOOTHING_WINDOW: usize = 30;

/// Trailing simple moving average.
/// Positions before the first full window keep their raw value.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            if window == 0 || i + 1 < window {
                value
            } else {
                let slice = &values[i + 1 - window..=i];
                slice.iter().sum::<f64>() / window as f64
            }
        })
        .collect()
}

/// Fit the log-linear trend with the default 30-day smoothing window
pub fn fit(prices: &[f64]) -> Result<TrendFit, ForecastError> {
    fit_with_window(prices, SMOOTHING_WINDOW)
}

/// Smooth, take natural logs, then fit OLS of ln(price) against the 0-based index
pub fn fit_with_window(prices: &[f64], window: usize) -> Result<TrendFit, ForecastError> {
    if prices.len() < 2 {
        return Err(ForecastError::TooFewPoints(prices.len()));
    }
    if window == 0 {
        return Err(ForecastError::InvalidWindow);
    }
    ensure_positive(prices)?;

    let log_prices: Vec<f64> = moving_average(prices, window)
        .into_iter()
        .map(f64::ln)
        .collect();

    let trend = linear_regression(&log_prices)?;
    debug!(
        "Trend fit over {} points: slope={:.6}, intercept={:.4}, r2={:.4}",
        prices.len(),
        trend.slope,
        trend.intercept,
        trend.fit_quality
    );
    Ok(trend)
}

/// Closed-form least squares of `ys` against x = 0, 1, 2, ...
fn linear_regression(ys: &[f64]) -> Result<TrendFit, ForecastError> {
    let n = ys.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);

    for (i, &y) in ys.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Err(ForecastError::DegenerateFit(ys.len()));
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    let y_mean = sum_y / n;
    let mut total_variation = 0.0;
    let mut explained_variation = 0.0;
    for (i, &y) in ys.iter().enumerate() {
        let fitted = slope * i as f64 + intercept;
        total_variation += (y - y_mean).powi(2);
        explained_variation += (fitted - y_mean).powi(2);
    }

    // A flat series is reproduced exactly by a flat line
    let fit_quality = if total_variation > f64::EPSILON {
        explained_variation / total_variation
    } else {
        1.0
    };

    Ok(TrendFit {
        slope,
        intercept,
        fit_quality,
    })
}
