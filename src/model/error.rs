/// Precondition violations raised by the forecasting engine.
///
/// None of these are retried; the caller has to supply valid input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    #[error("Series too short: need at least 2 prices, got {0}")]
    TooFewPoints(usize),

    #[error("Non-positive price {price} at index {index}")]
    NonPositivePrice { index: usize, price: f64 },

    #[error("Invalid horizon: {0} years (must be at least 1)")]
    InvalidHorizon(u32),

    #[error("Smoothing window must be at least 1")]
    InvalidWindow,

    #[error("Degenerate fit: index axis has zero variance over {0} points")]
    DegenerateFit(usize),
}

/// Reject any price that is not strictly positive (NaN included)
pub fn ensure_positive(prices: &[f64]) -> Result<(), ForecastError> {
    match prices.iter().position(|p| !(*p > 0.0)) {
        Some(index) => Err(ForecastError::NonPositivePrice {
            index,
            price: prices[index],
        }),
        None => Ok(()),
    }
}
