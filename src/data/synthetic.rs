use chrono::{Duration, NaiveDate};
use rand::Rng;
use crate::data::types::HistoricalPoint;
use crate::model::types::round2;

const START_PRICE: f64 = 15_000.0;
const PRICE_FLOOR: f64 = 1_000.0;
const DAILY_SWING: f64 = 0.05;
/// Slightly below 0.5 so the walk drifts upward
const UPWARD_BIAS: f64 = 0.48;

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Generate a random-walk daily series from `start` through `as_of` inclusive.
///
/// Same shape as live data: one point per day, prices rounded to cents and
/// never below the floor. Returns an empty series when `as_of` precedes `start`.
pub fn generate_history<R: Rng>(
    rng: &mut R,
    start: NaiveDate,
    as_of: NaiveDate,
) -> Vec<HistoricalPoint> {
    let days = (as_of - start).num_days();
    if days < 0 {
        return Vec::new();
    }

    let mut price = START_PRICE;
    (0..=days)
        .map(|day| {
            let change = (rng.gen::<f64>() - UPWARD_BIAS) * (price * DAILY_SWING);
            price = (price + change).max(PRICE_FLOOR);

            HistoricalPoint {
                date: start + Duration::days(day),
                price: round2(price),
            }
        })
        .collect()
}
