use crate::model::projection::DAYS_PER_YEAR;
use crate::model::types::{round2, ForecastPoint, ForecastSummary};

const ONE_YEAR_INDEX: usize = DAYS_PER_YEAR - 1;
const FIVE_YEAR_INDEX: usize = 5 * DAYS_PER_YEAR - 1;

/// Reduce a forecast to headline figures.
///
/// Returns `None` for an empty forecast. Milestones past the end of a short
/// horizon fall back to the last available point.
pub fn summarize(points: &[ForecastPoint]) -> Option<ForecastSummary> {
    let first = points.first()?;
    let last = points.last()?;

    let growth_percent = round2((last.price / first.price - 1.0) * 100.0);

    let max_upper_bound = points
        .iter()
        .map(|p| p.upper_bound)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_lower_bound = points
        .iter()
        .map(|p| p.lower_bound)
        .fold(f64::INFINITY, f64::min);

    let milestone = |index: usize| points[index.min(points.len() - 1)].price;

    Some(ForecastSummary {
        start_price: first.price,
        end_price: last.price,
        growth_percent,
        max_upper_bound,
        min_lower_bound,
        day_365_price: milestone(ONE_YEAR_INDEX),
        day_1825_price: milestone(FIVE_YEAR_INDEX),
    })
}
