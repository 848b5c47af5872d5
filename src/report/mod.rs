pub mod console;
pub mod csv;

use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::data::types::{DataOrigin, HistoricalPoint};
use crate::model::ForecastOutcome;

/// A forecast run as handed to presentation: read-only, timestamped
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub generated_at: DateTime<Utc>,
    pub origin: DataOrigin,
    pub horizon_years: u32,
    pub last_historical: Option<HistoricalPoint>,
    #[serde(flatten)]
    pub outcome: ForecastOutcome,
}

impl ForecastReport {
    pub fn new(
        generated_at: DateTime<Utc>,
        origin: DataOrigin,
        horizon_years: u32,
        history: &[HistoricalPoint],
        outcome: ForecastOutcome,
    ) -> Self {
        Self {
            generated_at,
            origin,
            horizon_years,
            last_historical: history.last().copied(),
            outcome,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{ForecastPoint, TrendFit};
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_json_shape() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let outcome = ForecastOutcome {
            trend: TrendFit { slope: 0.001, intercept: 10.0, fit_quality: 0.9 },
            volatility: 0.03,
            points: vec![ForecastPoint {
                date,
                price: 101.5,
                upper_bound: 104.0,
                lower_bound: 99.0,
            }],
            summary: None,
        };
        let report = ForecastReport::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
            DataOrigin::Synthetic,
            1,
            &[],
            outcome,
        );

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["origin"], "synthetic");
        assert_eq!(value["horizon_years"], 1);
        assert_eq!(value["points"][0]["date"], "2025-01-02");
        assert_eq!(value["points"][0]["upper_bound"], 104.0);
        assert_eq!(value["trend"]["fit_quality"], 0.9);
        assert!(value["summary"].is_null());
        assert!(value["last_historical"].is_null());
    }
}
