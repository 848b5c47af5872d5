use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Where a historical series came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Live,
    Synthetic,
}

impl std::fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataOrigin::Live => write!(f, "live (CoinGecko)"),
            DataOrigin::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// A loaded series together with its origin
#[derive(Debug, Clone)]
pub struct History {
    pub points: Vec<HistoricalPoint>,
    pub origin: DataOrigin,
}

impl History {
    pub fn last(&self) -> Option<&HistoricalPoint> {
        self.points.last()
    }
}
