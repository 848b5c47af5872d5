use anyhow::{Context, Result};
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use crate::data::types::HistoricalPoint;
use crate::model::types::round2;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    vs_currency: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// `[unix_ms, price]` pairs
    prices: Vec<(f64, f64)>,
}

impl CoinGeckoClient {
    pub fn new(
        base_url: String,
        vs_currency: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("btc-forecast/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            vs_currency,
            api_key,
        })
    }

    fn market_chart_url(&self, days: u32) -> String {
        format!(
            "{}/coins/bitcoin/market_chart?vs_currency={}&days={}&interval=daily",
            self.base_url, self.vs_currency, days
        )
    }

    /// Fetch daily Bitcoin prices for the last `days` days
    pub async fn fetch_daily_prices(&self, days: u32) -> Result<Vec<HistoricalPoint>> {
        let url = self.market_chart_url(days);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response: MarketChartResponse = request
            .send()
            .await
            .context("Failed to fetch Bitcoin data")?
            .error_for_status()
            .context("CoinGecko returned an error status")?
            .json()
            .await
            .context("Failed to parse market chart response")?;

        convert_market_chart(response)
    }
}

/// Convert raw `[ms, price]` pairs into a chronological daily series.
///
/// CoinGecko appends the live price for today after the daily close, so a
/// repeated date keeps the latest observation.
fn convert_market_chart(response: MarketChartResponse) -> Result<Vec<HistoricalPoint>> {
    let mut points: Vec<HistoricalPoint> = Vec::with_capacity(response.prices.len());

    for (timestamp_ms, price) in response.prices {
        let date = DateTime::from_timestamp_millis(timestamp_ms as i64)
            .with_context(|| format!("Invalid timestamp: {}", timestamp_ms))?
            .date_naive();

        if !(price > 0.0) {
            anyhow::bail!("Non-positive price {} on {}", price, date);
        }

        let point = HistoricalPoint {
            date,
            price: round2(price),
        };

        if let Some(last) = points.last_mut() {
            if last.date == date {
                *last = point;
                continue;
            }
            if last.date > date {
                anyhow::bail!("Prices out of order: {} after {}", date, last.date);
            }
        }
        points.push(point);
    }

    // The trend fit needs at least two days
    if points.len() < 2 {
        anyhow::bail!("CoinGecko returned {} daily prices, need at least 2", points.len());
    }

    Ok(points)
}
