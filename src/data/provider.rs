use anyhow::Result;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, info, warn};
use crate::data::cache::HistoryCache;
use crate::data::coingecko::CoinGeckoClient;
use crate::data::synthetic::{default_start_date, generate_history};
use crate::data::types::{DataOrigin, History};

/// Supplies the forecasting engine with a non-empty chronological series.
///
/// Live data comes from CoinGecko. When the fetch fails and fallback is
/// enabled, a synthetic random walk is substituted and a warning is logged;
/// the engine never sees the failure.
pub struct HistoryProvider {
    client: CoinGeckoClient,
    cache: HistoryCache,
    fallback_to_synthetic: bool,
}

impl HistoryProvider {
    pub fn new(client: CoinGeckoClient, cache_ttl: Duration, fallback_to_synthetic: bool) -> Self {
        Self {
            client,
            cache: HistoryCache::new(cache_ttl),
            fallback_to_synthetic,
        }
    }

    /// Load `days` of history, reusing a cached copy while it is fresh
    pub async fn load(&self, days: u32, as_of: NaiveDate) -> Result<History> {
        if let Some(history) = self.cache.get(days) {
            debug!("Using cached history ({} points)", history.points.len());
            return Ok(history);
        }

        let history = self.fetch_or_synthesize(days, as_of).await?;
        self.cache.insert(days, history.clone());
        Ok(history)
    }

    /// Discard cached history and load again
    pub async fn refresh(&self, days: u32, as_of: NaiveDate) -> Result<History> {
        self.cache.clear();
        self.load(days, as_of).await
    }

    async fn fetch_or_synthesize(&self, days: u32, as_of: NaiveDate) -> Result<History> {
        match self.client.fetch_daily_prices(days).await {
            Ok(points) => {
                info!("Loaded {} daily prices from CoinGecko", points.len());
                Ok(History {
                    points,
                    origin: DataOrigin::Live,
                })
            }
            Err(e) if self.fallback_to_synthetic => {
                warn!(
                    "Failed to fetch Bitcoin historical data. Using mock data instead: {:#}",
                    e
                );
                let points = generate_history(&mut rand::thread_rng(), default_start_date(), as_of);
                Ok(History {
                    points,
                    origin: DataOrigin::Synthetic,
                })
            }
            Err(e) => Err(e),
        }
    }
}
