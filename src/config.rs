use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use crate::data::coingecko::DEFAULT_BASE_URL;
use crate::model::trend::SMOOTHING_WINDOW;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_true")]
    pub fallback_to_synthetic: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_horizon")]
    pub horizon_years: u32,
    #[serde(default = "default_min_horizon")]
    pub min_horizon_years: u32,
    #[serde(default = "default_max_horizon")]
    pub max_horizon_years: u32,
    #[serde(default = "default_window")]
    pub smoothing_window: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub csv_path: Option<String>,
    #[serde(default)]
    pub json: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            vs_currency: default_vs_currency(),
            history_days: default_history_days(),
            request_timeout_secs: default_request_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            fallback_to_synthetic: true,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_years: default_horizon(),
            min_horizon_years: default_min_horizon(),
            max_horizon_years: default_max_horizon(),
            smoothing_window: default_window(),
        }
    }
}

fn default_api_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_vs_currency() -> String { "usd".to_string() }
fn default_history_days() -> u32 { 1825 }
fn default_request_timeout() -> u64 { 15 }
fn default_cache_ttl() -> u64 { 300 }
fn default_true() -> bool { true }
fn default_horizon() -> u32 { 10 }
fn default_min_horizon() -> u32 { 1 }
fn default_max_horizon() -> u32 { 20 }
fn default_window() -> usize { SMOOTHING_WINDOW }

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub coingecko_api_url: Option<String>,
    pub coingecko_api_key: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {}", path))
    }

    /// Load the file if present, otherwise fall back to built-in defaults
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            tracing::info!("Config file {} not found, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let f = &self.forecast;
        if f.min_horizon_years < 1 {
            anyhow::bail!("forecast.min_horizon_years must be at least 1");
        }
        if f.min_horizon_years > f.max_horizon_years {
            anyhow::bail!(
                "forecast.min_horizon_years ({}) exceeds max_horizon_years ({})",
                f.min_horizon_years,
                f.max_horizon_years
            );
        }
        if !(f.min_horizon_years..=f.max_horizon_years).contains(&f.horizon_years) {
            anyhow::bail!(
                "forecast.horizon_years ({}) outside {}..={}",
                f.horizon_years,
                f.min_horizon_years,
                f.max_horizon_years
            );
        }
        if f.smoothing_window == 0 {
            anyhow::bail!("forecast.smoothing_window must be at least 1");
        }
        if self.data.history_days == 0 {
            anyhow::bail!("data.history_days must be at least 1");
        }
        Ok(())
    }

    /// Apply environment overrides on top of the file
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(url) = &env.coingecko_api_url {
            self.data.api_url = url.clone();
        }
    }
}

impl ForecastConfig {
    /// Keep a requested horizon inside the configured bounds
    pub fn clamp_horizon(&self, years: u32) -> u32 {
        years.clamp(self.min_horizon_years, self.max_horizon_years)
    }
}

impl EnvConfig {
    pub fn load() -> Self {
        dotenv::dotenv().ok();

        Self {
            coingecko_api_url: non_empty_var("COINGECKO_API_URL"),
            coingecko_api_key: non_empty_var("COINGECKO_API_KEY"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.data.history_days, 1825);
        assert_eq!(config.data.vs_currency, "usd");
        assert_eq!(config.forecast.horizon_years, 10);
        assert_eq!(config.forecast.smoothing_window, 30);
        assert!(config.data.fallback_to_synthetic);
        assert!(config.output.csv_path.is_none());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse(
            r#"
            [forecast]
            horizon_years = 5

            [output]
            csv_path = "forecast.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.forecast.horizon_years, 5);
        assert_eq!(config.forecast.max_horizon_years, 20);
        assert_eq!(config.output.csv_path.as_deref(), Some("forecast.csv"));
    }

    #[test]
    fn test_validation() {
        assert!(Config::parse("[forecast]\nhorizon_years = 25").is_err());
        assert!(Config::parse("[forecast]\nsmoothing_window = 0").is_err());
        assert!(Config::parse("[forecast]\nmin_horizon_years = 5\nmax_horizon_years = 2\nhorizon_years = 3").is_err());
        assert!(Config::parse("[data]\nhistory_days = 0").is_err());
    }

    #[test]
    fn test_clamp_horizon() {
        let forecast = ForecastConfig::default();
        assert_eq!(forecast.clamp_horizon(0), 1);
        assert_eq!(forecast.clamp_horizon(7), 7);
        assert_eq!(forecast.clamp_horizon(50), 20);
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env(&EnvConfig {
            coingecko_api_url: Some("http://localhost:9000".to_string()),
            coingecko_api_key: None,
        });
        assert_eq!(config.data.api_url, "http://localhost:9000");
    }
}
