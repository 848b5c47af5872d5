use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use crate::config::{Config, EnvConfig};
use crate::data::coingecko::CoinGeckoClient;
use crate::data::provider::HistoryProvider;
use crate::data::types::History;
use crate::model;
use crate::report::console;
use crate::report::csv::CsvExporter;
use crate::report::ForecastReport;

/// Ties configuration, the history provider and the engine together
pub struct App {
    config: Config,
    provider: HistoryProvider,
}

/// How a finished report should be emitted
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub csv_path: Option<String>,
    pub json: bool,
}

/// One line typed into the explorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorerCommand {
    Horizon(u32),
    Refresh,
    Quit,
    Help,
}

/// What the explorer holds between commands
#[derive(Debug, Clone)]
pub struct ExplorerState {
    pub history: History,
    pub horizon: u32,
}

/// What the explorer loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerStep {
    Render,
    Skip,
    Quit,
}

impl ExplorerCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "" => None,
            "r" | "refresh" => Some(Self::Refresh),
            "q" | "quit" | "exit" => Some(Self::Quit),
            "h" | "help" | "?" => Some(Self::Help),
            other => other.parse().ok().map(Self::Horizon),
        }
    }
}

impl App {
    pub fn new(config: Config, env: &EnvConfig) -> Result<Self> {
        let client = CoinGeckoClient::new(
            config.data.api_url.clone(),
            config.data.vs_currency.clone(),
            env.coingecko_api_key.clone(),
            Duration::from_secs(config.data.request_timeout_secs),
        )?;
        let provider = HistoryProvider::new(
            client,
            Duration::from_secs(config.data.cache_ttl_secs),
            config.data.fallback_to_synthetic,
        );

        Ok(Self { config, provider })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load history once, forecast, print and export
    pub async fn forecast_once(&self, years: Option<u32>, output: &OutputOptions) -> Result<()> {
        let horizon = self.horizon(years);
        let history = self.provider.load(self.config.data.history_days, today()).await?;
        let report = self.build_report(&history, horizon)?;
        self.emit(&report, &history, output)
    }

    /// Interactive loop: a number changes the horizon, `r` refetches, `q` quits
    pub async fn explore(&self) -> Result<()> {
        let history = self.provider.load(self.config.data.history_days, today()).await?;
        let mut state = ExplorerState {
            history,
            horizon: self.config.forecast.horizon_years,
        };
        self.print_report(&state.history, state.horizon)?;
        print_explorer_help(&self.config);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
            let Some(command) = ExplorerCommand::parse(&line) else {
                if !line.trim().is_empty() {
                    println!("Unrecognised input: {}", line.trim());
                }
                continue;
            };

            match self.apply(command, &mut state).await? {
                ExplorerStep::Render => self.print_report(&state.history, state.horizon)?,
                ExplorerStep::Skip => {}
                ExplorerStep::Quit => break,
            }
        }

        info!("Explorer closed");
        Ok(())
    }

    /// Apply one explorer command. Only `Refresh` touches the provider;
    /// a horizon change recomputes from the history already on screen.
    pub async fn apply(&self, command: ExplorerCommand, state: &mut ExplorerState) -> Result<ExplorerStep> {
        match command {
            ExplorerCommand::Horizon(years) => {
                state.horizon = self.horizon(Some(years));
                if state.horizon != years {
                    warn!("Horizon {} outside bounds, using {}", years, state.horizon);
                }
                Ok(ExplorerStep::Render)
            }
            ExplorerCommand::Refresh => {
                info!("Refreshing historical data");
                state.history = self
                    .provider
                    .refresh(self.config.data.history_days, today())
                    .await?;
                Ok(ExplorerStep::Render)
            }
            ExplorerCommand::Help => {
                print_explorer_help(&self.config);
                Ok(ExplorerStep::Skip)
            }
            ExplorerCommand::Quit => Ok(ExplorerStep::Quit),
        }
    }

    fn horizon(&self, years: Option<u32>) -> u32 {
        let forecast = &self.config.forecast;
        forecast.clamp_horizon(years.unwrap_or(forecast.horizon_years))
    }

    pub fn build_report(&self, history: &History, horizon_years: u32) -> Result<ForecastReport> {
        let outcome = model::run(&history.points, horizon_years, self.config.forecast.smoothing_window)
            .context("Forecast failed")?;

        if let Some(summary) = &outcome.summary {
            info!(
                "Forecast: {} days, growth {:.2}%, end price {:.2}",
                outcome.points.len(),
                summary.growth_percent,
                summary.end_price
            );
        }

        Ok(ForecastReport::new(
            Utc::now(),
            history.origin,
            horizon_years,
            &history.points,
            outcome,
        ))
    }

    fn print_report(&self, history: &History, horizon_years: u32) -> Result<()> {
        let report = self.build_report(history, horizon_years)?;
        println!("{}", console::render(&report));
        Ok(())
    }

    /// Print the report (text or JSON) and write the CSV when requested
    pub fn emit(&self, report: &ForecastReport, history: &History, output: &OutputOptions) -> Result<()> {
        let json = output.json || self.config.output.json;
        if json {
            println!("{}", report.to_json()?);
        } else {
            println!("{}", console::render(report));
        }

        let csv_path = output
            .csv_path
            .clone()
            .or_else(|| self.config.output.csv_path.clone());
        if let Some(path) = csv_path {
            CsvExporter::new(path).export(&history.points, &report.outcome.points)?;
        }
        Ok(())
    }
}

fn print_explorer_help(config: &Config) {
    println!(
        "Enter a horizon in years ({}-{}), 'r' to refresh data, 'q' to quit.",
        config.forecast.min_horizon_years, config.forecast.max_horizon_years
    );
}

/// The as-of date for fetch windows and synthetic history, read once per load
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::generate_history;
    use crate::data::types::DataOrigin;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn offline_app() -> App {
        let env = EnvConfig {
            coingecko_api_url: None,
            coingecko_api_key: None,
        };
        App::new(Config::default(), &env).unwrap()
    }

    fn synthetic_history() -> History {
        let mut rng = StdRng::seed_from_u64(2018);
        History {
            points: generate_history(
                &mut rng,
                NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            ),
            origin: DataOrigin::Synthetic,
        }
    }

    #[test]
    fn test_parse_explorer_commands() {
        assert_eq!(ExplorerCommand::parse("5"), Some(ExplorerCommand::Horizon(5)));
        assert_eq!(ExplorerCommand::parse(" 20 \n"), Some(ExplorerCommand::Horizon(20)));
        assert_eq!(ExplorerCommand::parse("R"), Some(ExplorerCommand::Refresh));
        assert_eq!(ExplorerCommand::parse("quit"), Some(ExplorerCommand::Quit));
        assert_eq!(ExplorerCommand::parse("?"), Some(ExplorerCommand::Help));
        assert_eq!(ExplorerCommand::parse(""), None);
        assert_eq!(ExplorerCommand::parse("-3"), None);
        assert_eq!(ExplorerCommand::parse("ten"), None);
    }

    fn unreachable_app() -> App {
        let mut config = Config::default();
        // Nothing listens on port 1; a zero TTL makes every load refetch
        config.data.api_url = "http://127.0.0.1:1".to_string();
        config.data.request_timeout_secs = 2;
        config.data.cache_ttl_secs = 0;
        let env = EnvConfig {
            coingecko_api_url: None,
            coingecko_api_key: None,
        };
        App::new(config, &env).unwrap()
    }

    #[tokio::test]
    async fn test_horizon_change_keeps_history() {
        let app = unreachable_app();
        let history = synthetic_history();
        let mut state = ExplorerState {
            history: history.clone(),
            horizon: 10,
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        let step = app.apply(ExplorerCommand::Horizon(5), &mut state).await.unwrap();
        assert_eq!(step, ExplorerStep::Render);
        assert_eq!(state.horizon, 5);
        assert_eq!(state.history.points, history.points);

        app.apply(ExplorerCommand::Horizon(40), &mut state).await.unwrap();
        assert_eq!(state.horizon, 20);
        assert_eq!(state.history.points, history.points);
    }

    #[tokio::test]
    async fn test_refresh_replaces_history() {
        let app = unreachable_app();
        let mut state = ExplorerState {
            history: synthetic_history(),
            horizon: 10,
        };

        let step = app.apply(ExplorerCommand::Refresh, &mut state).await.unwrap();
        assert_eq!(step, ExplorerStep::Render);
        assert_eq!(state.history.last().unwrap().date, today());
        assert_eq!(state.horizon, 10);

        assert_eq!(
            app.apply(ExplorerCommand::Quit, &mut state).await.unwrap(),
            ExplorerStep::Quit
        );
        assert_eq!(
            app.apply(ExplorerCommand::Help, &mut state).await.unwrap(),
            ExplorerStep::Skip
        );
    }

    #[test]
    fn test_horizon_is_clamped_to_config_bounds() {
        let app = offline_app();
        assert_eq!(app.horizon(None), 10);
        assert_eq!(app.horizon(Some(0)), 1);
        assert_eq!(app.horizon(Some(35)), 20);
    }

    #[test]
    fn test_build_report() {
        let app = offline_app();
        let history = synthetic_history();
        let report = app.build_report(&history, 5).unwrap();

        assert_eq!(report.origin, DataOrigin::Synthetic);
        assert_eq!(report.horizon_years, 5);
        assert_eq!(report.outcome.points.len(), 5 * 365);
        assert_eq!(report.last_historical, history.last().copied());
        assert!(report.outcome.summary.is_some());
    }

    #[test]
    fn test_emit_writes_csv() {
        let app = offline_app();
        let history = synthetic_history();
        let report = app.build_report(&history, 1).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let output = OutputOptions {
            csv_path: Some(path.to_string_lossy().into_owned()),
            json: true,
        };
        app.emit(&report, &history, &output).unwrap();

        let rows = std::fs::read_to_string(&path).unwrap().lines().count();
        assert_eq!(rows, 1 + history.points.len() + 365);
    }
}
