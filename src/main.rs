use anyhow::Result;
use btc_forecast::app::{today, App, OutputOptions};
use btc_forecast::config::{Config, EnvConfig};
use btc_forecast::data::synthetic::{default_start_date, generate_history};
use btc_forecast::data::types::{DataOrigin, History};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "btc-forecast")]
#[command(about = "Bitcoin price forecast with log-linear trend and volatility bands", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch history and print a forecast (default)
    Forecast {
        /// Forecast horizon in years
        #[arg(short, long)]
        years: Option<u32>,

        /// Write historical and forecast rows to this CSV file
        #[arg(long)]
        csv: Option<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive explorer: change the horizon, refresh data
    Explore,

    /// Forecast from generated history, without network access
    Synthetic {
        /// Last day of the generated series (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Seed for reproducible series
        #[arg(long)]
        seed: Option<u64>,

        /// Forecast horizon in years
        #[arg(short, long)]
        years: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config)?;
    let env_config = EnvConfig::load();
    config.apply_env(&env_config);

    tracing::info!("Data source: {}", config.data.api_url);
    tracing::info!(
        "History window: {} days, smoothing window: {}",
        config.data.history_days,
        config.forecast.smoothing_window
    );

    let app = App::new(config, &env_config)?;

    match cli.command.unwrap_or(Commands::Forecast {
        years: None,
        csv: None,
        json: false,
    }) {
        Commands::Forecast { years, csv, json } => {
            app.forecast_once(years, &OutputOptions { csv_path: csv, json })
                .await?;
        }
        Commands::Explore => app.explore().await?,
        Commands::Synthetic { as_of, seed, years } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let history = History {
                points: generate_history(&mut rng, default_start_date(), as_of.unwrap_or_else(today)),
                origin: DataOrigin::Synthetic,
            };
            let forecast = &app.config().forecast;
            let horizon = forecast.clamp_horizon(years.unwrap_or(forecast.horizon_years));
            let report = app.build_report(&history, horizon)?;
            app.emit(&report, &history, &OutputOptions::default())?;
        }
    }

    Ok(())
}
