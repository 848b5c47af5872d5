use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use crate::data::types::HistoricalPoint;
use crate::model::types::ForecastPoint;

/// Writes historical and forecast points as one chart-ready CSV
pub struct CsvExporter {
    path: String,
}

impl CsvExporter {
    pub fn new(path: String) -> Self {
        Self { path }
    }

    /// Overwrite the file with history (no bounds) followed by the forecast
    pub fn export(&self, history: &[HistoricalPoint], forecast: &[ForecastPoint]) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create CSV file: {}", self.path))?;
        let mut out = BufWriter::new(file);

        writeln!(out, "kind,date,price,upper_bound,lower_bound")?;

        for point in history {
            writeln!(out, "historical,{},{:.2},,", point.date, point.price)?;
        }

        for point in forecast {
            writeln!(
                out,
                "forecast,{},{:.2},{:.2},{:.2}",
                point.date, point.price, point.upper_bound, point.lower_bound
            )?;
        }

        out.flush()?;
        tracing::info!(
            "Exported {} historical and {} forecast rows to {}",
            history.len(),
            forecast.len(),
            self.path
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forecast.csv");
        let exporter = CsvExporter::new(path.to_string_lossy().into_owned());

        let history = vec![HistoricalPoint {
            date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            price: 93429.2,
        }];
        let forecast = vec![ForecastPoint {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            price: 93500.0,
            upper_bound: 96000.5,
            lower_bound: 91000.25,
        }];

        exporter.export(&history, &forecast).unwrap();
        // Second export overwrites rather than appends
        exporter.export(&history, &forecast).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "kind,date,price,upper_bound,lower_bound",
                "historical,2024-12-31,93429.20,,",
                "forecast,2025-01-01,93500.00,96000.50,91000.25",
            ]
        );
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let exporter = CsvExporter::new("/nonexistent-dir/forecast.csv".to_string());
        assert!(exporter.export(&[], &[]).is_err());
    }
}
