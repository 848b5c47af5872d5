use std::fmt;
use crate::report::ForecastReport;

/// Render the headline panel: current and predicted price, range, milestones
pub fn render(report: &ForecastReport) -> String {
    Panel(report).to_string()
}

/// Text view of a report
pub struct Panel<'a>(pub &'a ForecastReport);

impl fmt::Display for Panel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let outcome = &report.outcome;

        writeln!(f, "Bitcoin price forecast ({} years)", report.horizon_years)?;
        writeln!(
            f,
            "Generated {} from {} data",
            report.generated_at.format("%Y-%m-%d %H:%M UTC"),
            report.origin
        )?;
        if let Some(last) = &report.last_historical {
            writeln!(f, "Last close     {}  {}", last.date, format_usd(last.price))?;
        }
        writeln!(f)?;

        let Some(summary) = &outcome.summary else {
            return writeln!(f, "No forecast data");
        };

        let marker = if summary.is_growth() { "▲" } else { "▼" };
        writeln!(f, "Current price  {}", format_usd(summary.start_price))?;
        writeln!(
            f,
            "Predicted      {}  {} {:.2}%",
            format_usd(summary.end_price),
            marker,
            summary.growth_percent
        )?;
        writeln!(
            f,
            "Range          {} – {}",
            format_usd(summary.min_lower_bound),
            format_usd(summary.max_upper_bound)
        )?;
        writeln!(f, "1 year         {}", format_usd(summary.day_365_price))?;
        writeln!(f, "5 years        {}", format_usd(summary.day_1825_price))?;
        writeln!(f)?;
        writeln!(
            f,
            "Trend: slope={:.6}/day, intercept={:.4}, r²={:.3}, daily volatility={:.4}",
            outcome.trend.slope, outcome.trend.intercept, outcome.trend.fit_quality, outcome.volatility
        )?;
        writeln!(f, "All predictions are speculative and not financial advice.")
    }
}

/// Dollar amount with thousands separators and cents
pub fn format_usd(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}
