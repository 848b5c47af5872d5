//! Bitcoin price forecasting: fetch daily history, fit a log-linear trend,
//! project it forward with volatility bands and summarize the result.

pub mod app;
pub mod config;
pub mod data;
pub mod model;
pub mod report;
