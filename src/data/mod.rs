pub mod cache;
pub mod coingecko;
pub mod provider;
pub mod synthetic;
pub mod types;
