pub mod candle;
pub mod fetcher;
pub mod provider;
pub mod yahoo;

// Re-export the core types for convenient access (e.g. `use crate::market_data::Candle`).
#[cfg(test)]
pub use candle::series_from_closes;
pub use candle::{Candle, OhlcSeries};
pub use fetcher::fetch_all;
pub use provider::MarketDataProvider;
pub use yahoo::YahooClient;
