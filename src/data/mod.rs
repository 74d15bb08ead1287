// Market data retrieval and signal persistence (driver side only)
pub mod bn_market;
pub mod market_source;
pub mod signal_log;

// Re-export commonly used types
pub use bn_market::BinanceMarket;
pub use market_source::MarketDataSource;
pub use signal_log::{SignalLog, SignalRecord};
