//! Configuration module for the VRVP monitor.

pub mod analysis;
pub mod binance;

mod debug; // Private: use crate::config::DEBUG_FLAGS not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod persistence;
pub mod run_config;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig};
pub use binance::{BINANCE, BinanceApiConfig};
pub use persistence::PERSISTENCE;
pub use run_config::RunConfig;
