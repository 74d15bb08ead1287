// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use data::{BinanceMarket, MarketDataSource, SignalLog};
pub use domain::{Candle, PairInterval};
pub use engine::{Evaluation, Monitor};
pub use error::ProfileError;
pub use models::{
    BoundaryDistance, Signal, SignalKind, VolumeProfile, classify, compute_profile,
    distance_scale,
};

// CLI argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON run configuration
    #[arg(long, default_value = config::PERSISTENCE.run_config_path)]
    pub config: PathBuf,

    /// Evaluate once and exit instead of polling
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Override the CSV file that receives BUY/SELL signals
    #[arg(long)]
    pub signal_log: Option<PathBuf>,
}
