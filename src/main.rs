use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use vrvp_monitor::config::RunConfig;
use vrvp_monitor::{BinanceMarket, Cli, Monitor};

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Load run configuration
    let mut run_config = RunConfig::load_from_path(&args.config)?;
    if let Some(path) = args.signal_log.clone() {
        run_config.signal_log = path;
    }

    // D. Run
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(async move {
        let source = Arc::new(BinanceMarket::new()?);
        let monitor = Monitor::new(source, run_config)?;
        if args.once {
            monitor.run_once().await.map(|_| ())
        } else {
            monitor.run().await
        }
    })
}
