//! File persistence configuration

pub struct PersistenceConfig {
    /// Run configuration read at startup unless `--config` says otherwise
    pub run_config_path: &'static str,
    /// Append-only CSV of every BUY/SELL signal
    pub signal_log_path: &'static str,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    run_config_path: "config.json",
    signal_log_path: "signals.csv",
};
