//! Run configuration read from a JSON file at startup.
//!
//! ```json
//! {
//!   "trading": { "symbol": "BTCUSDT", "interval": "1h", "lookback_period": 100 },
//!   "update": { "interval_seconds": 60 }
//! }
//! ```
//!
//! `profile`, `update.retry_seconds` and `signal_log` are optional and fall
//! back to the compiled defaults in `ANALYSIS` / `PERSISTENCE`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::{ANALYSIS, BINANCE, PERSISTENCE};
use crate::domain::PairInterval;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TradingSection {
    pub symbol: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_lookback")]
    pub lookback_period: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UpdateSection {
    #[serde(default = "default_poll_seconds")]
    pub interval_seconds: u64,
    #[serde(default = "default_retry_seconds")]
    pub retry_seconds: u64,
}

impl Default for UpdateSection {
    fn default() -> Self {
        Self {
            interval_seconds: default_poll_seconds(),
            retry_seconds: default_retry_seconds(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProfileSection {
    #[serde(default = "default_num_levels")]
    pub num_levels: usize,
    #[serde(default = "default_value_area_fraction")]
    pub value_area_fraction: f64,
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            num_levels: default_num_levels(),
            value_area_fraction: default_value_area_fraction(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub trading: TradingSection,
    #[serde(default)]
    pub update: UpdateSection,
    #[serde(default)]
    pub profile: ProfileSection,
    #[serde(default = "default_signal_log")]
    pub signal_log: PathBuf,
}

fn default_interval() -> String {
    ANALYSIS.monitor.interval_label.to_string()
}
fn default_lookback() -> usize {
    ANALYSIS.monitor.lookback_candles
}
fn default_poll_seconds() -> u64 {
    ANALYSIS.monitor.poll_seconds
}
fn default_retry_seconds() -> u64 {
    ANALYSIS.monitor.retry_seconds
}
fn default_num_levels() -> usize {
    ANALYSIS.profile.num_levels
}
fn default_value_area_fraction() -> f64 {
    ANALYSIS.profile.value_area_fraction
}
fn default_signal_log() -> PathBuf {
    PathBuf::from(PERSISTENCE.signal_log_path)
}

impl RunConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: RunConfig =
            serde_json::from_str(text).context("Failed to parse run configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read run configuration: {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid run configuration in {}", path.display()))
    }

    /// Rejects values the driver or the profile engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.trading.symbol.trim().is_empty() {
            bail!("trading.symbol must not be empty");
        }
        let max_lookback = BINANCE.limits.klines_limit as usize;
        if self.trading.lookback_period == 0 || self.trading.lookback_period > max_lookback {
            bail!(
                "trading.lookback_period must be in 1..={}, got {}",
                max_lookback,
                self.trading.lookback_period
            );
        }
        if self.update.interval_seconds == 0 {
            bail!("update.interval_seconds must be positive");
        }
        if self.profile.num_levels < 2 {
            bail!(
                "profile.num_levels must be at least 2, got {}",
                self.profile.num_levels
            );
        }
        let fraction = self.profile.value_area_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            bail!(
                "profile.value_area_fraction must be in (0, 1], got {}",
                fraction
            );
        }
        self.pair_interval()?;
        Ok(())
    }

    pub fn pair_interval(&self) -> Result<PairInterval> {
        PairInterval::from_label(&self.trading.symbol, &self.trading.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_file_gets_defaults() {
        let config = RunConfig::from_json_str(
            r#"{ "trading": { "symbol": "ethusdt", "interval": "15m", "lookback_period": 50 },
                 "update": { "interval_seconds": 30 } }"#,
        )
        .unwrap();

        assert_eq!(config.update.interval_seconds, 30);
        assert_eq!(config.update.retry_seconds, 5);
        assert_eq!(config.profile.num_levels, 24);
        assert_eq!(config.profile.value_area_fraction, 0.70);
        assert_eq!(config.signal_log, PathBuf::from("signals.csv"));

        let pair = config.pair_interval().unwrap();
        assert_eq!(pair.name(), "ETHUSDT");
        assert_eq!(pair.interval_label(), "15m");
    }

    #[test]
    fn overrides_are_kept() {
        let config = RunConfig::from_json_str(
            r#"{ "trading": { "symbol": "BTCUSDT" },
                 "profile": { "num_levels": 48, "value_area_fraction": 0.68 },
                 "signal_log": "out/orders.csv" }"#,
        )
        .unwrap();
        assert_eq!(config.trading.interval, "1h");
        assert_eq!(config.trading.lookback_period, 100);
        assert_eq!(config.update.interval_seconds, 60);
        assert_eq!(config.profile.num_levels, 48);
        assert_eq!(config.signal_log, PathBuf::from("out/orders.csv"));
    }

    #[test]
    fn bad_values_are_rejected() {
        let cases = [
            r#"{ "trading": { "symbol": "" } }"#,
            r#"{ "trading": { "symbol": "BTCUSDT", "interval": "7m" } }"#,
            r#"{ "trading": { "symbol": "BTCUSDT", "lookback_period": 0 } }"#,
            r#"{ "trading": { "symbol": "BTCUSDT", "lookback_period": 5000 } }"#,
            r#"{ "trading": { "symbol": "BTCUSDT" }, "profile": { "num_levels": 1 } }"#,
            r#"{ "trading": { "symbol": "BTCUSDT" }, "profile": { "value_area_fraction": 0 } }"#,
            r#"{ "trading": { "symbol": "BTCUSDT" }, "update": { "interval_seconds": 0 } }"#,
            r#"{ "update": { "interval_seconds": 10 } }"#,
        ];
        for case in cases {
            assert!(RunConfig::from_json_str(case).is_err(), "accepted: {}", case);
        }
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "trading": {{ "symbol": "SOLUSDT", "interval": "4h", "lookback_period": 200 }} }}"#
        )
        .unwrap();

        let config = RunConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.trading.symbol, "SOLUSDT");
        assert_eq!(config.trading.lookback_period, 200);

        assert!(RunConfig::load_from_path(Path::new("/definitely/missing.json")).is_err());
    }
}
