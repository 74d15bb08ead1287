use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::utils::TimeUtils;

/// The symbol and candle width the monitor watches.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct PairInterval {
    pub name: String,
    pub interval_ms: i64,
}

impl PairInterval {
    /// Builds from a pair name and a Binance-style interval label (`"1h"`, `"15m"`).
    pub fn from_label(name: &str, interval_label: &str) -> Result<Self> {
        let interval_ms = TimeUtils::interval_from_string(interval_label)
            .ok_or_else(|| anyhow!("Unsupported interval label: {}", interval_label))?;
        Ok(Self {
            name: name.trim().to_uppercase(),
            interval_ms,
        })
    }

    // Finds the trading quote at the end of the pair name and returns it.
    // Returns None if no matching quote is found.
    pub fn get_quote(text: &str) -> Option<&str> {
        static PAIR_QUOTES: &[&str] = &["USDT", "USDC", "FDUSD", "BTC", "ETH"];
        PAIR_QUOTES
            .iter()
            .find(|&&ext| text.ends_with(ext))
            .copied()
    }

    // The name we pass into the Binance API (not necessarily display name)
    pub fn bn_name(&self) -> &str {
        &self.name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval_label(&self) -> &'static str {
        TimeUtils::interval_to_string(self.interval_ms)
    }
}

impl std::fmt::Display for PairInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let quote = Self::get_quote(&self.name).unwrap_or("UNKNOWN_QUOTE");
        write!(
            f,
            "{} (quote {}) @ {}",
            self.name(),
            quote,
            self.interval_label()
        )
    }
}
