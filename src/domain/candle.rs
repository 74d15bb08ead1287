use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};

/// One OHLCV interval. `open_time_ms` is only used for ordering and display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time_ms: i64,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
}

impl Candle {
    // A constructor for convenience
    pub fn new(
        open_time_ms: i64,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
        volume: f64,
    ) -> Self {
        Candle {
            open_time_ms,
            open_price,
            high_price,
            low_price,
            close_price,
            volume,
        }
    }

    /// (low, high) of the traded range
    pub fn range(&self) -> (f64, f64) {
        (self.low_price, self.high_price)
    }

    /// Checks the OHLCV invariants: finite prices, high >= open/close >= low,
    /// and a non-negative volume.
    pub fn validate(&self) -> ProfileResult<()> {
        let fields = [
            self.open_price,
            self.high_price,
            self.low_price,
            self.close_price,
            self.volume,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(ProfileError::invalid_input(format!(
                "candle at {} has a non-finite field",
                self.open_time_ms
            )));
        }
        if self.high_price < self.low_price {
            return Err(ProfileError::invalid_input(format!(
                "candle at {} has high {} below low {}",
                self.open_time_ms, self.high_price, self.low_price
            )));
        }
        let body_low = self.open_price.min(self.close_price);
        let body_high = self.open_price.max(self.close_price);
        if body_low < self.low_price || body_high > self.high_price {
            return Err(ProfileError::invalid_input(format!(
                "candle at {} has open/close outside [{}, {}]",
                self.open_time_ms, self.low_price, self.high_price
            )));
        }
        if self.volume < 0.0 {
            return Err(ProfileError::invalid_input(format!(
                "candle at {} has negative volume {}",
                self.open_time_ms, self.volume
            )));
        }
        Ok(())
    }
}
