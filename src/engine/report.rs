use std::fmt::Write;

use crate::data::SignalRecord;
use crate::domain::PairInterval;
use crate::models::{BoundaryDistance, Signal, VolumeProfile};
use crate::utils::time_utils::epoch_ms_to_utc;

/// Everything produced by one monitor tick.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub timestamp: String,
    pub pair_interval: PairInterval,
    pub candle_count: usize,
    pub window_end_ms: i64,
    pub current_price: f64,
    pub profile: VolumeProfile,
    pub signal: Signal,
    pub distance: BoundaryDistance,
}

impl Evaluation {
    /// Row for the signal log, or None for a neutral reading.
    pub fn signal_record(&self) -> Option<SignalRecord> {
        self.signal.is_actionable().then(|| SignalRecord {
            timestamp: self.timestamp.clone(),
            price: self.current_price,
            value_area_upper: self.profile.value_area_upper,
            value_area_lower: self.profile.value_area_lower,
            signal: self.signal.kind,
        })
    }

    /// Console block printed after every successful tick.
    pub fn render(&self, poll_seconds: u64) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", "=".repeat(50));
        let _ = writeln!(out, "Date and time: {} (local)", self.timestamp);
        let _ = writeln!(out, "Symbol: {}", self.pair_interval.name());
        let _ = writeln!(out, "Interval: {}", self.pair_interval.interval_label());
        let _ = writeln!(
            out,
            "Window: {} candles up to {} UTC",
            self.candle_count,
            epoch_ms_to_utc(self.window_end_ms)
        );
        let _ = writeln!(out, "Refresh every: {} seconds", poll_seconds);
        let _ = writeln!(out, "Current price: {:.2}", self.current_price);
        let _ = writeln!(out, "Point of Control: {:.2}", self.profile.poc_price);
        let _ = writeln!(out, "Value Area upper: {:.2}", self.profile.value_area_upper);
        let _ = writeln!(out, "Distance to upper area: {}", self.distance.upper);
        let _ = writeln!(out, "Value Area lower: {:.2}", self.profile.value_area_lower);
        let _ = writeln!(out, "Distance to lower area: {}", self.distance.lower);
        let _ = writeln!(out, "\nSIGNAL: {}", self.signal.kind);
        let _ = write!(out, "Reason: {}", self.signal.reason);
        if let Some(banner) = self.signal.alert_banner() {
            let _ = write!(out, "\n{}", banner);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Candle;
    use crate::models::{SignalKind, classify, compute_profile, distance_scale};

    fn evaluation_at(price: f64) -> Evaluation {
        let series = vec![
            Candle::new(0, 101.0, 110.0, 100.0, 109.0, 1.0),
            Candle::new(3_600_000, 105.0, 106.0, 104.0, 105.5, 50.0),
        ];
        let profile = compute_profile(&series, 6, 0.7).unwrap();
        let signal = classify(&profile, price);
        let distance =
            distance_scale(price, profile.value_area_upper, profile.value_area_lower).unwrap();
        Evaluation {
            timestamp: "2024-05-01 12:00:00".to_string(),
            pair_interval: PairInterval::from_label("BTCUSDT", "1h").unwrap(),
            candle_count: series.len(),
            window_end_ms: 3_600_000,
            current_price: price,
            profile,
            signal,
            distance,
        }
    }

    #[test]
    fn sell_reading_renders_banner_and_record() {
        let evaluation = evaluation_at(150.0);
        let text = evaluation.render(60);
        assert!(text.contains("Symbol: BTCUSDT"));
        assert!(text.contains("Interval: 1h"));
        assert!(text.contains("Date and time: 2024-05-01 12:00:00 (local)"));
        assert!(text.contains("Window: 2 candles up to 1970-01-01 01:00:00 UTC"));
        assert!(text.contains("Current price: 150.00"));
        assert!(text.contains("SIGNAL: SELL"));
        assert!(text.contains("Distance to upper area: 11"));
        assert!(text.contains("🚨 SELL SIGNAL! 🚨"));

        let record = evaluation.signal_record().unwrap();
        assert_eq!(record.signal, SignalKind::Sell);
        assert_eq!(record.price, 150.0);
        assert_eq!(record.value_area_upper, evaluation.profile.value_area_upper);
    }

    #[test]
    fn neutral_reading_has_no_record() {
        let evaluation = evaluation_at(105.0);
        assert_eq!(evaluation.signal.kind, SignalKind::Neutral);
        assert!(evaluation.signal_record().is_none());
        assert!(!evaluation.render(60).contains("🚨"));
    }
}
