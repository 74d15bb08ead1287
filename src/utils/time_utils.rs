use chrono::{DateTime, Local, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_3_MIN: i64 = Self::MS_IN_S * 60 * 3;
    pub const MS_IN_5_MIN: i64 = Self::MS_IN_S * 60 * 5;
    pub const MS_IN_15_MIN: i64 = Self::MS_IN_S * 60 * 15;
    pub const MS_IN_30_MIN: i64 = Self::MS_IN_S * 60 * 30;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_2_H: i64 = Self::MS_IN_MIN * 60 * 2;
    pub const MS_IN_4_H: i64 = Self::MS_IN_MIN * 60 * 4;
    pub const MS_IN_6_H: i64 = Self::MS_IN_MIN * 60 * 6;
    pub const MS_IN_8_H: i64 = Self::MS_IN_MIN * 60 * 8;
    pub const MS_IN_12_H: i64 = Self::MS_IN_MIN * 60 * 12;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const MS_IN_3_D: i64 = Self::MS_IN_H * 24 * 3;
    pub const MS_IN_W: i64 = Self::MS_IN_D * 7;
    pub const MS_IN_1_M: i64 = Self::MS_IN_D * 30;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Convert interval in milliseconds to a Binance-style shorthand (e.g. `30m`, `1h`).
    pub fn interval_to_string(interval_ms: i64) -> &'static str {
        match interval_ms {
            Self::MS_IN_S => "1s",
            Self::MS_IN_MIN => "1m",
            Self::MS_IN_3_MIN => "3m",
            Self::MS_IN_5_MIN => "5m",
            Self::MS_IN_15_MIN => "15m",
            Self::MS_IN_30_MIN => "30m",
            Self::MS_IN_H => "1h",
            Self::MS_IN_2_H => "2h",
            Self::MS_IN_4_H => "4h",
            Self::MS_IN_6_H => "6h",
            Self::MS_IN_8_H => "8h",
            Self::MS_IN_12_H => "12h",
            Self::MS_IN_D => "1d",
            Self::MS_IN_3_D => "3d",
            Self::MS_IN_W => "1w",
            Self::MS_IN_1_M => "1M",
            _ => "unknown",
        }
    }

    /// Inverse of `interval_to_string`. Case matters: `1m` is a minute, `1M` a month.
    pub fn interval_from_string(label: &str) -> Option<i64> {
        match label.trim() {
            "1s" => Some(Self::MS_IN_S),
            "1m" => Some(Self::MS_IN_MIN),
            "3m" => Some(Self::MS_IN_3_MIN),
            "5m" => Some(Self::MS_IN_5_MIN),
            "15m" => Some(Self::MS_IN_15_MIN),
            "30m" => Some(Self::MS_IN_30_MIN),
            "1h" => Some(Self::MS_IN_H),
            "2h" => Some(Self::MS_IN_2_H),
            "4h" => Some(Self::MS_IN_4_H),
            "6h" => Some(Self::MS_IN_6_H),
            "8h" => Some(Self::MS_IN_8_H),
            "12h" => Some(Self::MS_IN_12_H),
            "1d" => Some(Self::MS_IN_D),
            "3d" => Some(Self::MS_IN_3_D),
            "1w" => Some(Self::MS_IN_W),
            "1M" => Some(Self::MS_IN_1_M),
            _ => None,
        }
    }
}

pub fn epoch_ms_to_utc(epoch_ms: i64) -> String {
    // Used for display purposes
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(TimeUtils::STANDARD_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Wall-clock time in the local zone, formatted for reports and the signal log.
pub fn local_now_string() -> String {
    Local::now().format(TimeUtils::STANDARD_TIME_FORMAT).to_string()
}
