//! Analysis and scheduling defaults

/// Defaults for the volume profile itself
pub struct ProfileSettings {
    // Number of grid boundaries (buckets = levels - 1)
    pub num_levels: usize,
    // Share of the bucket total the Value Area must hold (0.70 = 70%)
    pub value_area_fraction: f64,
}

/// Defaults for the polling driver
pub struct MonitorSettings {
    // Candle width used when the run config does not name one
    pub interval_label: &'static str,
    // Number of candles in the lookback window
    pub lookback_candles: usize,
    // Seconds between two evaluations
    pub poll_seconds: u64,
    // Seconds to wait after a failed evaluation before trying again
    pub retry_seconds: u64,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub profile: ProfileSettings,
    pub monitor: MonitorSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    profile: ProfileSettings {
        num_levels: 24,
        value_area_fraction: 0.70,
    },

    monitor: MonitorSettings {
        interval_label: "1h",
        lookback_candles: 100,
        poll_seconds: 60,
        retry_seconds: 5,
    },
};
