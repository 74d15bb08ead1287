//! End-to-end checks of the public profile and signal API.

use vrvp_monitor::{Candle, ProfileError, SignalKind, classify, compute_profile, distance_scale};

fn candle(open_time_ms: i64, low: f64, high: f64, volume: f64) -> Candle {
    let mid = (low + high) / 2.0;
    Candle::new(open_time_ms, mid, high, low, mid, volume)
}

/// Ten candles: nine spanning [100, 110] with volume 1 and one heavy
/// candle on [104, 106] with volume 100.
fn reference_window() -> Vec<Candle> {
    (0..10)
        .map(|i| {
            if i == 5 {
                candle(i, 104.0, 106.0, 100.0)
            } else {
                candle(i, 100.0, 110.0, 1.0)
            }
        })
        .collect()
}

#[test]
fn price_above_value_area_sells() {
    let profile = compute_profile(&reference_window(), 6, 0.70).unwrap();

    assert_eq!(profile.grid.boundaries(), &[100.0, 102.0, 104.0, 106.0, 108.0, 110.0]);
    assert!(profile.value_area_lower <= 104.0 && profile.value_area_upper >= 106.0);
    assert!(profile.poc_price > 102.0 && profile.poc_price < 108.0);

    let signal = classify(&profile, 111.0);
    assert_eq!(signal.kind, SignalKind::Sell);

    let distance =
        distance_scale(111.0, profile.value_area_upper, profile.value_area_lower).unwrap();
    assert_eq!(distance.upper, 11);
}

#[test]
fn price_below_value_area_buys() {
    let profile = compute_profile(&reference_window(), 6, 0.70).unwrap();
    let signal = classify(&profile, 100.5);
    assert_eq!(signal.kind, SignalKind::Buy);
    assert_eq!(signal.reason, "price below the lower Value Area boundary");

    let distance =
        distance_scale(100.5, profile.value_area_upper, profile.value_area_lower).unwrap();
    assert_eq!(distance.lower, 11);
    assert_eq!(distance.upper, 1);
}

#[test]
fn upper_boundary_is_neutral_and_scores_ten() {
    let profile = compute_profile(&reference_window(), 6, 0.70).unwrap();
    let upper = profile.value_area_upper;

    assert_eq!(classify(&profile, upper).kind, SignalKind::Neutral);
    assert_eq!(classify(&profile, upper + 1e-6).kind, SignalKind::Sell);
    assert_eq!(
        distance_scale(upper, upper, profile.value_area_lower)
            .unwrap()
            .upper,
        10
    );
}

#[test]
fn profile_invariants_hold_on_default_grid() {
    let series: Vec<Candle> = (0..60)
        .map(|i| {
            let base = 2_000.0 + (i as f64 * 0.21).cos() * 35.0 + i as f64 * 0.8;
            candle(
                i,
                base - 4.0 - (i % 7) as f64,
                base + 3.0 + (i % 3) as f64,
                10.0 + (i % 11) as f64,
            )
        })
        .collect();

    let profile = compute_profile(&series, 24, 0.70).unwrap();
    let sum: f64 = profile.volume_per_bucket.iter().sum();
    assert_eq!(sum, profile.total_volume);

    let poc_volume = profile.volume_per_bucket[profile.poc_index];
    assert!(profile.volume_per_bucket.iter().all(|&v| v <= poc_volume));
    assert!(
        profile.volume_per_bucket[..profile.poc_index]
            .iter()
            .all(|&v| v < poc_volume)
    );

    assert!(profile.value_area_lower <= profile.poc_price);
    assert!(profile.poc_price <= profile.value_area_upper);
    if profile.value_area_covers_grid() {
        assert_eq!(profile.value_area_volume, profile.total_volume);
    } else {
        assert!(profile.value_area_volume >= profile.total_volume * 0.70);
    }

    assert_eq!(profile, compute_profile(&series, 24, 0.70).unwrap());
}

#[test]
fn empty_series_is_invalid_input() {
    assert!(matches!(
        compute_profile(&[], 24, 0.70),
        Err(ProfileError::InvalidInput(_))
    ));
}
