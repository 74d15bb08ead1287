use serde::{Deserialize, Serialize};

use crate::domain::candle::Candle;
use crate::error::{ProfileError, ProfileResult};
use crate::utils::maths_utils::{PriceGrid, get_max, get_min};

/// Volume Range Visible Profile for one lookback window.
///
/// `volume_per_bucket[i]` is the volume credited to `grid.bucket_bounds(i)`.
/// A candle credits its full volume to every bucket its range touches, so the
/// bucket total is usually larger than the traded volume of the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfile {
    pub grid: PriceGrid,
    pub volume_per_bucket: Vec<f64>,

    // Point of Control
    pub poc_index: usize,
    pub poc_price: f64,

    // Value Area (outer boundaries of the bucket range [lower_index, upper_index])
    pub value_area_lower_index: usize,
    pub value_area_upper_index: usize,
    pub value_area_lower: f64,
    pub value_area_upper: f64,

    pub total_volume: f64,
    pub value_area_volume: f64,
}

impl VolumeProfile {
    /// True when the Value Area grew to cover every bucket.
    pub fn value_area_covers_grid(&self) -> bool {
        self.value_area_lower_index == 0
            && self.value_area_upper_index + 1 == self.volume_per_bucket.len()
    }
}

/// Builds the profile of `series` on a grid of `num_levels` boundaries and
/// grows a Value Area holding `value_area_fraction` of the bucket total.
///
/// A series that traded at a single price gets a one-bucket grid `[p, p]`;
/// POC and both Value Area bounds are then `p`.
pub fn compute_profile(
    series: &[Candle],
    num_levels: usize,
    value_area_fraction: f64,
) -> ProfileResult<VolumeProfile> {
    if series.is_empty() {
        return Err(ProfileError::invalid_input("candle series is empty"));
    }
    if num_levels < 2 {
        return Err(ProfileError::invalid_input(format!(
            "num_levels must be at least 2, got {}",
            num_levels
        )));
    }
    if !(value_area_fraction > 0.0 && value_area_fraction <= 1.0) {
        return Err(ProfileError::invalid_input(format!(
            "value_area_fraction must be in (0, 1], got {}",
            value_area_fraction
        )));
    }
    for candle in series {
        candle.validate()?;
    }

    let lows: Vec<f64> = series.iter().map(|c| c.low_price).collect();
    let highs: Vec<f64> = series.iter().map(|c| c.high_price).collect();
    let price_min = get_min(&lows);
    let price_max = get_max(&highs);

    let grid = if price_min == price_max {
        log::debug!(
            "Zero-width price range at {}, using a single bucket",
            price_min
        );
        PriceGrid::single_price(price_min)
    } else {
        PriceGrid::linspace(price_min, price_max, num_levels)
    };

    let volume_per_bucket = bucket_volumes(series, &grid);
    let total_volume: f64 = volume_per_bucket.iter().sum();
    let poc_index = point_of_control(&volume_per_bucket);
    let poc_price = grid.bucket_midpoint(poc_index);

    let (lower_index, upper_index, mut value_area_volume) =
        expand_value_area(&volume_per_bucket, poc_index, total_volume * value_area_fraction);
    if lower_index == 0 && upper_index + 1 == volume_per_bucket.len() {
        value_area_volume = total_volume;
    }

    let value_area_lower = grid.bucket_bounds(lower_index).0;
    let value_area_upper = grid.bucket_bounds(upper_index).1;

    Ok(VolumeProfile {
        grid,
        volume_per_bucket,
        poc_index,
        poc_price,
        value_area_lower_index: lower_index,
        value_area_upper_index: upper_index,
        value_area_lower,
        value_area_upper,
        total_volume,
        value_area_volume,
    })
}

/// Full-credit binning: each candle adds its whole volume to every bucket it
/// touches. Buckets receive additions in series order.
fn bucket_volumes(series: &[Candle], grid: &PriceGrid) -> Vec<f64> {
    let mut volumes = vec![0.0; grid.n_buckets()];
    for candle in series {
        let (low, high) = candle.range();
        if let Some((first, last)) = grid.touched_buckets(low, high) {
            volumes[first..=last]
                .iter_mut()
                .for_each(|bucket| *bucket += candle.volume);
        }
    }
    volumes
}

/// Index of the largest bucket; the lowest index wins a tie.
fn point_of_control(volumes: &[f64]) -> usize {
    let mut best = 0;
    for (i, &volume) in volumes.iter().enumerate().skip(1) {
        if volume > volumes[best] {
            best = i;
        }
    }
    best
}

/// Greedy expansion around `poc_index` until `target` is reached or the
/// grid runs out. Returns `(lower_index, upper_index, accumulated_volume)`.
///
/// Each step compares the next bucket above with the next bucket below and
/// takes the larger one. On a tie the upper bucket is taken. When one side is
/// at the grid edge the other side is taken unconditionally.
fn expand_value_area(volumes: &[f64], poc_index: usize, target: f64) -> (usize, usize, f64) {
    let last = volumes.len() - 1;
    let mut lower = poc_index;
    let mut upper = poc_index;
    let mut accumulated = volumes[poc_index];

    while accumulated < target && (lower > 0 || upper < last) {
        let take_upper = upper < last && (lower == 0 || volumes[upper + 1] >= volumes[lower - 1]);
        if take_upper {
            upper += 1;
            accumulated += volumes[upper];
        } else {
            lower -= 1;
            accumulated += volumes[lower];
        }
    }

    (lower, upper, accumulated)
}
