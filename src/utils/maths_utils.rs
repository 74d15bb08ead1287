use argminmax::ArgMinMax;
use serde::{Deserialize, Serialize};

/// Evenly spaced price boundaries. `n` boundaries give `n - 1` buckets,
/// bucket `i` spanning `[boundaries[i], boundaries[i + 1]]`.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct PriceGrid {
    boundaries: Vec<f64>,
}

impl PriceGrid {
    /// `n_levels` boundaries from `start` to `end` inclusive.
    /// Boundary `i` is `start + i * step`; the last one is pinned to `end` so
    /// rounding never leaves the series high outside the grid.
    pub fn linspace(start: f64, end: f64, n_levels: usize) -> Self {
        debug_assert!(n_levels >= 2);
        let step = (end - start) / (n_levels - 1) as f64;
        let mut boundaries: Vec<f64> = (0..n_levels).map(|i| start + i as f64 * step).collect();
        if let Some(last) = boundaries.last_mut() {
            *last = end;
        }
        PriceGrid { boundaries }
    }

    /// Zero-width grid used when the whole series traded at one price.
    pub fn single_price(price: f64) -> Self {
        PriceGrid {
            boundaries: vec![price, price],
        }
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    #[inline]
    pub fn n_buckets(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    pub fn bucket_bounds(&self, bucket: usize) -> (f64, f64) {
        debug_assert!(bucket < self.n_buckets());
        (self.boundaries[bucket], self.boundaries[bucket + 1])
    }

    pub fn bucket_midpoint(&self, bucket: usize) -> f64 {
        let (lower, upper) = self.bucket_bounds(bucket);
        (lower + upper) / 2.0
    }

    /// Inclusive index range of the buckets touched by `[low, high]`.
    ///
    /// A bucket is touched when `low <= upper && high >= lower`. Because the
    /// boundaries are sorted the touched buckets are contiguous, so two binary
    /// searches replace a scan over every bucket.
    pub fn touched_buckets(&self, low: f64, high: f64) -> Option<(usize, usize)> {
        let n = self.n_buckets();
        if n == 0 {
            return None;
        }
        let uppers = &self.boundaries[1..];
        let lowers = &self.boundaries[..n];
        let first = uppers.partition_point(|&upper| upper < low);
        let end = lowers.partition_point(|&lower| lower <= high);
        if first < end {
            Some((first, end - 1))
        } else {
            None
        }
    }
}

pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}
