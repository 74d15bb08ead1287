use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{Candle, PairInterval};

/// Where the monitor gets its candles and quotes from.
///
/// The profile engine never calls this; the driver fetches a window, hands the
/// slice to the core and drops it afterwards.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// The most recent `limit` candles for `pair`, oldest first.
    async fn fetch_candles(&self, pair: &PairInterval, limit: usize) -> Result<Vec<Candle>>;

    /// Latest traded price for `pair`.
    async fn fetch_price(&self, pair: &PairInterval) -> Result<f64>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}
