use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::try_join;
use tokio::time::{Instant, MissedTickBehavior};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::RunConfig;
use crate::data::{MarketDataSource, SignalLog};
use crate::domain::PairInterval;
use crate::engine::report::Evaluation;
use crate::models::{classify, compute_profile, distance_scale};
use crate::utils::time_utils::local_now_string;

/// Periodic VRVP evaluation for one symbol.
///
/// Owns the schedule and the retry policy; the profile engine and classifier
/// it calls are pure and keep nothing between ticks.
pub struct Monitor {
    source: Arc<dyn MarketDataSource>,
    config: RunConfig,
    pair_interval: PairInterval,
    signal_log: SignalLog,
}

impl Monitor {
    pub fn new(source: Arc<dyn MarketDataSource>, config: RunConfig) -> Result<Self> {
        let pair_interval = config.pair_interval()?;
        let signal_log = SignalLog::new(config.signal_log.clone());
        Ok(Self {
            source,
            config,
            pair_interval,
            signal_log,
        })
    }

    pub fn signal_log(&self) -> &SignalLog {
        &self.signal_log
    }

    /// Fetches a fresh window and quote and runs the core on them.
    pub async fn evaluate(&self) -> Result<Evaluation> {
        let started = Instant::now();
        let (candles, current_price) = try_join(
            self.source
                .fetch_candles(&self.pair_interval, self.config.trading.lookback_period),
            self.source.fetch_price(&self.pair_interval),
        )
        .await
        .with_context(|| {
            format!(
                "Market data fetch from {} failed for {}",
                self.source.signature(),
                self.pair_interval
            )
        })?;
        log::debug!(
            "{} fetched {} candles and price {} in {:?}",
            self.pair_interval,
            candles.len(),
            current_price,
            started.elapsed()
        );

        let profile = compute_profile(
            &candles,
            self.config.profile.num_levels,
            self.config.profile.value_area_fraction,
        )
        .with_context(|| format!("Volume profile failed for {}", self.pair_interval))?;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_profile_buckets {
            for (i, volume) in profile.volume_per_bucket.iter().enumerate() {
                let (lower, upper) = profile.grid.bucket_bounds(i);
                log::info!("[{:>10.2}, {:>10.2}] {:>14.4}", lower, upper, volume);
            }
        }

        let signal = classify(&profile, current_price);
        let distance =
            distance_scale(current_price, profile.value_area_upper, profile.value_area_lower)?;

        Ok(Evaluation {
            timestamp: local_now_string(),
            pair_interval: self.pair_interval.clone(),
            candle_count: candles.len(),
            window_end_ms: candles.last().map(|c| c.open_time_ms).unwrap_or_default(),
            current_price,
            profile,
            signal,
            distance,
        })
    }

    /// One full cycle: evaluate, print, and log actionable signals.
    pub async fn tick(&self) -> Result<Evaluation> {
        let evaluation = self.evaluate().await?;
        println!("{}", evaluation.render(self.config.update.interval_seconds));
        if let Some(record) = evaluation.signal_record() {
            self.signal_log.append(&record)?;
        }
        Ok(evaluation)
    }

    /// Single evaluation for one-shot runs. The signal log is created with
    /// its header even when the reading is neutral.
    pub async fn run_once(&self) -> Result<Evaluation> {
        self.signal_log.ensure_created()?;
        self.tick().await
    }

    /// Runs until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {}", e);
            }
        })
        .await
    }

    /// Runs until `shutdown` completes. A failed tick is retried after the
    /// retry delay instead of waiting for the next regular tick, and never
    /// ends the loop. Shutdown is honoured while a tick is in flight.
    pub async fn run_until(&self, shutdown: impl Future<Output = ()>) -> Result<()> {
        self.signal_log.ensure_created()?;
        log::info!(
            "Monitoring {} every {} seconds using {} (Ctrl-C to stop)",
            self.pair_interval,
            self.config.update.interval_seconds,
            self.source.signature()
        );

        let retry_delay = Duration::from_secs(self.config.update.retry_seconds);
        let mut ticker =
            tokio::time::interval(Duration::from_secs(self.config.update.interval_seconds));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown = std::pin::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut shutdown => break,
            }

            let outcome = tokio::select! {
                outcome = self.tick() => outcome,
                _ = &mut shutdown => break,
            };

            if let Err(e) = outcome {
                log::error!("⚠️  Evaluation failed: {:#}", e);
                log::info!("Retrying in {:?}", retry_delay);
                tokio::select! {
                    _ = tokio::time::sleep(retry_delay) => ticker.reset_immediately(),
                    _ = &mut shutdown => break,
                }
            }
        }

        log::info!("Monitor for {} stopped", self.pair_interval);
        Ok(())
    }
}
