// Std library crates
use std::error::Error;
use std::fmt;

// External crates
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use binance_sdk::config::ConfigurationRestApi;
use binance_sdk::spot::{
    SpotRestApi,
    rest_api::{
        KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi, TickerPriceParams,
        TickerPriceResponse,
    },
};
use binance_sdk::{errors, errors::ConnectorError as connection_error};

// Local crates
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::binance::{BINANCE, BinanceApiConfig};
use crate::data::market_source::MarketDataSource;
use crate::domain::{Candle, PairInterval};
use crate::utils::TimeUtils;

// For "MS -> Enum" we return Result instead of panicking.
pub fn try_interval_from_ms(ms: i64) -> Result<KlinesIntervalEnum, String> {
    match ms {
        TimeUtils::MS_IN_S => Ok(KlinesIntervalEnum::Interval1s),
        TimeUtils::MS_IN_MIN => Ok(KlinesIntervalEnum::Interval1m),
        TimeUtils::MS_IN_3_MIN => Ok(KlinesIntervalEnum::Interval3m),
        TimeUtils::MS_IN_5_MIN => Ok(KlinesIntervalEnum::Interval5m),
        TimeUtils::MS_IN_15_MIN => Ok(KlinesIntervalEnum::Interval15m),
        TimeUtils::MS_IN_30_MIN => Ok(KlinesIntervalEnum::Interval30m),
        TimeUtils::MS_IN_H => Ok(KlinesIntervalEnum::Interval1h),
        TimeUtils::MS_IN_2_H => Ok(KlinesIntervalEnum::Interval2h),
        TimeUtils::MS_IN_4_H => Ok(KlinesIntervalEnum::Interval4h),
        TimeUtils::MS_IN_6_H => Ok(KlinesIntervalEnum::Interval6h),
        TimeUtils::MS_IN_8_H => Ok(KlinesIntervalEnum::Interval8h),
        TimeUtils::MS_IN_12_H => Ok(KlinesIntervalEnum::Interval12h),
        TimeUtils::MS_IN_D => Ok(KlinesIntervalEnum::Interval1d),
        TimeUtils::MS_IN_3_D => Ok(KlinesIntervalEnum::Interval3d),
        TimeUtils::MS_IN_W => Ok(KlinesIntervalEnum::Interval1w),
        TimeUtils::MS_IN_1_M => Ok(KlinesIntervalEnum::Interval1M),
        _ => Err(format!("Unsupported interval: {}ms", ms)),
    }
}

/// One raw kline row. Only the open time is mandatory at this stage.
#[derive(Debug, PartialEq)]
pub struct BNKline {
    pub open_timestamp_ms: i64,
    pub open_price: Option<f64>,
    pub high_price: Option<f64>,
    pub low_price: Option<f64>,
    pub close_price: Option<f64>,
    pub base_asset_volume: Option<f64>,
}

// Custom error type for BNKline for better error messages.
#[derive(Debug)]
pub enum BNKlineError {
    InvalidLength,
    InvalidType(String),
    MissingField {
        field: &'static str,
        open_timestamp_ms: i64,
    },
    ConnectionFailed(String),
}

impl fmt::Display for BNKlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BNKlineError::InvalidLength => write!(f, "Invalid length"),
            BNKlineError::InvalidType(string) => write!(f, "Invalid type: {}", string),
            BNKlineError::MissingField {
                field,
                open_timestamp_ms,
            } => write!(
                f,
                "Kline opened at {} has no usable {}",
                open_timestamp_ms, field
            ),
            BNKlineError::ConnectionFailed(msg) => {
                write!(f, "Binance API connection failed: {}.", msg)
            }
        }
    }
}

impl Error for BNKlineError {}

// Binance sends prices and volumes as strings; anything else (or an unparsable string) is None.
fn kline_item_to_float(item: Option<KlinesItemInner>) -> Option<f64> {
    item.and_then(|inner| {
        if let KlinesItemInner::String(s) = inner {
            s.parse::<f64>().ok()
        } else {
            None
        }
    })
}

impl TryFrom<Vec<KlinesItemInner>> for BNKline {
    type Error = BNKlineError;

    fn try_from(vec_inner_klines: Vec<KlinesItemInner>) -> Result<Self, Self::Error> {
        let mut items = vec_inner_klines.into_iter();
        let open_timestamp_ms = match items.next().ok_or(BNKlineError::InvalidLength)? {
            KlinesItemInner::Integer(a) => a,
            _ => return Err(BNKlineError::InvalidType("open_time".to_string())),
        };

        let open_price = kline_item_to_float(items.next());
        let high_price = kline_item_to_float(items.next());
        let low_price = kline_item_to_float(items.next());
        let close_price = kline_item_to_float(items.next());
        let base_asset_volume = kline_item_to_float(items.next());

        Ok(BNKline {
            open_timestamp_ms,
            open_price,
            high_price,
            low_price,
            close_price,
            base_asset_volume,
        })
    }
}

impl TryFrom<BNKline> for Candle {
    type Error = BNKlineError;

    fn try_from(kline: BNKline) -> Result<Self, Self::Error> {
        let ts = kline.open_timestamp_ms;
        let require = |value: Option<f64>, field: &'static str| {
            value.ok_or(BNKlineError::MissingField {
                field,
                open_timestamp_ms: ts,
            })
        };
        Ok(Candle::new(
            ts,
            require(kline.open_price, "open")?,
            require(kline.high_price, "high")?,
            require(kline.low_price, "low")?,
            require(kline.close_price, "close")?,
            require(kline.base_asset_volume, "volume")?,
        ))
    }
}

pub fn convert_klines(data: Vec<Vec<KlinesItemInner>>) -> Result<Vec<Candle>, BNKlineError> {
    data.into_iter()
        .map(|row| BNKline::try_from(row).and_then(Candle::try_from))
        .collect()
}

fn configure_binance_client() -> Result<RestApi> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    // Create the Spot REST API client
    Ok(SpotRestApi::production(rest_conf))
}

/// Logs the connector error in detail, then wraps it for the caller.
fn connection_failure(e: anyhow::Error, pair_interval: &PairInterval, call: &str) -> anyhow::Error {
    if let Some(conn_err) = e.downcast_ref::<errors::ConnectorError>() {
        match conn_err {
            connection_error::ConnectorClientError(msg) => {
                log::error!(
                    "{} Client error: Check your request parameters. {}",
                    pair_interval,
                    msg
                );
            }
            connection_error::TooManyRequestsError(msg) => {
                log::error!(
                    "{} Rate limit exceeded. Please wait and try again. {}",
                    pair_interval,
                    msg
                );
            }
            connection_error::RateLimitBanError(msg) => {
                log::error!(
                    "{} IP address banned due to excessive rate limits. {}",
                    pair_interval,
                    msg
                );
            }
            errors::ConnectorError::ServerError { msg, status_code } => {
                log::error!(
                    "{} Server error: {} (status code: {:?})",
                    pair_interval,
                    msg,
                    status_code
                );
            }
            errors::ConnectorError::NetworkError(msg) => {
                log::error!(
                    "{} Network error: Check your internet connection. {}",
                    pair_interval,
                    msg
                );
            }
            connection_error::BadRequestError(msg) => {
                log::error!(
                    "{} Bad request: Verify your input parameters. {}",
                    pair_interval,
                    msg
                );
            }
            other => {
                log::error!("Unexpected ConnectionError variant: {:?}", other);
            }
        }
        anyhow::Error::new(BNKlineError::ConnectionFailed(conn_err.to_string()))
            .context(format!("Binance {} call failed for {}", call, pair_interval))
    } else {
        log::error!(
            "An unexpected error occurred for {}: {:#}",
            pair_interval,
            e
        );
        anyhow::Error::new(BNKlineError::ConnectionFailed(e.to_string())).context(format!(
            "Unexpected error during Binance {} call for {}",
            call, pair_interval
        ))
    }
}

/// Binance spot REST implementation of `MarketDataSource`.
pub struct BinanceMarket {
    rest_client: RestApi,
}

impl BinanceMarket {
    pub fn new() -> Result<Self> {
        let rest_client =
            configure_binance_client().context("Failed to configure Binance REST client")?;
        Ok(Self { rest_client })
    }
}

#[async_trait]
impl MarketDataSource for BinanceMarket {
    fn signature(&self) -> &'static str {
        "Binance API"
    }

    async fn fetch_candles(
        &self,
        pair_interval: &PairInterval,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let interval = try_interval_from_ms(pair_interval.interval_ms).map_err(|e| anyhow!(e))?;
        let limit = i32::try_from(limit)
            .ok()
            .filter(|l| *l <= BINANCE.limits.klines_limit)
            .ok_or_else(|| anyhow!("Kline limit {} exceeds Binance maximum", limit))?;

        let params = KlinesParams::builder(pair_interval.bn_name().to_string(), interval)
            .limit(limit)
            .build()?;

        let response = self
            .rest_client
            .klines(params)
            .await
            .map_err(|e| connection_failure(e, pair_interval, "klines"))?;
        let rows = response.data().await?;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_market_fetch {
            log::info!("{} received {} kline rows", pair_interval, rows.len());
        }

        let candles = convert_klines(rows).map_err(|e| {
            anyhow::Error::new(e).context(format!("{} convert_klines failed", pair_interval))
        })?;
        if candles.is_empty() {
            bail!("{}: Binance returned zero klines", pair_interval);
        }
        Ok(candles)
    }

    async fn fetch_price(&self, pair_interval: &PairInterval) -> Result<f64> {
        let params = TickerPriceParams {
            symbol: Some(pair_interval.bn_name().to_string()),
            symbols: None,
            symbol_status: None,
        };

        let response = self
            .rest_client
            .ticker_price(params)
            .await
            .map_err(|e| connection_failure(e, pair_interval, "ticker_price"))?;

        match response.data().await? {
            TickerPriceResponse::TickerPriceResponse1(ticker) => {
                let price_text = ticker
                    .price
                    .as_deref()
                    .ok_or_else(|| anyhow!("{} ticker response has no price", pair_interval))?;
                let price = price_text.parse::<f64>().with_context(|| {
                    format!("{} ticker price '{}' is not a number", pair_interval, price_text)
                })?;

                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_market_fetch {
                    log::info!("{} ticker price {}", pair_interval, price);
                }
                Ok(price)
            }
            TickerPriceResponse::TickerPriceResponse2(_) => {
                bail!("{} expected a single ticker, got a list", pair_interval)
            }
            _ => bail!("{} unexpected ticker response type", pair_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row(ts: i64, fields: [&str; 5]) -> Vec<KlinesItemInner> {
        let mut row = vec![KlinesItemInner::Integer(ts)];
        row.extend(fields.iter().map(|f| KlinesItemInner::String(f.to_string())));
        // close time, quote volume, trades, taker base, taker quote, ignore
        row.push(KlinesItemInner::Integer(ts + 59_999));
        row.extend(
            ["1000.0", "12", "1.0", "100.0", "0"]
                .iter()
                .map(|f| KlinesItemInner::String(f.to_string())),
        );
        row
    }

    #[test]
    fn rows_become_candles() {
        let rows = vec![
            raw_row(0, ["100.0", "110.0", "95.5", "105.25", "3.5"]),
            raw_row(60_000, ["105.25", "106.0", "104.0", "104.5", "0.0"]),
        ];
        let candles = convert_klines(rows).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0], Candle::new(0, 100.0, 110.0, 95.5, 105.25, 3.5));
        assert_eq!(candles[1].open_time_ms, 60_000);
    }

    #[test]
    fn unparsable_price_is_reported() {
        let rows = vec![raw_row(0, ["100.0", "oops", "95.5", "105.25", "3.5"])];
        let err = convert_klines(rows).unwrap_err();
        assert!(matches!(
            err,
            BNKlineError::MissingField { field: "high", .. }
        ));
    }

    #[test]
    fn non_integer_open_time_is_rejected() {
        let row = vec![KlinesItemInner::String("0".to_string())];
        assert!(matches!(
            BNKline::try_from(row),
            Err(BNKlineError::InvalidType(_))
        ));
        assert!(matches!(
            BNKline::try_from(Vec::new()),
            Err(BNKlineError::InvalidLength)
        ));
    }

    #[test]
    fn interval_mapping() {
        assert!(matches!(
            try_interval_from_ms(TimeUtils::MS_IN_H),
            Ok(KlinesIntervalEnum::Interval1h)
        ));
        assert!(try_interval_from_ms(1234).is_err());
    }
}
