//! Yahoo Finance API client for historical crypto data.
//!
//! Crypto pairs are quoted as `{SYMBOL}-USD`. Yahoo has no 2h/4h interval,
//! so those granularities are fetched hourly and bucketed here.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::types::{Granularity, HistoryWindow, OhlcvBar};

/// Yahoo only serves hourly bars inside a trailing window of this many days.
pub const INTRADAY_HISTORY_DAYS: i64 = 730;

/// Whether Yahoo can serve `window` at `granularity`.
pub fn supports(window: HistoryWindow, granularity: Granularity) -> bool {
    !granularity.is_intraday() || window.days() < INTRADAY_HISTORY_DAYS
}

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

/// Yahoo ticker for a crypto symbol quoted in USD.
fn yahoo_ticker(symbol: &str) -> String {
    format!("{}-USD", symbol.to_uppercase())
}

/// Turn a chart response into bars, skipping rows without a positive close.
fn parse_chart(data: YahooChartResponse) -> Result<Vec<OhlcvBar>> {
    if let Some(error) = data.chart.error {
        return Err(AppError::ExternalApi(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let result = data
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| AppError::ExternalApi("Yahoo returned no results".into()))?;

    // Yahoo omits timestamps entirely for symbols with no trading history
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let close = match closes.get(i).copied().flatten() {
            Some(c) if c > 0.0 && c.is_finite() => c,
            _ => continue,
        };
        let field = |values: &Vec<Option<f64>>| values.get(i).copied().flatten().unwrap_or(close);

        bars.push(OhlcvBar {
            time: timestamp * 1000,
            open: field(&opens),
            high: field(&highs),
            low: field(&lows),
            close,
            volume: volumes.get(i).copied().flatten().unwrap_or(0.0),
        });
    }

    Ok(bars)
}

/// Aggregate consecutive bars into `hours`-wide buckets aligned to the epoch.
pub fn bucket_bars(bars: &[OhlcvBar], hours: i64) -> Vec<OhlcvBar> {
    let bucket_ms = hours * 3_600_000;
    let mut buckets: Vec<OhlcvBar> = Vec::new();

    for bar in bars {
        let bucket_time = bar.time.div_euclid(bucket_ms) * bucket_ms;
        match buckets.last_mut() {
            Some(last) if last.time == bucket_time => {
                last.high = last.high.max(bar.high);
                last.low = last.low.min(bar.low);
                last.close = bar.close;
                last.volume += bar.volume;
            }
            _ => buckets.push(OhlcvBar {
                time: bucket_time,
                ..bar.clone()
            }),
        }
    }

    buckets
}

/// Yahoo Finance API client.
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .unwrap_or_else(|e| {
                warn!("Yahoo HTTP client setup failed, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch historical bars for a crypto symbol.
    pub async fn get_historical_data(
        &self,
        symbol: &str,
        window: HistoryWindow,
        granularity: Granularity,
    ) -> Result<Vec<OhlcvBar>> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            self.base_url,
            yahoo_ticker(symbol),
            window.yahoo_range(),
            granularity.yahoo_interval()
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo API error for {}: {}",
                symbol,
                response.status()
            )));
        }

        let data: YahooChartResponse = response.json().await?;
        let bars = parse_chart(data)?;

        Ok(match granularity.bucket_hours() {
            Some(hours) => bucket_bars(&bars, hours),
            None => bars,
        })
    }
}
