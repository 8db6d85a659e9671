//! Shared fixtures: synthetic series and an in-memory market-data source.

#![allow(dead_code)]

use std::collections::HashMap;

use specter::error::{AppError, Result};
use specter::sources::MarketData;
use specter::types::{Granularity, HistoryWindow, OhlcvBar};

/// 2024-01-01T00:00:00Z in milliseconds.
pub const START_MS: i64 = 1_704_067_200_000;
pub const DAY_MS: i64 = 86_400_000;

/// Daily bars following `close(i)`, with constant volume.
pub fn daily_bars<F: Fn(usize) -> f64>(count: usize, volume: f64, close: F) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let c = close(i);
            OhlcvBar {
                time: START_MS + i as i64 * DAY_MS,
                open: c,
                high: c * 1.01,
                low: c * 0.99,
                close: c,
                volume,
            }
        })
        .collect()
}

/// Linear upward close trend with zero volume.
pub fn linear_uptrend(count: usize) -> Vec<OhlcvBar> {
    daily_bars(count, 0.0, |i| 100.0 + 2.0 * i as f64)
}

/// Noisy series with a drift, for exercising the indicator columns.
pub fn wavy(count: usize, drift: f64) -> Vec<OhlcvBar> {
    daily_bars(count, 1_000.0, |i| {
        let t = i as f64;
        100.0 + drift * t + (t * 0.7).sin() * 4.0 + (t * 0.23).cos() * 2.0
    })
}

/// Serves canned series by symbol; unknown symbols fail like an upstream
/// outage.
#[derive(Default)]
pub struct MockMarketData {
    series: HashMap<String, Vec<OhlcvBar>>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.series.insert(symbol.to_string(), bars);
        self
    }
}

impl MarketData for MockMarketData {
    async fn fetch_bars(
        &self,
        symbol: &str,
        _window: HistoryWindow,
        _granularity: Granularity,
    ) -> Result<Vec<OhlcvBar>> {
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| AppError::ExternalApi(format!("no market data for {}", symbol)))
    }
}
