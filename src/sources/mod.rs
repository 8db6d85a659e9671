//! External market-data adapters.

pub mod binance;
pub mod catalog;
pub mod yahoo;

use std::future::Future;

use serde::{Deserialize, Serialize};

pub use binance::BinanceClient;
pub use catalog::SymbolCatalog;
pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::types::{Granularity, HistoryWindow, OhlcvBar};

/// A source of historical OHLCV bars.
pub trait MarketData: Send + Sync {
    /// Bars for `symbol` covering `window`, oldest first.
    fn fetch_bars(
        &self,
        symbol: &str,
        window: HistoryWindow,
        granularity: Granularity,
    ) -> impl Future<Output = Result<Vec<OhlcvBar>>> + Send;
}

/// Which provider backs [`MarketDataClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Yahoo,
    Binance,
}

impl DataSourceKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "yahoo" => Some(DataSourceKind::Yahoo),
            "binance" => Some(DataSourceKind::Binance),
            _ => None,
        }
    }
}

/// The configured market-data provider.
#[derive(Clone)]
pub enum MarketDataClient {
    Yahoo(YahooFinanceClient),
    Binance(BinanceClient),
}

impl MarketDataClient {
    pub fn kind(&self) -> DataSourceKind {
        match self {
            MarketDataClient::Yahoo(_) => DataSourceKind::Yahoo,
            MarketDataClient::Binance(_) => DataSourceKind::Binance,
        }
    }
}

impl MarketData for MarketDataClient {
    async fn fetch_bars(
        &self,
        symbol: &str,
        window: HistoryWindow,
        granularity: Granularity,
    ) -> Result<Vec<OhlcvBar>> {
        match self {
            MarketDataClient::Yahoo(client) => {
                client.get_historical_data(symbol, window, granularity).await
            }
            MarketDataClient::Binance(client) => {
                client.fetch_klines(symbol, window, granularity).await
            }
        }
    }
}
