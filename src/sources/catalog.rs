//! Symbol catalog: what can be forecast, and what is rising right now.

use std::cmp::Ordering;
use tracing::warn;

use crate::error::Result;
use crate::sources::binance::{BinanceClient, BinanceTicker};
use crate::types::SymbolListing;

/// Served when the exchange listing is unreachable.
pub const TOP_CRYPTOS: &[&str] = &[
    "BTC", "ETH", "USDT", "BNB", "SOL", "XRP", "USDC", "ADA", "AVAX", "DOGE",
];

/// Stablecoin bases; flat by construction, so never worth forecasting.
const STABLECOINS: &[&str] = &["USDC", "BUSD", "TUSD", "FDUSD", "DAI", "USDP", "EUR", "AEUR"];

/// Leveraged-token suffixes.
const LEVERAGED_SUFFIXES: &[&str] = &["UP", "DOWN", "BULL", "BEAR"];

fn is_tradable(base: &str) -> bool {
    !STABLECOINS.contains(&base)
        && !LEVERAGED_SUFFIXES
            .iter()
            .any(|suffix| base.len() > suffix.len() && base.ends_with(suffix))
}

fn by_quote_volume_desc(a: &BinanceTicker, b: &BinanceTicker) -> Ordering {
    b.quote_volume()
        .partial_cmp(&a.quote_volume())
        .unwrap_or(Ordering::Equal)
}

/// Tradable USDT-quoted bases, most liquid first.
pub fn tradable_symbols(tickers: &[BinanceTicker]) -> Vec<String> {
    let mut tradable: Vec<&BinanceTicker> = tickers
        .iter()
        .filter(|t| t.base_asset().is_some_and(is_tradable) && t.last_price() > 0.0)
        .collect();
    tradable.sort_by(|a, b| by_quote_volume_desc(a, b));
    tradable
        .into_iter()
        .filter_map(|t| t.base_asset().map(str::to_string))
        .collect()
}

/// Tradable bases with a positive 24h change, ranked by quote volume.
pub fn rising_shortlist(tickers: &[BinanceTicker], limit: usize) -> Vec<String> {
    let mut rising: Vec<&BinanceTicker> = tickers
        .iter()
        .filter(|t| t.base_asset().is_some_and(is_tradable))
        .filter(|t| t.change_percent() > 0.0 && t.last_price() > 0.0)
        .collect();
    rising.sort_by(|a, b| by_quote_volume_desc(a, b));
    rising
        .into_iter()
        .filter_map(|t| t.base_asset().map(str::to_string))
        .take(limit)
        .collect()
}

/// Exchange-backed symbol catalog.
#[derive(Clone)]
pub struct SymbolCatalog {
    binance: BinanceClient,
}

impl SymbolCatalog {
    pub fn new(binance: BinanceClient) -> Self {
        Self { binance }
    }

    /// Tradable symbols, or the static list when the exchange is unreachable.
    pub async fn list_symbols(&self) -> SymbolListing {
        match self.binance.fetch_tickers().await {
            Ok(tickers) => {
                let symbols = tradable_symbols(&tickers);
                if symbols.is_empty() {
                    warn!("Exchange listing was empty, serving fallback symbols");
                    return Self::fallback();
                }
                SymbolListing {
                    symbols,
                    fallback: false,
                }
            }
            Err(e) => {
                warn!("Symbol listing unavailable, serving fallback symbols: {}", e);
                Self::fallback()
            }
        }
    }

    /// Currently rising symbols. Fails if the listing call fails.
    pub async fn rising_symbols(&self, limit: usize) -> Result<Vec<String>> {
        let tickers = self.binance.fetch_tickers().await?;
        Ok(rising_shortlist(&tickers, limit))
    }

    pub fn fallback() -> SymbolListing {
        SymbolListing {
            symbols: TOP_CRYPTOS.iter().map(|s| s.to_string()).collect(),
            fallback: true,
        }
    }
}
