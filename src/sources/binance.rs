use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::types::{Granularity, HistoryWindow, OhlcvBar};

/// Quote asset every symbol is paired against.
pub const QUOTE_ASSET: &str = "USDT";

/// Klines returned per request (Binance maximum).
const KLINE_PAGE_LIMIT: usize = 1000;

/// Binance 24hr ticker response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceTicker {
    pub symbol: String,
    pub last_price: String,
    pub price_change_percent: String,
    pub quote_volume: String,
}

impl BinanceTicker {
    pub fn last_price(&self) -> f64 {
        self.last_price.parse().unwrap_or(0.0)
    }

    pub fn change_percent(&self) -> f64 {
        self.price_change_percent.parse().unwrap_or(0.0)
    }

    pub fn quote_volume(&self) -> f64 {
        self.quote_volume.parse().unwrap_or(0.0)
    }

    /// Base asset when the pair is quoted in USDT.
    pub fn base_asset(&self) -> Option<&str> {
        self.symbol
            .strip_suffix(QUOTE_ASSET)
            .filter(|base| !base.is_empty())
    }
}

/// One kline row:
/// `[open_time, open, high, low, close, volume, close_time, quote_volume,
///   trades, taker_base, taker_quote, ignore]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct BinanceKline(
    i64,
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    u64,
    String,
    String,
    String,
);

impl BinanceKline {
    fn into_bar(self) -> Option<OhlcvBar> {
        let bar = OhlcvBar {
            time: self.0,
            open: self.1.parse().ok()?,
            high: self.2.parse().ok()?,
            low: self.3.parse().ok()?,
            close: self.4.parse().ok()?,
            volume: self.5.parse().ok()?,
        };
        (bar.close > 0.0).then_some(bar)
    }
}

/// At most `max` characters of an error body, for logging.
fn body_excerpt(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Trading pair for a symbol.
pub fn trading_pair(symbol: &str) -> String {
    format!("{}{}", symbol.to_uppercase(), QUOTE_ASSET)
}

/// Binance REST client.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BinanceClient {
    /// Create a new Binance client.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Specter/1.0")
            .build()
            .unwrap_or_else(|e| {
                warn!("Binance HTTP client setup failed, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut request = self.client.get(url);
        if let Some(ref key) = self.api_key {
            request = request.header("X-MBX-APIKEY", key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("Binance API returned {}: {}", status, body_excerpt(&text, 200));
            return Err(AppError::ExternalApi(format!("Binance API error: {}", status)));
        }

        Ok(response.json().await?)
    }

    /// All 24hr tickers in one request.
    pub async fn fetch_tickers(&self) -> Result<Vec<BinanceTicker>> {
        let url = format!("{}/ticker/24hr", self.base_url);
        self.get_json(&url).await
    }

    /// Klines covering `window` up to now, paging forward from the start.
    pub async fn fetch_klines(
        &self,
        symbol: &str,
        window: HistoryWindow,
        granularity: Granularity,
    ) -> Result<Vec<OhlcvBar>> {
        let pair = trading_pair(symbol);
        let now = chrono::Utc::now().timestamp_millis();
        let mut start = now - window.days() * 86_400_000;
        let mut bars = Vec::new();

        loop {
            let url = format!(
                "{}/klines?symbol={}&interval={}&startTime={}&limit={}",
                self.base_url,
                pair,
                granularity.binance_interval(),
                start,
                KLINE_PAGE_LIMIT
            );
            debug!("Fetching Binance klines: {}", url);

            let page: Vec<BinanceKline> = self.get_json(&url).await?;
            let page_len = page.len();
            let Some(last_open) = page.last().map(|k| k.0) else {
                break;
            };

            bars.extend(page.into_iter().filter_map(BinanceKline::into_bar));

            if page_len < KLINE_PAGE_LIMIT {
                break;
            }
            start = last_open + granularity.seconds() * 1000;
            if start >= now {
                break;
            }
        }

        Ok(bars)
    }
}
