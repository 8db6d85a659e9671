use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV (Open, High, Low, Close, Volume) bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    /// Bar open time in milliseconds since the epoch.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// Bar open time as a UTC timestamp.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }

    /// Calendar date (UTC) the bar opened on.
    pub fn date(&self) -> Option<NaiveDate> {
        self.datetime().map(|dt| dt.date_naive())
    }
}

/// How far back the historical series reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HistoryWindow {
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    #[default]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl HistoryWindow {
    /// Parse a window from its query-string form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "3mo" => Some(HistoryWindow::ThreeMonths),
            "6mo" => Some(HistoryWindow::SixMonths),
            "1y" => Some(HistoryWindow::OneYear),
            "2y" => Some(HistoryWindow::TwoYears),
            "5y" => Some(HistoryWindow::FiveYears),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryWindow::ThreeMonths => "3mo",
            HistoryWindow::SixMonths => "6mo",
            HistoryWindow::OneYear => "1y",
            HistoryWindow::TwoYears => "2y",
            HistoryWindow::FiveYears => "5y",
        }
    }

    /// Calendar days covered by the window.
    pub fn days(&self) -> i64 {
        match self {
            HistoryWindow::ThreeMonths => 90,
            HistoryWindow::SixMonths => 180,
            HistoryWindow::OneYear => 365,
            HistoryWindow::TwoYears => 730,
            HistoryWindow::FiveYears => 1825,
        }
    }

    /// Range parameter understood by the Yahoo chart API.
    pub fn yahoo_range(&self) -> &'static str {
        self.as_str()
    }
}

/// Bar size of the historical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    #[default]
    OneDay,
}

impl Granularity {
    /// Parse a granularity from its query-string form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "2h" => Some(Granularity::TwoHours),
            "4h" => Some(Granularity::FourHours),
            "1d" => Some(Granularity::OneDay),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::TwoHours => "2h",
            Granularity::FourHours => "4h",
            Granularity::OneDay => "1d",
        }
    }

    /// Bar length in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Granularity::TwoHours => 7200,
            Granularity::FourHours => 14400,
            Granularity::OneDay => 86400,
        }
    }

    /// Kline interval for the Binance REST API.
    pub fn binance_interval(&self) -> &'static str {
        self.as_str()
    }

    /// Interval requested from Yahoo. Yahoo has no 2h/4h bars, so those are
    /// fetched hourly and bucketed locally.
    pub fn yahoo_interval(&self) -> &'static str {
        match self {
            Granularity::TwoHours | Granularity::FourHours => "1h",
            Granularity::OneDay => "1d",
        }
    }

    /// Hours per bucket when hourly Yahoo bars must be aggregated.
    pub fn bucket_hours(&self) -> Option<i64> {
        match self {
            Granularity::TwoHours => Some(2),
            Granularity::FourHours => Some(4),
            Granularity::OneDay => None,
        }
    }

    pub fn is_intraday(&self) -> bool {
        !matches!(self, Granularity::OneDay)
    }

    /// strftime pattern used for historical labels at this granularity.
    pub fn date_format(&self) -> &'static str {
        if self.is_intraday() {
            "%Y-%m-%d %H:%M"
        } else {
            "%Y-%m-%d"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // HistoryWindow Tests
    // =========================================================================

    #[test]
    fn test_history_window_from_str() {
        assert_eq!(HistoryWindow::from_str("3mo"), Some(HistoryWindow::ThreeMonths));
        assert_eq!(HistoryWindow::from_str("5y"), Some(HistoryWindow::FiveYears));
        assert_eq!(HistoryWindow::from_str("10y"), None);
        assert_eq!(HistoryWindow::from_str(""), None);
    }

    #[test]
    fn test_history_window_round_trips_through_as_str() {
        for window in [
            HistoryWindow::ThreeMonths,
            HistoryWindow::SixMonths,
            HistoryWindow::OneYear,
            HistoryWindow::TwoYears,
            HistoryWindow::FiveYears,
        ] {
            assert_eq!(HistoryWindow::from_str(window.as_str()), Some(window));
        }
    }

    #[test]
    fn test_history_window_days_increase() {
        assert!(HistoryWindow::ThreeMonths.days() < HistoryWindow::SixMonths.days());
        assert!(HistoryWindow::TwoYears.days() < HistoryWindow::FiveYears.days());
    }

    #[test]
    fn test_history_window_default() {
        assert_eq!(HistoryWindow::default(), HistoryWindow::SixMonths);
    }

    // =========================================================================
    // Granularity Tests
    // =========================================================================

    #[test]
    fn test_granularity_yahoo_interval() {
        assert_eq!(Granularity::TwoHours.yahoo_interval(), "1h");
        assert_eq!(Granularity::FourHours.yahoo_interval(), "1h");
        assert_eq!(Granularity::OneDay.yahoo_interval(), "1d");
    }

    #[test]
    fn test_granularity_bucket_hours() {
        assert_eq!(Granularity::TwoHours.bucket_hours(), Some(2));
        assert_eq!(Granularity::FourHours.bucket_hours(), Some(4));
        assert_eq!(Granularity::OneDay.bucket_hours(), None);
    }

    #[test]
    fn test_granularity_date_format() {
        assert_eq!(Granularity::OneDay.date_format(), "%Y-%m-%d");
        assert_eq!(Granularity::FourHours.date_format(), "%Y-%m-%d %H:%M");
    }

    #[test]
    fn test_granularity_serde() {
        let json = serde_json::to_string(&Granularity::FourHours).unwrap();
        assert_eq!(json, "\"4h\"");
        let parsed: Granularity = serde_json::from_str("\"1d\"").unwrap();
        assert_eq!(parsed, Granularity::OneDay);
    }

    // =========================================================================
    // OhlcvBar Tests
    // =========================================================================

    #[test]
    fn test_ohlcv_bar_date() {
        let bar = OhlcvBar {
            time: 1_700_000_000_000,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 0.0,
        };
        assert_eq!(bar.date(), NaiveDate::from_ymd_opt(2023, 11, 14));
    }
}
