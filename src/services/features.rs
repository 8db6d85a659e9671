//! Feature engineering: turns an OHLCV series into model inputs.

use serde::{Deserialize, Serialize};

use crate::services::indicators::{fill_gaps, rolling_mean, rolling_rsi, rolling_std};
use crate::types::OhlcvBar;

pub const SMA_SHORT_PERIOD: usize = 20;
pub const SMA_LONG_PERIOD: usize = 50;
pub const RSI_PERIOD: usize = 14;
pub const VOLATILITY_PERIOD: usize = 20;

/// Column order of an indicator-enriched feature row.
pub const INDICATOR_COLUMNS: [&str; 6] = [
    "time_index",
    "sma_20",
    "sma_50",
    "rsi_14",
    "volatility_20",
    "volume",
];

/// Which columns the model sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    /// time_index plus trend, momentum, volatility and volume indicators.
    #[default]
    Indicators,
    /// time_index alone; the model extrapolates the close curve.
    CloseOnly,
}

impl FeatureSet {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "indicators" => Some(FeatureSet::Indicators),
            "close_only" => Some(FeatureSet::CloseOnly),
            _ => None,
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            FeatureSet::Indicators => &INDICATOR_COLUMNS,
            FeatureSet::CloseOnly => &INDICATOR_COLUMNS[..1],
        }
    }
}

/// Feature rows aligned one-to-one with bars, plus the raw close target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub features: Vec<Vec<f64>>,
    pub target: Vec<f64>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty() || self.features.is_empty()
    }

    /// Feature row of the most recent bar.
    pub fn last_row(&self) -> Option<&[f64]> {
        self.features.last().map(|row| row.as_slice())
    }

    /// The most recent `rows` rows. Feature values, `time_index` included,
    /// are kept as computed over the full series.
    pub fn tail(&self, rows: usize) -> TrainingSet {
        let start = self.len().saturating_sub(rows);
        TrainingSet {
            features: self.features[start..].to_vec(),
            target: self.target[start..].to_vec(),
        }
    }
}

/// Derive features for every bar.
///
/// Returns an empty set when fewer than two bars are given; the caller must
/// report that as insufficient data rather than fit anything. Indicator
/// windows longer than the series are shortened to its length so each
/// column has a computable value to fill gaps from.
pub fn build_features(bars: &[OhlcvBar], feature_set: FeatureSet) -> TrainingSet {
    if bars.len() < 2 {
        return TrainingSet::default();
    }

    let n = bars.len();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let time_index: Vec<f64> = (0..n).map(|i| i as f64).collect();

    let features = match feature_set {
        FeatureSet::CloseOnly => time_index.into_iter().map(|t| vec![t]).collect(),
        FeatureSet::Indicators => {
            let mut sma_short = rolling_mean(&closes, SMA_SHORT_PERIOD.min(n));
            let mut sma_long = rolling_mean(&closes, SMA_LONG_PERIOD.min(n));
            let mut rsi = rolling_rsi(&closes, RSI_PERIOD.min(n - 1));
            let mut volatility = rolling_std(&closes, VOLATILITY_PERIOD.min(n));

            for column in [&mut sma_short, &mut sma_long, &mut rsi, &mut volatility] {
                fill_gaps(column);
            }

            (0..n)
                .map(|i| {
                    vec![
                        time_index[i],
                        sma_short[i],
                        sma_long[i],
                        rsi[i],
                        volatility[i],
                        bars[i].volume,
                    ]
                })
                .collect()
        }
    };

    TrainingSet {
        features,
        target: closes,
    }
}
