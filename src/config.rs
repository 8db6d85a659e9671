use std::env;
use std::time::Duration;

use crate::services::features::FeatureSet;
use crate::services::model::ModelSettings;
use crate::services::pipeline::{PipelineSettings, MAX_TRAINING_ROWS};
use crate::sources::DataSourceKind;

const DEFAULT_YAHOO_API_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_BINANCE_API_URL: &str = "https://api.binance.com/api/v3";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Where historical bars come from.
    pub data_source: DataSourceKind,
    /// Which columns the model is trained on.
    pub feature_set: FeatureSet,
    /// Yahoo Finance chart API base URL.
    pub yahoo_api_url: String,
    /// Binance REST API base URL.
    pub binance_api_url: String,
    /// Binance API key (optional, public endpoints work without).
    pub binance_api_key: Option<String>,
    /// Timeout applied to every upstream request.
    pub http_timeout: Duration,
    /// Forecast horizon used when a request does not name one.
    pub default_predict_days: usize,
    /// Largest horizon a request may ask for.
    pub max_predict_days: usize,
    /// Size of the rising-symbol shortlist scanned for suggestions.
    pub suggestion_candidates: usize,
    /// SVR regularization strength.
    pub svr_c: f64,
    /// SVR insensitive-loss margin.
    pub svr_epsilon: f64,
    /// SVR solver tolerance.
    pub svr_tol: f64,
    /// Fixed RBF gamma; adaptive when unset.
    pub svr_gamma: Option<f64>,
    /// Trailing rows the SVR is fitted on.
    pub max_training_rows: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Values that fail to
    /// parse fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_or = |key: &str, default: f64| -> f64 {
            lookup(key)
                .and_then(|v| v.parse().ok())
                .filter(|v: &f64| v.is_finite())
                .unwrap_or(default)
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            data_source: lookup("DATA_SOURCE")
                .as_deref()
                .and_then(DataSourceKind::from_str)
                .unwrap_or_default(),
            feature_set: lookup("FEATURE_SET")
                .as_deref()
                .and_then(FeatureSet::from_str)
                .unwrap_or_default(),
            yahoo_api_url: lookup("YAHOO_API_URL")
                .unwrap_or_else(|| DEFAULT_YAHOO_API_URL.to_string()),
            binance_api_url: lookup("BINANCE_API_URL")
                .unwrap_or_else(|| DEFAULT_BINANCE_API_URL.to_string()),
            binance_api_key: lookup("BINANCE_API_KEY").filter(|k| !k.is_empty()),
            http_timeout: Duration::from_secs(
                lookup("HTTP_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            default_predict_days: lookup("DEFAULT_PREDICT_DAYS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            max_predict_days: lookup("MAX_PREDICT_DAYS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(90),
            suggestion_candidates: lookup("SUGGESTION_CANDIDATES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            svr_c: parse_or("SVR_C", 10.0),
            svr_epsilon: parse_or("SVR_EPSILON", 0.01),
            svr_tol: parse_or("SVR_TOL", 1e-3),
            svr_gamma: lookup("SVR_GAMMA")
                .and_then(|v| v.parse().ok())
                .filter(|g: &f64| g.is_finite() && *g > 0.0),
            max_training_rows: lookup("MAX_TRAINING_ROWS")
                .and_then(|v| v.parse().ok())
                .filter(|rows: &usize| *rows >= 2)
                .unwrap_or(MAX_TRAINING_ROWS),
        }
    }

    /// Pipeline settings shared by every forecast this process runs.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            feature_set: self.feature_set,
            model: ModelSettings {
                c: self.svr_c,
                epsilon: self.svr_epsilon,
                tol: self.svr_tol,
                gamma: self.svr_gamma,
            },
            max_training_rows: self.max_training_rows,
            ..PipelineSettings::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.data_source, DataSourceKind::Yahoo);
        assert_eq!(config.feature_set, FeatureSet::Indicators);
        assert_eq!(config.default_predict_days, 7);
        assert_eq!(config.suggestion_candidates, 10);
        assert!(config.svr_gamma.is_none());
        assert!(config.binance_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("PORT", "8080"),
            ("DATA_SOURCE", "binance"),
            ("FEATURE_SET", "close_only"),
            ("SVR_C", "100"),
            ("SVR_GAMMA", "0.1"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_source, DataSourceKind::Binance);
        assert_eq!(config.feature_set, FeatureSet::CloseOnly);
        assert_eq!(config.svr_c, 100.0);
        assert_eq!(config.svr_gamma, Some(0.1));
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = config_with(&[
            ("PORT", "not-a-port"),
            ("SVR_EPSILON", "NaN"),
            ("SVR_GAMMA", "-1"),
            ("DATA_SOURCE", "kraken"),
        ]);
        assert_eq!(config.port, 5000);
        assert_eq!(config.svr_epsilon, 0.01);
        assert!(config.svr_gamma.is_none());
        assert_eq!(config.data_source, DataSourceKind::Yahoo);
    }

    #[test]
    fn test_empty_api_key_is_ignored() {
        let config = config_with(&[("BINANCE_API_KEY", "")]);
        assert!(config.binance_api_key.is_none());
    }

    #[test]
    fn test_pipeline_settings_carry_model_parameters() {
        let config = config_with(&[
            ("SVR_C", "3.5"),
            ("FEATURE_SET", "close_only"),
            ("MAX_TRAINING_ROWS", "200"),
        ]);
        let settings = config.pipeline_settings();
        assert_eq!(settings.model.c, 3.5);
        assert_eq!(settings.feature_set, FeatureSet::CloseOnly);
        assert_eq!(settings.max_training_rows, 200);
    }

    #[test]
    fn test_training_rows_default_and_floor() {
        assert_eq!(Config::default().max_training_rows, MAX_TRAINING_ROWS);
        assert_eq!(
            config_with(&[("MAX_TRAINING_ROWS", "1")]).max_training_rows,
            MAX_TRAINING_ROWS
        );
    }
}
