//! Forecasting pipeline.
//!
//! Feature building, scaling, model fitting and multi-step prediction are
//! plain synchronous functions; [`pipeline::run_forecast`] ties them to a
//! market-data source.

pub mod assembler;
pub mod features;
pub mod indicators;
pub mod model;
pub mod pipeline;
pub mod predictor;
pub mod scaler;
pub mod suggestions;

pub use features::{build_features, FeatureSet, TrainingSet};
pub use model::{ForecastModel, ModelSettings, Regressor};
pub use pipeline::{forecast_from_bars, run_forecast, ForecastRequest, PipelineSettings};
pub use predictor::{MultiStepPredictor, PredictionStep};
pub use scaler::{MinMaxScaler, ScalerPair};
pub use suggestions::suggest;
