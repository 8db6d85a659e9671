use serde::{Deserialize, Serialize};

/// Parallel date/price arrays as charted by the frontend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesPayload {
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
}

/// Headline numbers for a forecast, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub current_price: f64,
    pub final_prediction: f64,
    pub final_date: String,
}

/// Forecast endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub historical: SeriesPayload,
    pub predictions: SeriesPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ForecastSummary>,
}

/// A symbol the model expects to rise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub symbol: String,
    pub current_price: f64,
    pub predicted_price: f64,
    /// Percent change from current to final predicted price.
    pub predicted_growth: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

/// Tradable symbols, flagged when served from the static fallback list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolListing {
    pub symbols: Vec<String>,
    pub fallback: bool,
}
