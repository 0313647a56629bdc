//! Chart generation models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A single data point on a price chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Top-level JSON payload accepted by the chart generator
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub item_name: String,
    pub price_history: Vec<PriceEntry>,
    #[serde(default)]
    pub predictions: Option<Predictions>,
    /// Free-form summary fields, echoed verbatim
    #[serde(default)]
    pub stats: Option<Map<String, Value>>,
}

/// Raw history entry; `timestamp` is epoch milliseconds
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PriceEntry {
    pub timestamp: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Predictions {
    #[serde(rename = "predicted1Month")]
    pub one_month: Option<PriceRange>,
    #[serde(rename = "predicted6Months")]
    pub six_months: Option<PriceRange>,
    #[serde(rename = "predicted1Year")]
    pub one_year: Option<PriceRange>,
    /// `Some(Value::Null)` for an explicit null, `None` when the key is absent
    #[serde(default, deserialize_with = "present_value")]
    pub confidence: Option<Value>,
}

fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// All three forecast horizons, once known to be present
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizons {
    pub one_month: PriceRange,
    pub six_months: PriceRange,
    pub one_year: PriceRange,
}

/// Dashed forecast line plus the shaded band around its last leg
#[derive(Debug, Clone, PartialEq)]
pub struct TrendOverlay {
    /// Last historical point followed by the 1 month, 6 month and 1 year midpoints
    pub points: [PricePoint; 4],
    /// (last date, last price), (1 year date, 1 year max), (1 year date, 1 year min)
    pub band: [PricePoint; 3],
}

/// Everything the chart draws, decided before any pixel is touched
#[derive(Debug, Clone)]
pub struct ChartPlan {
    pub title: String,
    pub history: Vec<PricePoint>,
    pub trend: Option<TrendOverlay>,
    pub stats_box: Option<Vec<String>>,
    pub predictions_box: Option<Vec<String>>,
}
