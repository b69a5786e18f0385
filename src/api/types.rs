//! Wire Types
//!
//! JSON bodies returned by the flood-risk API. Unknown fields are ignored,
//! so extra keys the server adds (`datetime`, `level_24`, ...) pass through.

use serde::{Deserialize, Serialize};

/// Latest sensor reading from `GET /api/raw`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SensorReading {
    pub soil_moisture: f64,
    pub rain: f64,
    pub temperature: f64,
    pub relative_humidity: f64,
    #[serde(default)]
    pub surface_pressure: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Latest flood-risk prediction from `GET /api/prediction`
///
/// Both horizons are risk indices; only 0, 1 and 2 are meaningful but any
/// integer is accepted here and mapped to "unknown" at render time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictionResult {
    pub prediction_24: i64,
    pub prediction_48: i64,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// One row of `GET /api/data/history`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub rain: f64,
    pub temperature: f64,
}

/// Envelope of the history endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<f64>,
}
