//! Flood-Risk API
//!
//! Client side of the flood-risk HTTP API.
//!
//! # Endpoints
//!
//! - `GET /api/raw` - Latest sensor reading
//! - `GET /api/prediction` - Latest 24h/48h risk prediction
//! - `GET /api/data/history?days=N` - Rain and temperature history
//! - `GET /api/health` - Liveness

mod client;
mod error;
mod types;

pub use client::{ClientConfig, DashboardApi, FloodApiClient};
pub use error::{Endpoint, FetchError};
pub use types::{HealthResponse, HistoryEntry, HistoryResponse, PredictionResult, SensorReading};
