//! Flood-Risk API Client
//!
//! HTTP client for the sensor, prediction and history endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{Endpoint, FetchError};
use super::types::{HealthResponse, HistoryEntry, HistoryResponse, PredictionResult, SensorReading};

/// Source of dashboard data
///
/// The poller only talks to this trait, so tests can swap in a scripted
/// implementation without a network.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Latest sensor reading
    async fn fetch_sensor_reading(&self) -> Result<SensorReading, FetchError>;

    /// Latest 24h/48h risk prediction
    async fn fetch_prediction(&self) -> Result<PredictionResult, FetchError>;

    /// Rain and temperature history for the last `days` days
    async fn fetch_history(&self, days: u32) -> Result<Vec<HistoryEntry>, FetchError>;
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the API (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Request timeout; `None` leaves it to the transport default
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout: None,
        }
    }
}

/// reqwest-backed client for the flood-risk API
pub struct FloodApiClient {
    client: Client,
    base_url: String,
}

impl FloodApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Check if the API is up
    pub async fn health_check(&self) -> Result<HealthResponse, FetchError> {
        let url = format!("{}/api/health", self.base_url);
        self.get_json(&url).await
    }

    /// GET a URL and decode its JSON body
    ///
    /// Any non-2xx status is a failure regardless of the body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!(url = %url, "GET");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DashboardApi for FloodApiClient {
    async fn fetch_sensor_reading(&self) -> Result<SensorReading, FetchError> {
        self.get_json(&self.endpoint_url(Endpoint::Sensor)).await
    }

    async fn fetch_prediction(&self) -> Result<PredictionResult, FetchError> {
        self.get_json(&self.endpoint_url(Endpoint::Prediction)).await
    }

    async fn fetch_history(&self, days: u32) -> Result<Vec<HistoryEntry>, FetchError> {
        let url = format!("{}?days={}", self.endpoint_url(Endpoint::History), days);
        let response: HistoryResponse = self.get_json(&url).await?;
        Ok(response.history)
    }
}
