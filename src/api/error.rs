//! Fetch Error Types
//!
//! Everything that can go wrong between issuing a GET and holding a parsed
//! body. The dashboard collapses all variants into one banner message per
//! endpoint; the variant itself only reaches the logs.

use thiserror::Error;

/// Errors from a single API request
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout, broken body stream
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP error! Status: {status}")]
    Status { status: u16 },

    /// Body was not the JSON shape we expected
    #[error("Invalid response body: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which API endpoint a fetch targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Sensor,
    Prediction,
    History,
}

impl Endpoint {
    /// Path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Sensor => "/api/raw",
            Endpoint::Prediction => "/api/prediction",
            Endpoint::History => "/api/data/history",
        }
    }

    /// Banner text shown when a fetch of this endpoint fails
    ///
    /// History failures are logged only, so they have no banner text.
    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            Endpoint::Sensor => Some("Failed to fetch sensor data. Please try again later."),
            Endpoint::Prediction => {
                Some("Failed to fetch prediction data. Please try again later.")
            }
            Endpoint::History => None,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Endpoint::Sensor => "sensor",
            Endpoint::Prediction => "prediction",
            Endpoint::History => "history",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Status { status: 503 };
        assert_eq!(err.to_string(), "HTTP error! Status: 503");
    }

    #[test]
    fn test_parse_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: FetchError = json_err.into();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_failure_messages_are_per_endpoint() {
        assert_eq!(
            Endpoint::Sensor.failure_message(),
            Some("Failed to fetch sensor data. Please try again later.")
        );
        assert_eq!(
            Endpoint::Prediction.failure_message(),
            Some("Failed to fetch prediction data. Please try again later.")
        );
        assert!(Endpoint::History.failure_message().is_none());
        assert_eq!(Endpoint::History.path(), "/api/data/history");
    }
}
