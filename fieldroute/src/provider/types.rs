//! Provider result and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Distance and traffic duration for one leg, as returned by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Road distance in kilometers.
    pub distance_km: f64,
    /// Duration in current traffic, in minutes.
    pub duration_min: f64,
}

/// Errors that can occur when calling the directions provider.
///
/// `Clone` so mock clients can replay scripted responses in tests.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Structured error payload from the directions API.
    #[error("directions API error (code {code}): {message}")]
    Api { code: u32, message: String },

    /// The response body could not be parsed.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The provider found no route between the requested points.
    #[error("no route between the requested points")]
    NoRoute,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::Api {
            code: 2010,
            message: "Could not find routable point".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("2010"));
        assert!(text.contains("routable point"));
    }

    #[test]
    fn test_timeout_display() {
        assert_eq!(ProviderError::Timeout.to_string(), "request timed out");
    }
}
