//! HTTP client abstraction for testability.

use serde_json::Value;

use super::types::ProviderError;
use crate::store::BoxFuture;

/// Default request timeout for the remote provider.
///
/// The provider call must be bounded: on timeout the resolver treats it
/// like any other provider failure and falls back geometrically.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Trait for HTTP POST operations against the directions API.
///
/// This abstraction allows dependency injection of mock clients in tests
/// so provider logic can be exercised without a network.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP POST with a JSON body and an `Authorization` header.
    ///
    /// Returns the response body bytes on a 2xx status; any other outcome
    /// is a [`ProviderError`].
    fn post_json(
        &self,
        url: &str,
        auth: &str,
        body: Value,
    ) -> BoxFuture<'_, Result<Vec<u8>, ProviderError>>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout in seconds.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    fn post_json(
        &self,
        url: &str,
        auth: &str,
        body: Value,
    ) -> BoxFuture<'_, Result<Vec<u8>, ProviderError>> {
        let url = url.to_string();
        let auth = auth.to_string();

        Box::pin(async move {
            let response = self
                .client
                .post(&url)
                .header("Authorization", auth)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        ProviderError::Timeout
                    } else {
                        ProviderError::Request(e.to_string())
                    }
                })?;

            let status = response.status();
            let bytes = response.bytes().await.map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Request(e.to_string())
                }
            })?;

            if !status.is_success() {
                return Err(ProviderError::Status {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }

            Ok(bytes.to_vec())
        })
    }
}
