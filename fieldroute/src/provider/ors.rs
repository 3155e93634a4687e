//! OpenRouteService-style driving directions provider.
//!
//! Calls the `v2/directions/driving-car` endpoint with an origin and a
//! destination and extracts the first route's summary. Coordinates go
//! over the wire as `[lon, lat]` pairs; distances come back in meters
//! and durations in seconds.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::{ProviderError, RouteSummary};
use super::DirectionsProvider;
use crate::geo::Coordinate;
use crate::store::BoxFuture;

/// Public OpenRouteService API host.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

#[derive(Deserialize)]
struct DirectionsResponse {
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct Route {
    summary: Summary,
}

#[derive(Deserialize, Clone, Copy)]
struct Summary {
    distance: f64,
    duration: f64,
}

// Error payload shape for non-success responses.
#[derive(Deserialize)]
struct ApiErrorPayload {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    code: u32,
    message: String,
}

/// Directions provider backed by an OpenRouteService-compatible API.
pub struct OrsDirectionsProvider<C: AsyncHttpClient> {
    http: C,
    api_key: String,
    base_url: String,
}

impl<C: AsyncHttpClient> OrsDirectionsProvider<C> {
    /// Creates a provider against the public API host.
    pub fn new(http: C, api_key: String) -> Self {
        Self::with_base_url(http, api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Creates a provider against a custom host (self-hosted instance or
    /// test server).
    pub fn with_base_url(http: C, api_key: String, base_url: String) -> Self {
        Self {
            http,
            api_key,
            base_url,
        }
    }

    fn directions_url(&self) -> String {
        format!("{}/v2/directions/driving-car", self.base_url)
    }
}

impl<C: AsyncHttpClient> DirectionsProvider for OrsDirectionsProvider<C> {
    fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> BoxFuture<'_, Result<RouteSummary, ProviderError>> {
        Box::pin(async move {
            let url = self.directions_url();
            let body = json!({
                "coordinates": [
                    [origin.lon, origin.lat],
                    [destination.lon, destination.lat],
                ]
            });

            debug!(%origin, %destination, "requesting remote directions");

            let raw = match self.http.post_json(&url, &self.api_key, body).await {
                Ok(raw) => raw,
                // Surface the structured API error when the body carries one.
                Err(ProviderError::Status { status, body }) => {
                    if let Ok(payload) = serde_json::from_str::<ApiErrorPayload>(&body) {
                        return Err(ProviderError::Api {
                            code: payload.error.code,
                            message: payload.error.message,
                        });
                    }
                    return Err(ProviderError::Status { status, body });
                }
                Err(e) => return Err(e),
            };

            let response: DirectionsResponse = serde_json::from_slice(&raw)
                .map_err(|e| ProviderError::Malformed(e.to_string()))?;

            let summary = response
                .routes
                .first()
                .ok_or(ProviderError::NoRoute)?
                .summary;

            Ok(RouteSummary {
                distance_km: summary.distance / 1000.0,
                duration_min: summary.duration / 60.0,
            })
        })
    }
}
