//! Remote directions provider abstraction.
//!
//! This module provides the trait and implementation for fetching
//! road distance and duration-in-traffic between two coordinates from
//! an external directions API.
//!
//! The HTTP layer is abstracted behind [`AsyncHttpClient`] so tests can
//! inject mock clients, mirroring the split between provider logic and
//! transport.

mod http;
mod ors;
mod types;

pub use http::{AsyncHttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use ors::{OrsDirectionsProvider, DEFAULT_BASE_URL};
pub use types::{ProviderError, RouteSummary};

#[cfg(test)]
pub use http::tests::MockHttpClient;

use crate::geo::Coordinate;
use crate::store::BoxFuture;

/// Source of road distance and duration-in-current-traffic.
///
/// Implementations must be `Send + Sync`; the engine holds one behind
/// `Arc<dyn DirectionsProvider>`. Every call may cost real money, so the
/// resolver guards invocations with the daily quota.
pub trait DirectionsProvider: Send + Sync {
    /// Fetches directions from `origin` to `destination`.
    ///
    /// The returned summary carries distance in kilometers and duration
    /// in current traffic in minutes. Any failure (network, timeout,
    /// malformed payload, provider-side error) is a [`ProviderError`];
    /// callers are expected to fall back rather than surface it.
    fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> BoxFuture<'_, Result<RouteSummary, ProviderError>>;
}
