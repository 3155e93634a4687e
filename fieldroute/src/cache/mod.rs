//! Time-bounded route-distance cache.
//!
//! Domain layer over the generic [`KeyValueStore`]: entries are keyed by
//! the rounded origin/destination coordinate pair and carry an explicit
//! expiration timestamp. Rounding to a fixed precision (~11 m at four
//! decimals) keeps repeated geocoding of the same address from
//! fragmenting the cache.
//!
//! Expiration is checked by the caller: `get` returns stale entries too,
//! and stale entries are never deleted. A fresh traffic lookup simply
//! overwrites them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geo::Coordinate;
use crate::resolver::DistanceResult;
use crate::store::KeyValueStore;

/// Coordinate decimals used when deriving cache keys (~11 m resolution).
pub const DEFAULT_KEY_PRECISION: usize = 4;

/// A cached distance result with its expiration time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The resolved distance as computed at write time.
    pub result: DistanceResult,
    /// Instant after which the entry no longer counts as a hit.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry is still valid at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Persisted route-leg cache.
///
/// Each key is independently owned by one logical route leg, so no
/// transactional guarantees are needed. Unbounded growth is acceptable
/// at the scale of one technician's daily legs.
pub struct RouteCache {
    store: Arc<dyn KeyValueStore>,
    precision: usize,
}

impl RouteCache {
    /// Creates a cache over the given storage with the default key precision.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_precision(store, DEFAULT_KEY_PRECISION)
    }

    /// Creates a cache with an explicit coordinate rounding precision.
    pub fn with_precision(store: Arc<dyn KeyValueStore>, precision: usize) -> Self {
        Self { store, precision }
    }

    /// Derives the deterministic storage key for a leg.
    ///
    /// Both endpoints are rounded before formatting so minor coordinate
    /// jitter maps to the same key.
    pub fn leg_key(&self, origin: Coordinate, destination: Coordinate) -> String {
        let p = self.precision;
        format!(
            "route:{:.p$},{:.p$}->{:.p$},{:.p$}",
            origin.lat, origin.lon, destination.lat, destination.lon,
        )
    }

    /// Looks up the entry for a leg, fresh or stale.
    ///
    /// Returns `None` when the leg was never computed, or when storage is
    /// unreadable or holds an unparseable payload; the caller observes a
    /// miss, never an error.
    pub async fn get(&self, origin: Coordinate, destination: Coordinate) -> Option<CacheEntry> {
        let key = self.leg_key(origin, destination);
        match self.store.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(%key, error = %e, "discarding unparseable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(%key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Upserts the entry for a leg.
    ///
    /// Write failures are logged and swallowed; the cache is best-effort.
    pub async fn put(&self, origin: Coordinate, destination: Coordinate, entry: &CacheEntry) {
        let key = self.leg_key(origin, destination);
        let raw = match serde_json::to_string(entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%key, error = %e, "failed to serialize cache entry");
                return;
            }
        };

        if let Err(e) = self.store.set(&key, raw).await {
            warn!(%key, error = %e, "cache write failed");
        } else {
            debug!(%key, expires_at = %entry.expires_at, "cached route leg");
        }
    }
}
