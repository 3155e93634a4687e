//! Traffic distance resolution.
//!
//! `DistanceResolver` is the orchestration core of the engine: cache
//! lookup, quota check, remote call, geometric fallback, cache write.
//! Every code path terminates in a valid [`DistanceResult`]; schedule
//! and map views never block or error out on a transient network or
//! quota condition.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, RouteCache};
use crate::clock::Clock;
use crate::geo::{haversine_km, Coordinate, LegEfficiency};
use crate::provider::DirectionsProvider;
use crate::quota::DailyQuota;

/// Default time-to-live for cached traffic results.
pub const DEFAULT_CACHE_TTL_MINUTES: i64 = 60;

/// Where a distance value came from.
///
/// A tagged union instead of optional fields: a traffic value always
/// carries its duration, a geometric estimate never does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistanceSource {
    /// Live (or cached) data from the directions provider.
    Traffic {
        /// Duration in current traffic, in minutes.
        duration_min: f64,
    },
    /// Great-circle fallback; no traffic duration available.
    Geometric,
}

/// A resolved distance for one route leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    /// Distance in kilometers.
    pub distance_km: f64,
    /// Data source for the value.
    pub source: DistanceSource,
    /// When the value was computed (for "calculated at HH:MM" display).
    pub computed_at: DateTime<Utc>,
    /// Whether this result was served from the cache.
    pub from_cache: bool,
}

impl DistanceResult {
    /// Whether the value came from the traffic provider.
    pub fn is_traffic(&self) -> bool {
        matches!(self.source, DistanceSource::Traffic { .. })
    }

    /// Duration in traffic, present only for traffic-sourced results.
    pub fn duration_min(&self) -> Option<f64> {
        match self.source {
            DistanceSource::Traffic { duration_min } => Some(duration_min),
            DistanceSource::Geometric => None,
        }
    }

    /// Efficiency classification for UI color coding.
    pub fn efficiency(&self) -> LegEfficiency {
        LegEfficiency::classify(self.distance_km)
    }
}

/// Resolves point-to-point distances with caching, quota control and a
/// geometric safety net.
pub struct DistanceResolver {
    cache: RouteCache,
    quota: DailyQuota,
    provider: Arc<dyn DirectionsProvider>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
}

impl DistanceResolver {
    /// Creates a resolver with the default cache TTL.
    pub fn new(
        cache: RouteCache,
        quota: DailyQuota,
        provider: Arc<dyn DirectionsProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_ttl(
            cache,
            quota,
            provider,
            clock,
            chrono::Duration::minutes(DEFAULT_CACHE_TTL_MINUTES),
        )
    }

    /// Creates a resolver with an explicit cache TTL.
    pub fn with_ttl(
        cache: RouteCache,
        quota: DailyQuota,
        provider: Arc<dyn DirectionsProvider>,
        clock: Arc<dyn Clock>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            cache,
            quota,
            provider,
            clock,
            ttl,
        }
    }

    /// Resolves the distance from `origin` to `destination`.
    ///
    /// Never fails: quota exhaustion and provider failures both
    /// terminate in the geometric fallback. `force_refresh` skips the
    /// cache read (but a successful lookup still writes through).
    pub async fn resolve(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        force_refresh: bool,
    ) -> DistanceResult {
        let now = self.clock.now();

        if !force_refresh {
            if let Some(entry) = self.cache.get(origin, destination).await {
                if entry.is_fresh(now) {
                    debug!(%origin, %destination, "cache hit");
                    return DistanceResult {
                        from_cache: true,
                        ..entry.result
                    };
                }
                // Stale entries are ignored, not deleted; a fresh write
                // below supersedes them.
                debug!(%origin, %destination, "cache entry expired");
            }
        }

        if !self.quota.try_consume().await {
            info!(%origin, %destination, "quota exhausted, using geometric estimate");
            return self.geometric(origin, destination, now);
        }

        match self.provider.directions(origin, destination).await {
            Ok(summary) => {
                let result = DistanceResult {
                    distance_km: summary.distance_km,
                    source: DistanceSource::Traffic {
                        duration_min: summary.duration_min,
                    },
                    computed_at: now,
                    from_cache: false,
                };
                let entry = CacheEntry {
                    result,
                    expires_at: now + self.ttl,
                };
                self.cache.put(origin, destination, &entry).await;
                result
            }
            Err(e) => {
                // The quota unit stays consumed: the provider was invoked.
                warn!(%origin, %destination, error = %e, "provider call failed, using geometric estimate");
                self.geometric(origin, destination, now)
            }
        }
    }

    /// Today's quota consumption, for UI display.
    pub async fn quota_usage(&self) -> crate::quota::QuotaUsage {
        self.quota.usage().await
    }

    /// Builds a geometric fallback result. Never written to the cache:
    /// a later successful traffic lookup may still supersede it within
    /// the same hour.
    fn geometric(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        now: DateTime<Utc>,
    ) -> DistanceResult {
        DistanceResult {
            distance_km: haversine_km(origin, destination),
            source: DistanceSource::Geometric,
            computed_at: now,
            from_cache: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::provider::{ProviderError, RouteSummary};
    use crate::store::{BoxFuture, MemoryStore};
    use chrono::TimeZone;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Provider replaying a scripted sequence and recording call count.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<Result<RouteSummary, ProviderError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<RouteSummary, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            *self.calls.lock()
        }
    }

    impl DirectionsProvider for ScriptedProvider {
        fn directions(
            &self,
            _origin: Coordinate,
            _destination: Coordinate,
        ) -> BoxFuture<'_, Result<RouteSummary, ProviderError>> {
            *self.calls.lock() += 1;
            let response = self
                .responses
                .lock()
                .pop_front()
                .unwrap_or(Err(ProviderError::Request("script exhausted".to_string())));
            Box::pin(async move { response })
        }
    }

    struct Fixture {
        resolver: DistanceResolver,
        provider: Arc<ScriptedProvider>,
        clock: Arc<ManualClock>,
    }

    fn fixture(max_quota: u32, responses: Vec<Result<RouteSummary, ProviderError>>) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
        ));
        let provider = Arc::new(ScriptedProvider::new(responses));

        let resolver = DistanceResolver::new(
            RouteCache::new(store.clone()),
            DailyQuota::new(store, clock.clone(), max_quota),
            provider.clone(),
            clock.clone(),
        );

        Fixture {
            resolver,
            provider,
            clock,
        }
    }

    fn summary(distance_km: f64, duration_min: f64) -> RouteSummary {
        RouteSummary {
            distance_km,
            duration_min,
        }
    }

    const ORIGIN: Coordinate = Coordinate { lat: 48.1173, lon: -1.6778 };
    const DEST: Coordinate = Coordinate { lat: 47.2184, lon: -1.5536 };

    #[tokio::test]
    async fn test_traffic_result_carries_duration() {
        let f = fixture(10, vec![Ok(summary(12.4, 18.0))]);

        let result = f.resolver.resolve(ORIGIN, DEST, false).await;

        assert!(result.is_traffic());
        assert_eq!(result.duration_min(), Some(18.0));
        assert_eq!(result.distance_km, 12.4);
        assert!(!result.from_cache);
        assert_eq!(result.computed_at, f.clock.now());
    }

    #[tokio::test]
    async fn test_second_resolve_hits_cache() {
        let f = fixture(10, vec![Ok(summary(12.4, 18.0))]);

        let first = f.resolver.resolve(ORIGIN, DEST, false).await;
        let second = f.resolver.resolve(ORIGIN, DEST, false).await;

        assert_eq!(f.provider.call_count(), 1);
        assert!(second.from_cache);
        assert!(second.is_traffic());
        assert_eq!(second.distance_km, first.distance_km);
        // The cached result keeps its original computation time.
        assert_eq!(second.computed_at, first.computed_at);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_new_call() {
        let f = fixture(
            10,
            vec![Ok(summary(12.4, 18.0)), Ok(summary(13.1, 22.0))],
        );

        f.resolver.resolve(ORIGIN, DEST, false).await;
        f.clock.advance(chrono::Duration::minutes(61));
        let refreshed = f.resolver.resolve(ORIGIN, DEST, false).await;

        assert_eq!(f.provider.call_count(), 2);
        assert!(!refreshed.from_cache);
        assert_eq!(refreshed.distance_km, 13.1);
    }

    #[tokio::test]
    async fn test_force_refresh_skips_cache() {
        let f = fixture(
            10,
            vec![Ok(summary(12.4, 18.0)), Ok(summary(11.9, 15.0))],
        );

        f.resolver.resolve(ORIGIN, DEST, false).await;
        let refreshed = f.resolver.resolve(ORIGIN, DEST, true).await;

        assert_eq!(f.provider.call_count(), 2);
        assert!(!refreshed.from_cache);
        assert_eq!(refreshed.distance_km, 11.9);

        // The forced result was written through; a plain resolve hits it.
        let cached = f.resolver.resolve(ORIGIN, DEST, false).await;
        assert!(cached.from_cache);
        assert_eq!(cached.distance_km, 11.9);
    }

    #[tokio::test]
    async fn test_quota_exhausted_falls_back_geometric() {
        let f = fixture(0, vec![Ok(summary(12.4, 18.0))]);

        let result = f.resolver.resolve(ORIGIN, DEST, false).await;

        assert!(!result.is_traffic());
        assert_eq!(result.duration_min(), None);
        assert_eq!(result.distance_km, haversine_km(ORIGIN, DEST));
        assert_eq!(f.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_and_consumes_quota() {
        let f = fixture(
            10,
            vec![Err(ProviderError::Timeout), Ok(summary(12.4, 18.0))],
        );

        let fallback = f.resolver.resolve(ORIGIN, DEST, false).await;
        assert!(!fallback.is_traffic());

        // The failed attempt still counted against the daily budget.
        assert_eq!(f.resolver.quota_usage().await.used, 1);
    }

    #[tokio::test]
    async fn test_geometric_fallback_is_never_cached() {
        let f = fixture(
            10,
            vec![Err(ProviderError::Timeout), Ok(summary(12.4, 18.0))],
        );

        let fallback = f.resolver.resolve(ORIGIN, DEST, false).await;
        assert!(!fallback.is_traffic());

        // The next resolve must attempt the provider again, not hit a
        // cached fallback.
        let retry = f.resolver.resolve(ORIGIN, DEST, false).await;
        assert!(retry.is_traffic());
        assert!(!retry.from_cache);
        assert_eq!(f.provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_every_path_returns_valid_result() {
        // Exhausted quota, failing provider, empty cache: still a result.
        let f = fixture(1, vec![Err(ProviderError::Request("down".to_string()))]);

        let first = f.resolver.resolve(ORIGIN, DEST, false).await;
        let second = f.resolver.resolve(ORIGIN, DEST, false).await;

        assert!(first.distance_km > 0.0);
        assert!(second.distance_km > 0.0);
        assert!(!second.is_traffic());
    }

    #[test]
    fn test_source_serialization_shape() {
        let traffic = DistanceSource::Traffic { duration_min: 18.0 };
        let json = serde_json::to_string(&traffic).unwrap();
        assert!(json.contains("\"kind\":\"traffic\""));
        assert!(json.contains("duration_min"));

        let geometric = serde_json::to_string(&DistanceSource::Geometric).unwrap();
        assert!(geometric.contains("\"kind\":\"geometric\""));
    }
}
