//! Engine bootstrap and facade.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::config::EngineConfig;
use super::error::EngineError;
use crate::cache::RouteCache;
use crate::chain::{Appointment, BaseLocationSource, ChainBuilder, ScheduleSource, SourceError};
use crate::clock::{Clock, SystemClock};
use crate::geo::Coordinate;
use crate::provider::{OrsDirectionsProvider, ReqwestClient};
use crate::quota::{DailyQuota, QuotaUsage};
use crate::resolver::{DistanceResolver, DistanceResult};
use crate::store::{JsonFileStore, KeyValueStore, MemoryStore};

/// Assembled route-distance engine.
///
/// Cache and quota state are process-wide for the session, scoped to one
/// technician's device; the engine is cheap to share behind an `Arc`.
pub struct RouteEngine {
    resolver: DistanceResolver,
}

impl RouteEngine {
    /// Starts the engine from configuration with the system clock.
    pub async fn start(config: EngineConfig) -> Result<Self, EngineError> {
        Self::start_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Starts the engine with an injected clock (tests, previews).
    pub async fn start_with_clock(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EngineError> {
        if config.api_key.is_empty() {
            return Err(EngineError::MissingApiKey);
        }

        let store: Arc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => {
                info!(path = %path.display(), "using persistent engine state");
                Arc::new(JsonFileStore::open(path).await)
            }
            None => {
                info!("no storage path configured, engine state is in-memory");
                Arc::new(MemoryStore::new())
            }
        };

        let http = ReqwestClient::with_timeout(config.provider_timeout_secs)?;
        let provider = Arc::new(OrsDirectionsProvider::with_base_url(
            http,
            config.api_key.clone(),
            config.base_url.clone(),
        ));

        let cache = RouteCache::with_precision(store.clone(), config.key_precision);
        let quota = DailyQuota::new(store, clock.clone(), config.daily_quota_max);
        let resolver = DistanceResolver::with_ttl(
            cache,
            quota,
            provider,
            clock,
            chrono::Duration::minutes(config.cache_ttl_minutes),
        );

        Ok(Self { resolver })
    }

    /// The underlying resolver, for single-leg operations.
    pub fn resolver(&self) -> &DistanceResolver {
        &self.resolver
    }

    /// Resolves one leg, optionally bypassing the cache (user-triggered
    /// manual refresh).
    pub async fn resolve_leg(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        force_refresh: bool,
    ) -> DistanceResult {
        self.resolver.resolve(origin, destination, force_refresh).await
    }

    /// Resolves a full day's chain for the given appointments.
    pub async fn resolve_day(
        &self,
        base: Coordinate,
        appointments: &[Appointment],
    ) -> HashMap<String, DistanceResult> {
        ChainBuilder::new(&self.resolver)
            .resolve_day_fresh(base, appointments)
            .await
    }

    /// Resolves a day read from the external schedule and profile stores.
    ///
    /// An absent base location disables chain resolution entirely: the
    /// result is an empty map, not an error.
    pub async fn resolve_day_from_sources(
        &self,
        schedule: &dyn ScheduleSource,
        base_source: &dyn BaseLocationSource,
        date: NaiveDate,
    ) -> Result<HashMap<String, DistanceResult>, SourceError> {
        let Some(base) = base_source.base_location().await? else {
            info!("no base location configured, skipping chain resolution");
            return Ok(HashMap::new());
        };

        let appointments = schedule.appointments_for(date).await?;
        Ok(self.resolve_day(base, &appointments).await)
    }

    /// Today's quota consumption.
    pub async fn quota_usage(&self) -> QuotaUsage {
        self.resolver.quota_usage().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BoxFuture;
    use chrono::{TimeZone, Utc};

    struct StaticSchedule(Vec<Appointment>);

    impl ScheduleSource for StaticSchedule {
        fn appointments_for(
            &self,
            _date: NaiveDate,
        ) -> BoxFuture<'_, Result<Vec<Appointment>, SourceError>> {
            let appointments = self.0.clone();
            Box::pin(async move { Ok(appointments) })
        }
    }

    struct StaticBase(Option<Coordinate>);

    impl BaseLocationSource for StaticBase {
        fn base_location(&self) -> BoxFuture<'_, Result<Option<Coordinate>, SourceError>> {
            let base = self.0;
            Box::pin(async move { Ok(base) })
        }
    }

    fn config() -> EngineConfig {
        EngineConfig::new("test-key").with_base_url("http://localhost:1")
    }

    #[tokio::test]
    async fn test_start_requires_api_key() {
        assert!(matches!(
            RouteEngine::start(EngineConfig::new("")).await,
            Err(EngineError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_missing_base_location_yields_empty_map() {
        let engine = RouteEngine::start(config()).await.unwrap();
        let schedule = StaticSchedule(vec![Appointment {
            id: "a".to_string(),
            start: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            location: Some(Coordinate::new(48.1, -1.6)),
        }]);

        let results = engine
            .resolve_day_from_sources(&schedule, &StaticBase(None), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_day_resolves_with_unreachable_provider() {
        // localhost:1 refuses connections; every leg falls back geometrically.
        let engine = RouteEngine::start(config()).await.unwrap();
        let schedule = StaticSchedule(vec![
            Appointment {
                id: "a".to_string(),
                start: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
                location: Some(Coordinate::new(48.1, -1.6)),
            },
            Appointment {
                id: "b".to_string(),
                start: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
                location: Some(Coordinate::new(48.2, -1.5)),
            },
        ]);

        let results = engine
            .resolve_day_from_sources(
                &schedule,
                &StaticBase(Some(Coordinate::new(48.0, -1.7))),
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.values().all(|r| !r.is_traffic()));
    }
}
