//! Sequential chain building for a technician's day.
//!
//! Resolves each travel leg of a day in strict chronological order:
//! base to first stop, then stop to stop. Legs are resolved
//! sequentially, never concurrently, so quota consumption stays
//! deterministic and the nearest-term appointments win the limited
//! daily budget when it is scarce.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geo::Coordinate;
use crate::resolver::{DistanceResolver, DistanceResult};
use crate::store::BoxFuture;

/// Read-only view of one scheduled appointment.
///
/// Owned by the external schedule store; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Identifier in the schedule store.
    pub id: String,
    /// Scheduled start time.
    pub start: DateTime<Utc>,
    /// Appointment coordinate, when the address has been geocoded.
    pub location: Option<Coordinate>,
}

/// One origin→destination segment within a day's chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLeg {
    /// Leg origin: the base for the first leg, else the prior stop.
    pub origin: Coordinate,
    /// Leg destination.
    pub destination: Coordinate,
    /// Whether the origin is the technician's base location.
    pub first_of_day: bool,
}

/// Read access to a technician's appointments for one day.
pub trait ScheduleSource: Send + Sync {
    /// Appointments scheduled on `date`, in any order.
    fn appointments_for(&self, date: NaiveDate) -> BoxFuture<'_, Result<Vec<Appointment>, SourceError>>;
}

/// Read access to the technician's configured home/office coordinate.
pub trait BaseLocationSource: Send + Sync {
    /// The base coordinate, or `None` when not configured.
    fn base_location(&self) -> BoxFuture<'_, Result<Option<Coordinate>, SourceError>>;
}

/// Failure reading an external collaborator (schedule store, profile).
#[derive(Debug, thiserror::Error)]
#[error("external source failure: {0}")]
pub struct SourceError(pub String);

/// Resolves a day's legs sequentially through the distance resolver.
pub struct ChainBuilder<'a> {
    resolver: &'a DistanceResolver,
}

impl<'a> ChainBuilder<'a> {
    /// Creates a chain builder over a resolver.
    pub fn new(resolver: &'a DistanceResolver) -> Self {
        Self { resolver }
    }

    /// Builds the day's travel legs in chronological order.
    ///
    /// Appointments without a coordinate are dropped; the first leg
    /// originates at the base, every later leg at the previous stop.
    pub fn day_legs(base: Coordinate, appointments: &[Appointment]) -> Vec<(String, RouteLeg)> {
        let mut located: Vec<&Appointment> = appointments
            .iter()
            .filter(|a| a.location.is_some())
            .collect();
        located.sort_by_key(|a| a.start);

        let mut legs = Vec::with_capacity(located.len());
        let mut previous = base;
        let mut first_of_day = true;

        for appointment in located {
            // Filtered above.
            let Some(destination) = appointment.location else {
                continue;
            };

            legs.push((
                appointment.id.clone(),
                RouteLeg {
                    origin: previous,
                    destination,
                    first_of_day,
                },
            ));
            previous = destination;
            first_of_day = false;
        }

        legs
    }

    /// Resolves each leg of the day into `results`, keyed by appointment id.
    ///
    /// Appointments without a coordinate are skipped (no entry produced).
    /// Ids already present in the caller-supplied map are skipped too,
    /// which makes preloading resumable: partial results from an earlier
    /// interrupted run are kept, not recomputed.
    ///
    /// The physical chain is unaffected by which data source answered a
    /// leg — every leg's origin is the prior appointment's coordinate,
    /// whether that leg resolved from live traffic or from the fallback.
    pub async fn resolve_day(
        &self,
        base: Coordinate,
        appointments: &[Appointment],
        results: &mut HashMap<String, DistanceResult>,
    ) {
        for (id, leg) in Self::day_legs(base, appointments) {
            if results.contains_key(&id) {
                debug!(%id, "leg already resolved, skipping");
                continue;
            }

            let result = self
                .resolver
                .resolve(leg.origin, leg.destination, false)
                .await;
            debug!(
                %id,
                distance_km = result.distance_km,
                traffic = result.is_traffic(),
                first_of_day = leg.first_of_day,
                "resolved leg"
            );
            results.insert(id, result);
        }
    }

    /// Convenience wrapper returning a fresh result map.
    pub async fn resolve_day_fresh(
        &self,
        base: Coordinate,
        appointments: &[Appointment],
    ) -> HashMap<String, DistanceResult> {
        let mut results = HashMap::new();
        self.resolve_day(base, appointments, &mut results).await;
        results
    }
}
