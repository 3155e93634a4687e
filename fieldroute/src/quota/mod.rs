//! Daily quota tracking for remote directions calls.
//!
//! The directions provider is paid and rate-limited, so traffic lookups
//! are capped per calendar day. The counter is keyed by local date:
//! reading "today's" usage on a new date simply yields zero, with no
//! scheduled reset job (lazy reset).

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::store::KeyValueStore;

/// Maximum remote directions calls per calendar day.
pub const DEFAULT_DAILY_MAX: u32 = 10;

const QUOTA_KEY: &str = "quota:directions";

/// Persisted per-day counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct StoredCounter {
    date: NaiveDate,
    count: u32,
}

/// Snapshot of today's quota consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaUsage {
    /// Calls consumed today.
    pub used: u32,
    /// Daily maximum.
    pub max: u32,
    /// Calls still available today.
    pub remaining: u32,
}

/// Tracks remote-call consumption against a fixed daily maximum.
///
/// Persisted alongside the route cache so usage survives restarts within
/// the same day. `max` is a configuration constant, not user-adjustable
/// at runtime.
pub struct DailyQuota {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    max: u32,
}

impl DailyQuota {
    /// Creates a tracker with the given daily maximum.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, max: u32) -> Self {
        Self { store, clock, max }
    }

    /// Reads today's usage without mutating anything.
    ///
    /// A stored counter from a previous date counts as zero usage.
    pub async fn usage(&self) -> QuotaUsage {
        let used = self.used_today().await;
        QuotaUsage {
            used,
            max: self.max,
            remaining: self.max.saturating_sub(used),
        }
    }

    /// Attempts to consume one quota unit for today.
    ///
    /// Returns `true` and increments the persisted counter when budget
    /// remains; returns `false` without mutating state when exhausted.
    /// The counter is re-keyed to today on the first consumption after a
    /// date rollover.
    pub async fn try_consume(&self) -> bool {
        let today = self.clock.today();
        let used = self.used_today().await;

        if used >= self.max {
            debug!(used, max = self.max, "daily directions quota exhausted");
            return false;
        }

        let next = StoredCounter {
            date: today,
            count: used + 1,
        };
        match serde_json::to_string(&next) {
            Ok(raw) => {
                if let Err(e) = self.store.set(QUOTA_KEY, raw).await {
                    // Consumption stands for this session even if the write
                    // did not reach disk.
                    warn!(error = %e, "quota counter write failed");
                }
            }
            Err(e) => warn!(error = %e, "quota counter serialization failed"),
        }

        debug!(used = next.count, max = self.max, "consumed directions quota unit");
        true
    }

    async fn used_today(&self) -> u32 {
        let today = self.clock.today();
        match self.store.get(QUOTA_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<StoredCounter>(&raw) {
                Ok(counter) if counter.date == today => counter.count,
                Ok(_) => 0,
                Err(e) => {
                    warn!(error = %e, "discarding unparseable quota counter");
                    0
                }
            },
            Ok(None) => 0,
            Err(e) => {
                warn!(error = %e, "quota counter read failed, assuming zero");
                0
            }
        }
    }
}
