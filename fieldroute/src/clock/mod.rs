//! Injectable time source.
//!
//! Quota reset at midnight and cache TTL expiry both depend on "now".
//! Abstracting the clock behind a trait lets tests control rollover and
//! expiry deterministically instead of depending on wall-clock time.

use chrono::{DateTime, Local, NaiveDate, Utc};
use parking_lot::Mutex;

/// Source of the current time and the current local calendar date.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in the device's local timezone.
    ///
    /// The daily quota is keyed by this date, so "a new day" means a new
    /// local date, not a UTC one.
    fn today(&self) -> NaiveDate;
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Deterministic clock for tests.
///
/// Holds a fixed instant that can be advanced or replaced explicitly,
/// making midnight rollover and TTL expiry reproducible.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at the given instant.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Replaces the current instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    /// Advances the current instant by a duration.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn today(&self) -> NaiveDate {
        // Tests treat the stored UTC instant as local time directly.
        self.now.lock().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_is_frozen() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        let clock = ManualClock::new(instant);

        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.today(), instant.date_naive());
    }

    #[test]
    fn test_manual_clock_advance_crosses_midnight() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 23, 30, 0).unwrap();
        let clock = ManualClock::new(instant);

        clock.advance(chrono::Duration::hours(1));

        assert_eq!(
            clock.today(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
    }
}
