//! Wall-clock time keeping

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use embassy_time::Instant;

/// Wall-clock time paired with the system instant it was observed at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeReference {
    /// Milliseconds since the Unix epoch, UTC
    epoch_ms: i64,
    /// Related system time
    instant: Instant,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            epoch_ms: 0,
            instant: Instant::from_ticks(0),
        }
    }
}

impl TimeReference {
    /// Create new time reference from epoch seconds observed at `instant`
    pub fn from_epoch_secs(secs: i64, instant: Instant) -> Self {
        Self {
            epoch_ms: secs.saturating_mul(1000),
            instant,
        }
    }
}

/// Derives the current wall-clock time from a reference and the system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Milliseconds since the Unix epoch at system instant `now`
    pub fn now_millis(&self, now: Instant) -> i64 {
        let elapsed = now
            .checked_duration_since(self.reference.instant)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0);
        self.reference.epoch_ms.saturating_add(elapsed)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
    }
}

fn unix_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Local date and time for a UTC timestamp and an offset in seconds.
///
/// Timestamps chrono cannot represent fall back to the epoch.
pub fn local_time(utc_ms: i64, utc_offset: i32) -> NaiveDateTime {
    let local_ms = utc_ms.saturating_add(utc_offset as i64 * 1000);
    TimeDelta::try_milliseconds(local_ms)
        .and_then(|delta| unix_epoch().checked_add_signed(delta))
        .unwrap_or_else(unix_epoch)
}
