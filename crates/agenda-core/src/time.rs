//! Zone-aware conversion between stored instants and wall-clock time.
//!
//! Timed values are plain instants and convert without special handling.
//! All-day values are stored as UTC midnight of the intended calendar date;
//! they are reinterpreted as a date and placed at local midnight of that date,
//! stepping forward an hour at a time when midnight falls into a DST gap.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::EntryError;

/// Maximum number of one-hour steps taken to leave a DST gap.
///
/// Real-world forward shifts are at most two hours.
pub const MAX_GAP_STEPS: u32 = 4;

/// A fixed "now" observed in a fixed zone.
///
/// Every pipeline stage receives its notion of time from here; nothing reads
/// the system clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: DateTime<Tz>,
}

impl Clock {
    /// Creates a clock for `now` observed in `zone`.
    pub fn new(zone: Tz, now: DateTime<Utc>) -> Self {
        Self {
            now: now.with_timezone(&zone),
        }
    }

    /// The same instant observed in another zone.
    #[must_use]
    pub fn in_zone(&self, zone: Tz) -> Self {
        Self {
            now: self.now.with_timezone(&zone),
        }
    }

    pub fn zone(&self) -> Tz {
        self.now.timezone()
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.now
    }

    /// Today's civil date in the clock's zone.
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// The first valid instant of today.
    pub fn start_of_today(&self) -> DateTime<Tz> {
        day_start(self.today(), self.zone())
    }

    /// The first valid instant of tomorrow.
    pub fn start_of_tomorrow(&self) -> DateTime<Tz> {
        day_start(self.today() + Duration::days(1), self.zone())
    }
}

/// Converts stored epoch milliseconds into a zoned moment.
///
/// For all-day values the result is the first valid local time at or after
/// midnight of the stored UTC date.
pub fn to_zoned(millis: i64, zone: Tz, all_day: bool) -> Result<DateTime<Tz>, EntryError> {
    let utc = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or(EntryError::InstantOutOfRange { millis })?;
    if all_day {
        let midnight = utc.date_naive().and_time(NaiveTime::MIN);
        local_at_or_after(midnight, zone, MAX_GAP_STEPS)
    } else {
        Ok(utc.with_timezone(&zone))
    }
}

/// Converts a zoned moment back into its stored epoch milliseconds.
///
/// All-day values go back to UTC midnight of their civil date; any hour added
/// while leaving a DST gap is discarded.
pub fn to_epoch_millis(moment: &DateTime<Tz>, all_day: bool) -> i64 {
    if all_day {
        moment
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis()
    } else {
        moment.timestamp_millis()
    }
}

/// Resolves a wall-clock time in `zone`, advancing by whole hours while it
/// falls into a gap.
///
/// Ambiguous times (DST overlap) resolve to the earlier instant.
pub fn local_at_or_after(
    local: NaiveDateTime,
    zone: Tz,
    max_steps: u32,
) -> Result<DateTime<Tz>, EntryError> {
    let mut candidate = local;
    for step in 0..=max_steps {
        match zone.from_local_datetime(&candidate) {
            LocalResult::Single(resolved) | LocalResult::Ambiguous(resolved, _) => {
                if step > 0 {
                    tracing::trace!(
                        %local,
                        zone = zone.name(),
                        %resolved,
                        "moved local time out of a DST gap"
                    );
                }
                return Ok(resolved);
            }
            LocalResult::None => candidate += Duration::hours(1),
        }
    }
    Err(EntryError::TimeZoneGapUnresolvable {
        date: local.date(),
        zone: zone.name().to_string(),
        attempts: max_steps,
    })
}

/// The first valid instant of `date` in `zone`.
pub fn day_start(date: NaiveDate, zone: Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    local_at_or_after(midnight, zone, 23).unwrap_or_else(|_| zone.from_utc_datetime(&midnight))
}
