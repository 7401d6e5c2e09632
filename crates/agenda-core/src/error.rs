//! Per-row and per-event failures.
//!
//! None of these abort a refresh. The engine records them next to the row
//! that caused them and keeps going with the remaining rows.

use chrono::NaiveDate;
use thiserror::Error;

/// Why a single row or event was left out of the agenda.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// A column the source kind requires was missing.
    #[error("row is missing required field {field}")]
    MalformedRow { field: &'static str },

    /// The epoch milliseconds cannot be represented as a date.
    #[error("instant {millis} ms is outside the representable range")]
    InstantOutOfRange { millis: i64 },

    /// No wall-clock time near local midnight exists for the date.
    #[error("no valid local time for {date} in {zone} after {attempts} hour steps")]
    TimeZoneGapUnresolvable {
        date: NaiveDate,
        zone: String,
        attempts: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = EntryError::MalformedRow { field: "id" };
        assert_eq!(err.to_string(), "row is missing required field id");

        let err = EntryError::TimeZoneGapUnresolvable {
            date: NaiveDate::from_ymd_opt(2015, 3, 29).unwrap(),
            zone: "CET".to_string(),
            attempts: 4,
        };
        assert_eq!(
            err.to_string(),
            "no valid local time for 2015-03-29 in CET after 4 hour steps"
        );
    }
}
