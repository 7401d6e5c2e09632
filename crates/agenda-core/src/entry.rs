//! Entries handed to the rendering layer.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::event::SourceEvent;
use crate::time::Clock;

/// Where an event's end lies relative to now; selects the row background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndTimeSection {
    Past,
    Today,
    Future,
}

impl EndTimeSection {
    pub fn of(end: &DateTime<Tz>, clock: &Clock) -> Self {
        if *end <= clock.now() {
            Self::Past
        } else if *end <= clock.start_of_tomorrow() {
            Self::Today
        } else {
            Self::Future
        }
    }

    /// Picks the value matching this section.
    pub fn select<T>(self, past: T, today: T, future: T) -> T {
        match self {
            Self::Past => past,
            Self::Today => today,
            Self::Future => future,
        }
    }
}

/// One row for an event or task on one day.
///
/// Every day segment of a multi-day event shares the same underlying event,
/// so the renderer can always show the original times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEntry {
    /// The civil day this row is grouped under.
    pub entry_day: NaiveDate,
    /// Ordering position within the day.
    pub entry_start: DateTime<Tz>,
    /// Priority of the event's source in the user's list.
    pub source_order: u32,
    pub end_time_section: EndTimeSection,
    pub event: Arc<SourceEvent>,
}

impl EventEntry {
    pub fn new(
        event: Arc<SourceEvent>,
        entry_start: DateTime<Tz>,
        source_order: u32,
        clock: &Clock,
    ) -> Self {
        Self {
            entry_day: entry_start.date_naive(),
            entry_start,
            source_order,
            end_time_section: EndTimeSection::of(&event.end(), clock),
            event,
        }
    }
}

/// One element of the agenda sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEntry {
    /// Heads everything anchored before today.
    PastDueHeader,
    DayHeader(NaiveDate),
    Event(EventEntry),
    /// Placeholder for a day without events.
    FillerDay(NaiveDate),
    /// End of the list.
    Last,
}

impl WidgetEntry {
    /// The day this entry is anchored to. The past & due header sits before
    /// every real date and the terminal marker after.
    pub fn entry_day(&self) -> NaiveDate {
        match self {
            Self::PastDueHeader => NaiveDate::MIN,
            Self::DayHeader(day) | Self::FillerDay(day) => *day,
            Self::Event(entry) => entry.entry_day,
            Self::Last => NaiveDate::MAX,
        }
    }

    pub const fn as_event(&self) -> Option<&EventEntry> {
        match self {
            Self::Event(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PastDueHeader => "past_due_header",
            Self::DayHeader(_) => "day_header",
            Self::Event(entry) => match *entry.event {
                SourceEvent::Timed(_) => "event",
                SourceEvent::Task(_) => "task",
            },
            Self::FillerDay(_) => "filler_day",
            Self::Last => "last",
        }
    }
}
