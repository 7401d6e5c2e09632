//! Normalized calendar events and tasks.
//!
//! Rows become events here: timestamps are converted into the widget's zone,
//! missing strings become empty, and every event ends strictly after it
//! starts (+1 day for all-day values, +1 second otherwise).

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;

use crate::error::EntryError;
use crate::row::EventRow;
use crate::source::{OrderedEventSource, ProviderKind, SourceRef};
use crate::time::{day_start, to_zoned};

/// A calendar event with a known start and end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent {
    pub id: i64,
    pub source: SourceRef,
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub all_day: bool,
    pub color: u32,
    pub uses_default_color: bool,
    pub location: String,
    pub alarm_active: bool,
    pub recurring: bool,
}

impl TimedEvent {
    pub fn from_row(
        row: &EventRow,
        source: &OrderedEventSource,
        zone: Tz,
    ) -> Result<Self, EntryError> {
        let id = row.id.ok_or(EntryError::MalformedRow { field: "id" })?;
        let start_millis = row
            .start_millis
            .ok_or(EntryError::MalformedRow { field: "start" })?;
        let start = to_zoned(start_millis, zone, row.all_day)?;
        let end = row
            .end_millis
            .map(|millis| to_zoned(millis, zone, row.all_day))
            .transpose()?;
        let (color, uses_default_color) = row_color(row, source);

        Ok(Self {
            id,
            source: source.source_ref(),
            title: row.title.clone().unwrap_or_default(),
            start,
            end: widened_end(start, end, row.all_day),
            all_day: row.all_day,
            color,
            uses_default_color,
            location: row.location.clone().unwrap_or_default(),
            alarm_active: row.has_alarm,
            recurring: row.recurring,
        })
    }

    /// Started before `now` and not yet ended.
    pub fn is_active(&self, now: &DateTime<Tz>) -> bool {
        self.start < *now && self.end > *now
    }

    /// The last calendar day the event occupies. An end exactly at a day
    /// boundary does not reach into that day.
    pub fn last_day(&self) -> NaiveDate {
        let end_day = self.end.date_naive();
        if day_start(end_day, self.end.timezone()) == self.end && end_day > self.start.date_naive() {
            end_day - Duration::days(1)
        } else {
            end_day
        }
    }

    /// Occupies more than one calendar day.
    pub fn is_multi_day(&self) -> bool {
        self.last_day() > self.start.date_naive()
    }
}

/// Which of its two dates a task carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSchedule {
    Start(DateTime<Tz>),
    Due(DateTime<Tz>),
    StartAndDue {
        start: DateTime<Tz>,
        due: DateTime<Tz>,
    },
}

impl TaskSchedule {
    fn from_dates(
        start: Option<DateTime<Tz>>,
        due: Option<DateTime<Tz>>,
    ) -> Result<Self, EntryError> {
        match (start, due) {
            (Some(start), Some(due)) => Ok(Self::StartAndDue { start, due }),
            (Some(start), None) => Ok(Self::Start(start)),
            (None, Some(due)) => Ok(Self::Due(due)),
            (None, None) => Err(EntryError::MalformedRow {
                field: "start or due",
            }),
        }
    }
}

/// A task from a task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub source: SourceRef,
    pub title: String,
    pub schedule: TaskSchedule,
    pub all_day: bool,
    pub color: u32,
    pub uses_default_color: bool,
    pub location: String,
    pub alarm_active: bool,
    pub recurring: bool,
}

impl TaskItem {
    pub fn from_row(
        row: &EventRow,
        source: &OrderedEventSource,
        zone: Tz,
    ) -> Result<Self, EntryError> {
        let id = row.id.ok_or(EntryError::MalformedRow { field: "id" })?;
        let start = row
            .start_millis
            .map(|millis| to_zoned(millis, zone, row.all_day))
            .transpose()?;
        let due = row
            .end_millis
            .map(|millis| to_zoned(millis, zone, row.all_day))
            .transpose()?;
        let (color, uses_default_color) = row_color(row, source);

        Ok(Self {
            id,
            source: source.source_ref(),
            title: row.title.clone().unwrap_or_default(),
            schedule: TaskSchedule::from_dates(start, due)?,
            all_day: row.all_day,
            color,
            uses_default_color,
            location: row.location.clone().unwrap_or_default(),
            alarm_active: row.has_alarm,
            recurring: row.recurring,
        })
    }

    /// The start date, or the due date for due-only tasks.
    pub const fn start(&self) -> DateTime<Tz> {
        match self.schedule {
            TaskSchedule::Start(start) | TaskSchedule::StartAndDue { start, .. } => start,
            TaskSchedule::Due(due) => due,
        }
    }

    pub const fn due(&self) -> Option<DateTime<Tz>> {
        match self.schedule {
            TaskSchedule::Due(due) | TaskSchedule::StartAndDue { due, .. } => Some(due),
            TaskSchedule::Start(_) => None,
        }
    }

    /// The due date widened past the start, or the start itself widened for
    /// start-only tasks.
    pub fn end(&self) -> DateTime<Tz> {
        widened_end(self.start(), self.due(), self.all_day)
    }

    /// The moment the task is listed at.
    ///
    /// A start still ahead of `now` wins; otherwise the due date; otherwise
    /// the (past) start, which lists the task as overdue.
    pub fn anchor(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        match self.schedule {
            TaskSchedule::Start(start) => start,
            TaskSchedule::Due(due) => due,
            TaskSchedule::StartAndDue { start, due } => {
                if start > *now {
                    start
                } else {
                    due
                }
            }
        }
    }
}

/// One normalized record from any source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    Timed(TimedEvent),
    Task(TaskItem),
}

impl SourceEvent {
    /// Normalizes a row according to the kind of source it came from.
    pub fn from_row(
        row: &EventRow,
        source: &OrderedEventSource,
        zone: Tz,
    ) -> Result<Self, EntryError> {
        match source.kind {
            ProviderKind::Calendar => TimedEvent::from_row(row, source, zone).map(Self::Timed),
            ProviderKind::Tasks => TaskItem::from_row(row, source, zone).map(Self::Task),
        }
    }

    pub const fn id(&self) -> i64 {
        match self {
            Self::Timed(event) => event.id,
            Self::Task(task) => task.id,
        }
    }

    pub const fn source(&self) -> SourceRef {
        match self {
            Self::Timed(event) => event.source,
            Self::Task(task) => task.source,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Timed(event) => &event.title,
            Self::Task(task) => &task.title,
        }
    }

    pub const fn start(&self) -> DateTime<Tz> {
        match self {
            Self::Timed(event) => event.start,
            Self::Task(task) => task.start(),
        }
    }

    pub fn end(&self) -> DateTime<Tz> {
        match self {
            Self::Timed(event) => event.end,
            Self::Task(task) => task.end(),
        }
    }

    pub const fn all_day(&self) -> bool {
        match self {
            Self::Timed(event) => event.all_day,
            Self::Task(task) => task.all_day,
        }
    }

    pub const fn color(&self) -> u32 {
        match self {
            Self::Timed(event) => event.color,
            Self::Task(task) => task.color,
        }
    }

    pub const fn uses_default_color(&self) -> bool {
        match self {
            Self::Timed(event) => event.uses_default_color,
            Self::Task(task) => task.uses_default_color,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Self::Timed(event) => &event.location,
            Self::Task(task) => &task.location,
        }
    }

    pub const fn alarm_active(&self) -> bool {
        match self {
            Self::Timed(event) => event.alarm_active,
            Self::Task(task) => task.alarm_active,
        }
    }

    pub const fn recurring(&self) -> bool {
        match self {
            Self::Timed(event) => event.recurring,
            Self::Task(task) => task.recurring,
        }
    }

    /// Same logical occurrence: equal id and equal start.
    ///
    /// Instances of a recurring series share an id and differ by start.
    pub fn same_occurrence(&self, other: &Self) -> bool {
        self.id() == other.id() && self.start() == other.start()
    }
}

fn row_color(row: &EventRow, source: &OrderedEventSource) -> (u32, bool) {
    row.color.map_or((source.color, true), |color| (color, false))
}

fn widened_end(start: DateTime<Tz>, end: Option<DateTime<Tz>>, all_day: bool) -> DateTime<Tz> {
    match end {
        Some(end) if end > start => end,
        _ if all_day => day_start(start.date_naive() + Duration::days(1), start.timezone()),
        _ => start + Duration::seconds(1),
    }
}
