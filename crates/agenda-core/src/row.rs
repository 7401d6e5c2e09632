//! Provider-neutral raw rows, as fetched by whatever query layer sits above
//! the engine (content provider, recorded fixture or test data).

use serde::{Deserialize, Serialize};

use crate::source::SourceRef;

/// One raw row. Every column is optional here; which ones are required
/// depends on the source kind and is checked during normalization.
///
/// For task sources `start_millis` is the task start and `end_millis` the due
/// date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRow {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub start_millis: Option<i64>,
    pub end_millis: Option<i64>,
    pub all_day: bool,
    /// ARGB color; absent when the row uses its source's color.
    pub color: Option<u32>,
    pub location: Option<String>,
    pub has_alarm: bool,
    pub recurring: bool,
}

impl EventRow {
    pub fn new(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    #[must_use]
    pub fn start(mut self, millis: i64) -> Self {
        self.start_millis = Some(millis);
        self
    }

    #[must_use]
    pub fn end(mut self, millis: i64) -> Self {
        self.end_millis = Some(millis);
        self
    }

    #[must_use]
    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    #[must_use]
    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    #[must_use]
    pub fn alarm(mut self) -> Self {
        self.has_alarm = true;
        self
    }

    #[must_use]
    pub fn recurring(mut self) -> Self {
        self.recurring = true;
        self
    }
}

/// All rows fetched from one source in one refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowBatch {
    pub source: SourceRef,
    #[serde(default)]
    pub rows: Vec<EventRow>,
}

impl RowBatch {
    pub const fn new(source: SourceRef, rows: Vec<EventRow>) -> Self {
        Self { source, rows }
    }
}
