//! Calendars and task lists that rows come from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of provider a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Timed calendar events.
    Calendar,
    /// Tasks with optional start and due dates.
    Tasks,
}

impl ProviderKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Tasks => "tasks",
        }
    }

    pub const fn is_calendar(self) -> bool {
        matches!(self, Self::Calendar)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup key for a source: provider kind plus the provider's numeric
/// calendar or list id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceRef {
    pub kind: ProviderKind,
    pub id: i64,
}

impl SourceRef {
    pub const fn new(kind: ProviderKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A source the user activated for a widget, with its display priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedEventSource {
    pub kind: ProviderKind,
    pub id: i64,
    /// Position in the user's source list; lower sorts first on ties.
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub title: String,
    /// ARGB color applied to rows that carry none of their own.
    #[serde(default)]
    pub color: u32,
}

impl OrderedEventSource {
    pub fn new(kind: ProviderKind, id: i64, order: u32) -> Self {
        Self {
            kind,
            id,
            order,
            title: String::new(),
            color: 0,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub const fn source_ref(&self) -> SourceRef {
        SourceRef::new(self.kind, self.id)
    }
}
