//! Read-only settings snapshot for one widget.

use std::fmt;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::source::{OrderedEventSource, SourceRef};

/// Default number of days shown after today.
pub const DEFAULT_EVENT_RANGE_DAYS: u32 = 30;
/// Longest range a window covers; larger settings are clamped to it.
pub const MAX_EVENT_RANGE_DAYS: u32 = 3650;

/// How long after they ended calendar events stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventsEnded {
    /// Ended events are hidden.
    #[default]
    None,
    /// Events that ended earlier today stay.
    Today,
    Yesterday,
    OneWeek,
    TwoWeeks,
    FourWeeks,
    OneYear,
}

impl EventsEnded {
    /// Days before today that the visible window reaches back.
    pub const fn lookback_days(self) -> i64 {
        match self {
            Self::None | Self::Today => 0,
            Self::Yesterday => 1,
            Self::OneWeek => 7,
            Self::TwoWeeks => 14,
            Self::FourWeeks => 28,
            Self::OneYear => 365,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::OneWeek => "one_week",
            Self::TwoWeeks => "two_weeks",
            Self::FourWeeks => "four_weeks",
            Self::OneYear => "one_year",
        }
    }
}

impl fmt::Display for EventsEnded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventsEnded {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "one_week" => Ok(Self::OneWeek),
            "two_weeks" => Ok(Self::TwoWeeks),
            "four_weeks" => Ok(Self::FourWeeks),
            "one_year" => Ok(Self::OneYear),
            _ => Err(format!("invalid events-ended policy: {s}")),
        }
    }
}

/// Display preferences that shape the entry sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgendaSettings {
    /// Days after today included in the agenda; 0 shows today only.
    pub event_range_days: u32,
    pub events_ended: EventsEnded,
    /// Repeat multi-day events on every day they cover.
    pub fill_all_day_events: bool,
    pub show_days_without_events: bool,
    pub show_past_events_under_one_header: bool,
    pub show_past_events_with_default_color: bool,
    pub show_only_closest_instance_of_recurring_event: bool,
    pub hide_duplicates: bool,
    /// Comma- or newline-separated, case-insensitive title substrings.
    pub hide_based_on_keywords: String,
    /// Sources in the user's order. Empty means every fetched source.
    pub active_sources: Vec<OrderedEventSource>,
    /// Overrides the caller's zone when set.
    pub locked_time_zone: Option<Tz>,
}

impl Default for AgendaSettings {
    fn default() -> Self {
        Self {
            event_range_days: DEFAULT_EVENT_RANGE_DAYS,
            events_ended: EventsEnded::None,
            fill_all_day_events: true,
            show_days_without_events: false,
            show_past_events_under_one_header: false,
            show_past_events_with_default_color: false,
            show_only_closest_instance_of_recurring_event: false,
            hide_duplicates: false,
            hide_based_on_keywords: String::new(),
            active_sources: Vec::new(),
            locked_time_zone: None,
        }
    }
}

impl AgendaSettings {
    /// Lowercased, trimmed, non-empty keywords.
    pub fn keywords(&self) -> Vec<String> {
        self.hide_based_on_keywords
            .split([',', '\n'])
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect()
    }

    /// The active source for `source`, if any.
    ///
    /// With no explicit list every source is active, ordered by `fallback_order`.
    pub fn active_source(
        &self,
        source: SourceRef,
        fallback_order: u32,
    ) -> Option<OrderedEventSource> {
        if self.active_sources.is_empty() {
            return Some(OrderedEventSource::new(source.kind, source.id, fallback_order));
        }
        self.active_sources
            .iter()
            .find(|active| active.source_ref() == source)
            .cloned()
    }

    /// Ended calendar events are hidden entirely.
    pub fn hides_ended_events(&self) -> bool {
        self.events_ended == EventsEnded::None
    }
}
