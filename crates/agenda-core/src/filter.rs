//! Entry filters applied before merging.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::entry::EventEntry;
use crate::event::SourceEvent;
use crate::settings::AgendaSettings;

/// Drops entries whose title contains any of `keywords`.
///
/// `keywords` must already be lowercased, as returned by
/// [`AgendaSettings::keywords`].
pub fn hide_by_keywords(entries: Vec<EventEntry>, keywords: &[String]) -> Vec<EventEntry> {
    if keywords.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| {
            let title = entry.event.title().to_lowercase();
            !keywords.iter().any(|keyword| title.contains(keyword.as_str()))
        })
        .collect()
}

/// Drops the segments before `today` of calendar events in their source's
/// default color, when past events are hidden and not explicitly kept.
pub fn hide_past_default_color(
    entries: Vec<EventEntry>,
    settings: &AgendaSettings,
    today: NaiveDate,
) -> Vec<EventEntry> {
    if !settings.hides_ended_events() || settings.show_past_events_with_default_color {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| {
            !(matches!(*entry.event, SourceEvent::Timed(_))
                && entry.event.uses_default_color()
                && entry.entry_day < today)
        })
        .collect()
}

/// Drops entries that repeat an earlier entry's day, title, start and end.
///
/// Expects `entries` in final chronological order; the first of each group of
/// duplicates stays.
pub fn hide_duplicates(entries: Vec<EventEntry>) -> Vec<EventEntry> {
    let mut seen = HashSet::new();
    let keep: Vec<bool> = entries
        .iter()
        .map(|entry| {
            seen.insert((
                entry.entry_day,
                entry.event.title().to_string(),
                entry.event.start().timestamp_millis(),
                entry.event.end().timestamp_millis(),
            ))
        })
        .collect();

    let before = entries.len();
    let kept: Vec<EventEntry> = entries
        .into_iter()
        .zip(keep)
        .filter_map(|(entry, keep)| keep.then_some(entry))
        .collect();
    if kept.len() < before {
        tracing::debug!(dropped = before - kept.len(), "hid duplicate entries");
    }
    kept
}
