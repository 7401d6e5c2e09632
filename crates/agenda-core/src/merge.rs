//! Final ordering and grouping of entries into the agenda sequence.

use chrono::NaiveDate;

use crate::entry::{EventEntry, WidgetEntry};
use crate::settings::AgendaSettings;
use crate::window::TimeWindow;

/// Sorts by day, start within the day, source priority and id. The event's
/// own start breaks the last ties between instances of one series.
pub fn sort_entries(entries: &mut [EventEntry]) {
    entries.sort_by(|a, b| {
        a.entry_day
            .cmp(&b.entry_day)
            .then_with(|| a.entry_start.cmp(&b.entry_start))
            .then_with(|| a.source_order.cmp(&b.source_order))
            .then_with(|| a.event.id().cmp(&b.event.id()))
            .then_with(|| a.event.start().cmp(&b.event.start()))
    });
}

/// Builds the agenda sequence from sorted entries.
///
/// Entries before today go under one past & due header, either directly or
/// grouped per day. Days from today through the window's last day get a day
/// header when they hold entries, or always when empty days are shown, in
/// which case an empty day carries a filler row. The sequence always ends
/// with [`WidgetEntry::Last`].
pub fn merge_entries(
    entries: Vec<EventEntry>,
    window: &TimeWindow,
    settings: &AgendaSettings,
) -> Vec<WidgetEntry> {
    let mut merged = Vec::with_capacity(entries.len() + 2);
    let mut pending = entries.into_iter().peekable();

    let mut past = Vec::new();
    while let Some(entry) = pending.next_if(|entry| entry.entry_day < window.today) {
        past.push(entry);
    }
    if !past.is_empty() {
        merged.push(WidgetEntry::PastDueHeader);
        if settings.show_past_events_under_one_header {
            merged.extend(past.into_iter().map(WidgetEntry::Event));
        } else {
            push_grouped(&mut merged, past);
        }
    }

    for day in window.upcoming_days() {
        let mut day_entries = Vec::new();
        while let Some(entry) = pending.next_if(|entry| entry.entry_day == day) {
            day_entries.push(WidgetEntry::Event(entry));
        }
        if day_entries.is_empty() {
            if settings.show_days_without_events {
                merged.push(WidgetEntry::DayHeader(day));
                merged.push(WidgetEntry::FillerDay(day));
            }
        } else {
            merged.push(WidgetEntry::DayHeader(day));
            merged.extend(day_entries);
        }
    }

    // Entries are clipped to the window upstream; anything left is still shown.
    push_grouped(&mut merged, pending.collect());
    merged.push(WidgetEntry::Last);
    merged
}

fn push_grouped(merged: &mut Vec<WidgetEntry>, entries: Vec<EventEntry>) {
    let mut current: Option<NaiveDate> = None;
    for entry in entries {
        if current != Some(entry.entry_day) {
            current = Some(entry.entry_day);
            merged.push(WidgetEntry::DayHeader(entry.entry_day));
        }
        merged.push(WidgetEntry::Event(entry));
    }
}
