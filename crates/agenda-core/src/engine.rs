//! The per-refresh pipeline.
//!
//! `build_agenda` is a pure function of row batches, settings and a clock. It
//! never fails: rows that cannot be normalized are reported in
//! [`Agenda::skipped`] and the rest of the pipeline carries on.

use std::collections::HashMap;

use chrono_tz::Tz;

use crate::entry::{EventEntry, WidgetEntry};
use crate::error::EntryError;
use crate::event::SourceEvent;
use crate::expand::expand_event;
use crate::filter::{hide_by_keywords, hide_duplicates, hide_past_default_color};
use crate::merge::{merge_entries, sort_entries};
use crate::recurring::keep_closest_instances;
use crate::row::RowBatch;
use crate::settings::AgendaSettings;
use crate::source::SourceRef;
use crate::time::Clock;
use crate::window::{TimeWindow, clip_events};

/// A row left out of the agenda and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub source: SourceRef,
    pub row_id: Option<i64>,
    pub error: EntryError,
}

/// Normalized events of all active sources.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRows {
    pub events: Vec<SourceEvent>,
    /// Display priority per active source.
    pub orders: HashMap<SourceRef, u32>,
    pub skipped: Vec<SkippedRow>,
}

/// Converts the rows of every active source into events.
///
/// Batches from inactive sources are ignored. A row that fails to normalize
/// is recorded and skipped; it never affects other rows.
pub fn normalize_rows(batches: &[RowBatch], settings: &AgendaSettings, zone: Tz) -> NormalizedRows {
    let mut normalized = NormalizedRows::default();
    for (position, batch) in (0_u32..).zip(batches) {
        let Some(source) = settings.active_source(batch.source, position) else {
            tracing::debug!(source = %batch.source, "ignoring rows of inactive source");
            continue;
        };
        normalized.orders.entry(batch.source).or_insert(source.order);
        for row in &batch.rows {
            match SourceEvent::from_row(row, &source, zone) {
                Ok(event) => normalized.events.push(event),
                Err(error) => {
                    tracing::warn!(
                        source = %batch.source,
                        row_id = ?row.id,
                        error = %error,
                        "skipping row"
                    );
                    normalized.skipped.push(SkippedRow {
                        source: batch.source,
                        row_id: row.id,
                        error,
                    });
                }
            }
        }
    }
    normalized
}

/// One refresh result: the entry sequence plus the rows left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agenda {
    /// Always ends with [`WidgetEntry::Last`].
    pub entries: Vec<WidgetEntry>,
    pub skipped: Vec<SkippedRow>,
}

impl Agenda {
    pub fn event_entries(&self) -> impl Iterator<Item = &EventEntry> {
        self.entries.iter().filter_map(WidgetEntry::as_event)
    }

    /// Holds nothing but the terminal marker.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|entry| matches!(entry, WidgetEntry::Last))
    }
}

/// Builds the agenda for one widget.
///
/// Runs normalization, clipping, expansion, filtering, recurring reduction,
/// sorting, duplicate removal and merging, in that order. A locked zone in
/// `settings` replaces the clock's zone.
pub fn build_agenda(batches: &[RowBatch], settings: &AgendaSettings, clock: &Clock) -> Agenda {
    let clock = settings
        .locked_time_zone
        .map_or(*clock, |zone| clock.in_zone(zone));
    let NormalizedRows {
        events,
        orders,
        skipped,
    } = normalize_rows(batches, settings, clock.zone());

    let window = TimeWindow::new(settings, &clock);
    let events = clip_events(events, &window, settings, &clock);

    let mut entries: Vec<EventEntry> = events
        .into_iter()
        .flat_map(|event| {
            let order = orders.get(&event.source()).copied().unwrap_or(u32::MAX);
            expand_event(event, order, &window, settings, &clock)
        })
        .collect();
    entries = hide_by_keywords(entries, &settings.keywords());
    entries = hide_past_default_color(entries, settings, clock.today());
    if settings.show_only_closest_instance_of_recurring_event {
        entries = keep_closest_instances(entries, &clock.now());
    }
    sort_entries(&mut entries);
    if settings.hide_duplicates {
        entries = hide_duplicates(entries);
    }
    tracing::debug!(
        entry_count = entries.len(),
        skipped = skipped.len(),
        zone = clock.zone().name(),
        "built agenda entries"
    );

    Agenda {
        entries: merge_entries(entries, &window, settings),
        skipped,
    }
}
