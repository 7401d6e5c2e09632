//! Turns one event into its per-day entries.

use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::entry::EventEntry;
use crate::event::{SourceEvent, TaskItem, TimedEvent};
use crate::settings::AgendaSettings;
use crate::time::{Clock, day_start};
use crate::window::TimeWindow;

/// Expands a clipped event into entries.
///
/// A calendar event gets one entry on its first visible day and, when
/// multi-day filling is on, one more for every following day it occupies
/// inside the window. A task gets a single entry at its anchor.
pub fn expand_event(
    event: SourceEvent,
    source_order: u32,
    window: &TimeWindow,
    settings: &AgendaSettings,
    clock: &Clock,
) -> Vec<EventEntry> {
    match event {
        SourceEvent::Timed(timed) => {
            expand_timed(timed, source_order, window, settings.fill_all_day_events, clock)
        }
        SourceEvent::Task(task) => vec![task_entry(task, source_order, clock)],
    }
}

fn expand_timed(
    event: TimedEvent,
    source_order: u32,
    window: &TimeWindow,
    fill: bool,
    clock: &Clock,
) -> Vec<EventEntry> {
    let first = first_visible_start(&event, window, clock);
    let last_day = event.last_day().min(window.last_day);
    let multi_day = event.is_multi_day();
    let zone = clock.zone();
    let event = Arc::new(SourceEvent::Timed(event));

    let mut entries = vec![EventEntry::new(Arc::clone(&event), first, source_order, clock)];
    if fill && multi_day {
        let following = first
            .date_naive()
            .iter_days()
            .skip(1)
            .take_while(|day| *day <= last_day);
        for day in following {
            let start = day_start(day, zone);
            entries.push(EventEntry::new(Arc::clone(&event), start, source_order, clock));
        }
    }
    entries
}

/// Where the first entry of a calendar event goes.
///
/// An event in its own color that began before the window and still reaches
/// into it starts at the window start. An ongoing event never starts before
/// today; this rule is applied last and wins over the first one.
fn first_visible_start(event: &TimedEvent, window: &TimeWindow, clock: &Clock) -> DateTime<Tz> {
    let mut first = event.start;
    if !event.uses_default_color && event.start < window.start && event.end > window.start {
        first = window.start;
    }
    let start_of_today = clock.start_of_today();
    if event.is_active(&clock.now()) && first < start_of_today {
        first = start_of_today;
    }
    first
}

/// The single entry of a task, placed at its anchor.
pub fn task_entry(task: TaskItem, source_order: u32, clock: &Clock) -> EventEntry {
    let anchor = task.anchor(&clock.now());
    EventEntry::new(Arc::new(SourceEvent::Task(task)), anchor, source_order, clock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::EventRow;
    use crate::settings::EventsEnded;
    use crate::source::{OrderedEventSource, ProviderKind};
    use chrono::{Duration, NaiveDate, TimeZone, Timelike, Utc};
    use chrono_tz::{America::New_York, Europe::Berlin};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc_midnight(y: i32, m: u32, d: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap().timestamp_millis()
    }

    fn calendar() -> OrderedEventSource {
        OrderedEventSource::new(ProviderKind::Calendar, 1, 0)
    }

    fn timed(row: &EventRow, zone: Tz) -> SourceEvent {
        SourceEvent::from_row(row, &calendar(), zone).unwrap()
    }

    fn days(entries: &[EventEntry]) -> Vec<NaiveDate> {
        entries.iter().map(|entry| entry.entry_day).collect()
    }

    #[test]
    fn test_ongoing_all_day_event_fills_each_day_from_today() {
        let clock = Clock::new(New_York, Utc.with_ymd_and_hms(2015, 8, 30, 16, 0, 0).unwrap());
        let settings = AgendaSettings::default();
        let window = TimeWindow::new(&settings, &clock);
        let row = EventRow::new(1)
            .start(utc_midnight(2015, 8, 25))
            .end(utc_midnight(2015, 9, 5))
            .all_day();

        let entries = expand_event(timed(&row, New_York), 0, &window, &settings, &clock);

        let expected: Vec<_> = date(2015, 8, 30).iter_days().take(6).collect();
        assert_eq!(days(&entries), expected);
        assert!(entries.iter().all(|e| Arc::ptr_eq(&e.event, &entries[0].event)));
        assert_eq!(entries[0].entry_start.hour(), 0);
    }

    #[test]
    fn test_fill_stops_at_the_window_end() {
        let clock = Clock::new(New_York, Utc.with_ymd_and_hms(2015, 8, 30, 16, 0, 0).unwrap());
        let settings = AgendaSettings::default();
        let window = TimeWindow::new(&settings, &clock);
        let row = EventRow::new(1)
            .start(utc_midnight(2015, 8, 1))
            .end(utc_midnight(2015, 12, 1))
            .all_day();

        let entries = expand_event(timed(&row, New_York), 0, &window, &settings, &clock);

        assert_eq!(entries.len(), 31);
        assert_eq!(entries.last().unwrap().entry_day, date(2015, 9, 29));
    }

    #[test]
    fn test_without_fill_only_the_first_day_is_emitted() {
        let clock = Clock::new(Berlin, Utc.with_ymd_and_hms(2019, 8, 4, 8, 0, 0).unwrap());
        let settings = AgendaSettings {
            fill_all_day_events: false,
            ..AgendaSettings::default()
        };
        let window = TimeWindow::new(&settings, &clock);
        let start = Berlin.with_ymd_and_hms(2019, 8, 6, 20, 0, 0).unwrap();
        let row = EventRow::new(1)
            .start(start.timestamp_millis())
            .end((start + Duration::days(2)).timestamp_millis());

        let entries = expand_event(timed(&row, Berlin), 0, &window, &settings, &clock);

        assert_eq!(days(&entries), vec![date(2019, 8, 6)]);
        assert_eq!(entries[0].entry_start, start);
    }

    #[test]
    fn test_end_on_a_day_boundary_does_not_spill() {
        let clock = Clock::new(Berlin, Utc.with_ymd_and_hms(2019, 8, 4, 8, 0, 0).unwrap());
        let settings = AgendaSettings::default();
        let window = TimeWindow::new(&settings, &clock);
        let row = EventRow::new(1)
            .start(Berlin.with_ymd_and_hms(2019, 8, 6, 22, 0, 0).unwrap().timestamp_millis())
            .end(Berlin.with_ymd_and_hms(2019, 8, 8, 0, 0, 0).unwrap().timestamp_millis());

        let entries = expand_event(timed(&row, Berlin), 0, &window, &settings, &clock);

        assert_eq!(days(&entries), vec![date(2019, 8, 6), date(2019, 8, 7)]);
    }

    #[test]
    fn test_fill_reaches_the_day_a_timed_event_ends_on() {
        let clock = Clock::new(Berlin, Utc.with_ymd_and_hms(2019, 8, 4, 8, 0, 0).unwrap());
        let settings = AgendaSettings::default();
        let window = TimeWindow::new(&settings, &clock);
        let row = EventRow::new(1)
            .start(Berlin.with_ymd_and_hms(2019, 8, 6, 22, 0, 0).unwrap().timestamp_millis())
            .end(Berlin.with_ymd_and_hms(2019, 8, 8, 0, 30, 0).unwrap().timestamp_millis());

        let entries = expand_event(timed(&row, Berlin), 0, &window, &settings, &clock);

        assert_eq!(
            days(&entries),
            vec![date(2019, 8, 6), date(2019, 8, 7), date(2019, 8, 8)]
        );
        assert_eq!(entries[2].entry_start.hour(), 0);
    }

    #[test]
    fn test_colored_event_spanning_the_window_start_is_pinned_to_it() {
        let clock = Clock::new(Berlin, Utc.with_ymd_and_hms(2019, 8, 4, 8, 0, 0).unwrap());
        let settings = AgendaSettings {
            events_ended: EventsEnded::Yesterday,
            fill_all_day_events: false,
            ..AgendaSettings::default()
        };
        let window = TimeWindow::new(&settings, &clock);
        // Ended yesterday evening, so it is not active now.
        let row = EventRow::new(1)
            .start(Berlin.with_ymd_and_hms(2019, 8, 1, 9, 0, 0).unwrap().timestamp_millis())
            .end(Berlin.with_ymd_and_hms(2019, 8, 3, 20, 0, 0).unwrap().timestamp_millis())
            .color(0xFF00_00FF);
        let entries = expand_event(timed(&row, Berlin), 0, &window, &settings, &clock);
        assert_eq!(days(&entries), vec![date(2019, 8, 3)]);

        let row = EventRow::new(1)
            .start(Berlin.with_ymd_and_hms(2019, 8, 1, 9, 0, 0).unwrap().timestamp_millis())
            .end(Berlin.with_ymd_and_hms(2019, 8, 3, 20, 0, 0).unwrap().timestamp_millis());
        let entries = expand_event(timed(&row, Berlin), 0, &window, &settings, &clock);
        assert_eq!(days(&entries), vec![date(2019, 8, 1)]);
    }

    #[test]
    fn test_active_pin_wins_over_window_start_pin() {
        let clock = Clock::new(Berlin, Utc.with_ymd_and_hms(2019, 8, 4, 8, 0, 0).unwrap());
        let settings = AgendaSettings {
            events_ended: EventsEnded::OneWeek,
            fill_all_day_events: false,
            ..AgendaSettings::default()
        };
        let window = TimeWindow::new(&settings, &clock);
        let row = EventRow::new(1)
            .start(Berlin.with_ymd_and_hms(2019, 7, 20, 9, 0, 0).unwrap().timestamp_millis())
            .end(Berlin.with_ymd_and_hms(2019, 8, 10, 9, 0, 0).unwrap().timestamp_millis())
            .color(0xFF00_00FF);

        let entries = expand_event(timed(&row, Berlin), 0, &window, &settings, &clock);

        assert_eq!(days(&entries), vec![date(2019, 8, 4)]);
        assert_eq!(entries[0].entry_start, clock.start_of_today());
    }

    #[test]
    fn test_task_is_a_single_entry_at_its_anchor() {
        let clock = Clock::new(Berlin, Utc.with_ymd_and_hms(2019, 8, 4, 8, 0, 0).unwrap());
        let settings = AgendaSettings::default();
        let window = TimeWindow::new(&settings, &clock);
        let tasks = OrderedEventSource::new(ProviderKind::Tasks, 2, 3);
        let due = Berlin.with_ymd_and_hms(2019, 8, 1, 9, 0, 0).unwrap();
        let row = EventRow::new(7)
            .start(Berlin.with_ymd_and_hms(2019, 7, 29, 9, 0, 0).unwrap().timestamp_millis())
            .end(due.timestamp_millis());
        let task = SourceEvent::from_row(&row, &tasks, Berlin).unwrap();

        let entries = expand_event(task, 3, &window, &settings, &clock);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_start, due);
        assert_eq!(entries[0].source_order, 3);
    }
}
