//! The visible window and the first clipping pass.

use chrono::{DateTime, Days, Duration, NaiveDate};
use chrono_tz::Tz;

use crate::event::SourceEvent;
use crate::settings::{AgendaSettings, MAX_EVENT_RANGE_DAYS};
use crate::time::{Clock, day_start};

/// The span of civil days one agenda covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// First instant shown: start of today minus the look-back.
    pub start: DateTime<Tz>,
    pub today: NaiveDate,
    /// Last civil day shown, inclusive.
    pub last_day: NaiveDate,
    /// Exclusive end: the first instant after `last_day`.
    pub end: DateTime<Tz>,
}

impl TimeWindow {
    pub fn new(settings: &AgendaSettings, clock: &Clock) -> Self {
        let zone = clock.zone();
        let today = clock.today();
        let first_day = today - Duration::days(settings.events_ended.lookback_days());
        let range = settings.event_range_days.min(MAX_EVENT_RANGE_DAYS);
        if range < settings.event_range_days {
            tracing::warn!(
                requested = settings.event_range_days,
                range,
                "event range clamped"
            );
        }
        let last_day = today
            .checked_add_days(Days::new(u64::from(range)))
            .unwrap_or(NaiveDate::MAX);
        Self {
            start: day_start(first_day, zone),
            today,
            last_day,
            end: day_start(last_day.succ_opt().unwrap_or(last_day), zone),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Days from today through `last_day`.
    pub fn upcoming_days(&self) -> impl Iterator<Item = NaiveDate> {
        let last_day = self.last_day;
        self.today.iter_days().take_while(move |day| *day <= last_day)
    }
}

/// Drops events that cannot show up in `window`.
///
/// Calendar events outside the window are dropped, as are events that have
/// already ended when ended events are hidden. Events in the source's default
/// color survive both checks when the user asked to keep them. Tasks are
/// dropped only when they are anchored past the window end.
pub fn clip_events(
    events: Vec<SourceEvent>,
    window: &TimeWindow,
    settings: &AgendaSettings,
    clock: &Clock,
) -> Vec<SourceEvent> {
    let now = clock.now();
    let before = events.len();
    let kept: Vec<SourceEvent> = events
        .into_iter()
        .filter(|event| match event {
            SourceEvent::Timed(timed) => {
                let keep_past =
                    timed.uses_default_color && settings.show_past_events_with_default_color;
                if timed.start >= window.end {
                    return false;
                }
                if timed.end <= window.start && !keep_past {
                    return false;
                }
                !(settings.hides_ended_events() && timed.end <= now && !keep_past)
            }
            SourceEvent::Task(task) => task.anchor(&now) < window.end,
        })
        .collect();
    tracing::debug!(
        event_count = kept.len(),
        dropped = before - kept.len(),
        "clipped events to the visible window"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::EventRow;
    use crate::settings::EventsEnded;
    use crate::source::{OrderedEventSource, ProviderKind};
    use chrono::{TimeZone, Utc};
    use chrono_tz::Europe::Berlin;

    fn clock() -> Clock {
        Clock::new(Berlin, Utc.with_ymd_and_hms(2019, 8, 4, 10, 0, 0).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(start_hour: u32, day: u32, hours: i64, colored: bool) -> SourceEvent {
        let start = Berlin.with_ymd_and_hms(2019, 8, day, start_hour, 0, 0).unwrap();
        let mut row = EventRow::new(i64::from(day * 100 + start_hour))
            .start(start.timestamp_millis())
            .end((start + Duration::hours(hours)).timestamp_millis());
        if colored {
            row = row.color(0xFFAA_0000);
        }
        let source = OrderedEventSource::new(ProviderKind::Calendar, 1, 0);
        SourceEvent::from_row(&row, &source, Berlin).unwrap()
    }

    #[test]
    fn test_window_runs_from_lookback_through_range() {
        let settings = AgendaSettings {
            event_range_days: 30,
            events_ended: EventsEnded::OneWeek,
            ..AgendaSettings::default()
        };
        let window = TimeWindow::new(&settings, &clock());

        assert_eq!(window.first_day(), date(2019, 7, 28));
        assert_eq!(window.last_day, date(2019, 9, 3));
        assert_eq!(window.end.date_naive(), date(2019, 9, 4));
        assert_eq!(window.upcoming_days().count(), 31);
    }

    #[test]
    fn test_huge_range_is_clamped() {
        let settings = AgendaSettings {
            event_range_days: u32::MAX,
            show_days_without_events: true,
            ..AgendaSettings::default()
        };
        let window = TimeWindow::new(&settings, &clock());

        assert_eq!(window.upcoming_days().count(), 3651);
        assert_eq!(window.last_day, date(2029, 8, 1));
    }

    #[test]
    fn test_zero_range_shows_today_only() {
        let settings = AgendaSettings {
            event_range_days: 0,
            ..AgendaSettings::default()
        };
        let window = TimeWindow::new(&settings, &clock());

        assert_eq!(window.upcoming_days().collect::<Vec<_>>(), vec![date(2019, 8, 4)]);
    }

    #[test]
    fn test_ended_events_are_hidden_unless_kept() {
        let clock = clock();
        let settings = AgendaSettings::default();
        let window = TimeWindow::new(&settings, &clock);
        let events = vec![
            event(8, 4, 1, true),   // ended this morning
            event(13, 4, 1, true),  // later today
            event(9, 4, 4, true),   // ongoing
            event(9, 20, 1, true),  // in range
            event(9, 5, 1, false),  // tomorrow
        ];
        let kept = clip_events(events, &window, &settings, &clock);
        assert_eq!(kept.len(), 4);

        let settings = AgendaSettings {
            events_ended: EventsEnded::Today,
            ..AgendaSettings::default()
        };
        let kept = clip_events(vec![event(8, 4, 1, true)], &window, &settings, &clock);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_events_outside_the_window_are_dropped() {
        let clock = clock();
        let settings = AgendaSettings {
            event_range_days: 7,
            events_ended: EventsEnded::Yesterday,
            ..AgendaSettings::default()
        };
        let window = TimeWindow::new(&settings, &clock);
        let events = vec![
            event(9, 2, 1, true),  // before yesterday
            event(9, 3, 1, true),  // yesterday
            event(9, 11, 1, true), // last day
            event(9, 12, 1, true), // after the window
        ];

        let kept = clip_events(events, &window, &settings, &clock);
        let days: Vec<_> = kept.iter().map(|e| e.start().date_naive()).collect();
        assert_eq!(days, vec![date(2019, 8, 3), date(2019, 8, 11)]);
    }

    #[test]
    fn test_default_colored_past_events_can_be_kept() {
        let clock = clock();
        let settings = AgendaSettings {
            show_past_events_with_default_color: true,
            ..AgendaSettings::default()
        };
        let window = TimeWindow::new(&settings, &clock);
        let events = vec![event(9, 1, 1, false), event(9, 1, 1, true)];

        let kept = clip_events(events, &window, &settings, &clock);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].uses_default_color());
    }

    #[test]
    fn test_overdue_tasks_survive_clipping() {
        let clock = clock();
        let settings = AgendaSettings {
            event_range_days: 7,
            ..AgendaSettings::default()
        };
        let window = TimeWindow::new(&settings, &clock);
        let tasks = OrderedEventSource::new(ProviderKind::Tasks, 2, 0);
        let overdue = EventRow::new(1).end(
            Berlin
                .with_ymd_and_hms(2019, 8, 1, 9, 0, 0)
                .unwrap()
                .timestamp_millis(),
        );
        let far = EventRow::new(2).end(
            Berlin
                .with_ymd_and_hms(2019, 9, 1, 9, 0, 0)
                .unwrap()
                .timestamp_millis(),
        );
        let events = vec![
            SourceEvent::from_row(&overdue, &tasks, Berlin).unwrap(),
            SourceEvent::from_row(&far, &tasks, Berlin).unwrap(),
        ];

        let kept = clip_events(events, &window, &settings, &clock);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id(), 1);
    }
}
