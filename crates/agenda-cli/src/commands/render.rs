//! Render command: builds each widget's agenda from a fixture.
//!
//! Widgets are independent, so they are built in parallel. Output is either a
//! plain listing or JSON.

use std::io::Write;

use agenda_core::{
    Agenda, AgendaSettings, Clock, EndTimeSection, EventEntry, SourceEvent, WidgetEntry,
    build_agenda,
};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{Config, parse_zone};
use crate::fixture::{Fixture, WidgetFixture};

/// Command-line overrides for a render run.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub widget: Option<u32>,
    pub now: Option<DateTime<Utc>>,
    pub zone: Option<Tz>,
    pub json: bool,
}

/// One widget's inputs after applying overrides and configuration.
#[derive(Debug, Clone)]
pub struct ResolvedWidget<'a> {
    pub fixture: &'a WidgetFixture,
    pub zone: Tz,
    pub now: DateTime<Utc>,
    pub settings: &'a AgendaSettings,
}

/// A built agenda with the inputs it was built from.
#[derive(Debug)]
pub struct WidgetAgenda {
    pub widget_id: u32,
    pub zone: Tz,
    pub now: DateTime<Utc>,
    pub agenda: Agenda,
}

/// Picks zone, now and settings for a widget.
///
/// The command line wins over the fixture, which wins over the config.
pub fn resolve<'a>(
    widget: &'a WidgetFixture,
    config: &'a Config,
    options: &RenderOptions,
    fallback_now: DateTime<Utc>,
) -> Result<ResolvedWidget<'a>> {
    let zone = match (options.zone, widget.time_zone.as_deref()) {
        (Some(zone), _) => zone,
        (None, Some(name)) => {
            parse_zone(name).with_context(|| format!("widget {}", widget.widget_id))?
        }
        (None, None) => config.zone()?,
    };
    Ok(ResolvedWidget {
        fixture: widget,
        zone,
        now: options.now.or(widget.now).unwrap_or(fallback_now),
        settings: widget.settings.as_ref().unwrap_or(&config.defaults),
    })
}

/// Builds the agendas of the selected widgets, in fixture order.
pub fn build_all(
    fixture: &Fixture,
    config: &Config,
    options: &RenderOptions,
    fallback_now: DateTime<Utc>,
) -> Result<Vec<WidgetAgenda>> {
    let resolved = fixture
        .select(options.widget)?
        .into_iter()
        .map(|widget| resolve(widget, config, options, fallback_now))
        .collect::<Result<Vec<_>>>()?;

    Ok(resolved
        .par_iter()
        .map(|widget| {
            let clock = Clock::new(widget.zone, widget.now);
            let agenda = build_agenda(&widget.fixture.results, widget.settings, &clock);
            tracing::debug!(
                widget_id = widget.fixture.widget_id,
                entry_count = agenda.entries.len(),
                skipped = agenda.skipped.len(),
                "built widget agenda"
            );
            WidgetAgenda {
                widget_id: widget.fixture.widget_id,
                zone: widget.zone,
                now: widget.now,
                agenda,
            }
        })
        .collect())
}

// ========== Text Output ==========

/// Writes the human-readable listing of one agenda.
pub fn write_agenda<W: Write>(writer: &mut W, widget: &WidgetAgenda) -> Result<()> {
    writeln!(
        writer,
        "Widget {} ({}, now {})",
        widget.widget_id,
        widget.zone.name(),
        widget.now.with_timezone(&widget.zone).format("%Y-%m-%d %H:%M")
    )?;

    for entry in &widget.agenda.entries {
        match entry {
            WidgetEntry::PastDueHeader => writeln!(writer, "== Past and due ==")?,
            WidgetEntry::DayHeader(day) => writeln!(writer, "== {} ==", day.format("%a %Y-%m-%d"))?,
            WidgetEntry::Event(event) => writeln!(writer, "  {}", event_line(event))?,
            WidgetEntry::FillerDay(_) => writeln!(writer, "  (no events)")?,
            WidgetEntry::Last => writeln!(writer, "== End ==")?,
        }
    }

    for skipped in &widget.agenda.skipped {
        let row = skipped
            .row_id
            .map_or_else(|| "?".to_string(), |id| id.to_string());
        writeln!(writer, "skipped {} row {row}: {}", skipped.source, skipped.error)?;
    }
    Ok(())
}

fn event_line(entry: &EventEntry) -> String {
    let event = &entry.event;
    let time = match &**event {
        SourceEvent::Timed(timed) if timed.all_day => "all day".to_string(),
        SourceEvent::Timed(timed) => format!(
            "{}-{}",
            stamp(&timed.start, entry.entry_day),
            stamp(&timed.end, entry.entry_day)
        ),
        SourceEvent::Task(task) => task.due().map_or_else(
            || format!("start {}", stamp(&task.start(), entry.entry_day)),
            |due| format!("due {}", stamp(&due, entry.entry_day)),
        ),
    };
    let title = if event.title().is_empty() {
        "(untitled)"
    } else {
        event.title()
    };
    let section = entry.end_time_section.select("past", "today", "future");
    format!("{time}  {title}  [{}, {section}]", event.source())
}

/// Time of day, prefixed with the date when it is not on `day`.
fn stamp(moment: &DateTime<Tz>, day: NaiveDate) -> String {
    if moment.date_naive() == day {
        moment.format("%H:%M").to_string()
    } else {
        moment.format("%m-%d %H:%M").to_string()
    }
}

// ========== JSON Output ==========

#[derive(Debug, Serialize)]
pub struct JsonWidget {
    pub widget_id: u32,
    pub time_zone: String,
    pub now: String,
    pub entries: Vec<JsonEntry>,
    pub skipped: Vec<JsonSkipped>,
}

#[derive(Debug, Serialize)]
pub struct JsonEntry {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<EndTimeSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<JsonEvent>,
}

#[derive(Debug, Serialize)]
pub struct JsonEvent {
    pub id: i64,
    pub source: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub all_day: bool,
    /// `#AARRGGBB`.
    pub color: String,
    pub uses_default_color: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub alarm_active: bool,
    pub recurring: bool,
}

#[derive(Debug, Serialize)]
pub struct JsonSkipped {
    pub source: String,
    pub row_id: Option<i64>,
    pub error: String,
}

fn json_widget(widget: &WidgetAgenda) -> JsonWidget {
    JsonWidget {
        widget_id: widget.widget_id,
        time_zone: widget.zone.name().to_string(),
        now: widget.now.with_timezone(&widget.zone).to_rfc3339(),
        entries: widget.agenda.entries.iter().map(json_entry).collect(),
        skipped: widget
            .agenda
            .skipped
            .iter()
            .map(|skipped| JsonSkipped {
                source: skipped.source.to_string(),
                row_id: skipped.row_id,
                error: skipped.error.to_string(),
            })
            .collect(),
    }
}

fn json_entry(entry: &WidgetEntry) -> JsonEntry {
    let day = match entry {
        WidgetEntry::DayHeader(day) | WidgetEntry::FillerDay(day) => Some(day.to_string()),
        WidgetEntry::Event(event) => Some(event.entry_day.to_string()),
        WidgetEntry::PastDueHeader | WidgetEntry::Last => None,
    };
    let event = entry.as_event();
    JsonEntry {
        kind: entry.kind(),
        day,
        start: event.map(|e| e.entry_start.to_rfc3339()),
        section: event.map(|e| e.end_time_section),
        event: event.map(|e| json_event(&e.event)),
    }
}

fn json_event(event: &SourceEvent) -> JsonEvent {
    JsonEvent {
        id: event.id(),
        source: event.source().to_string(),
        title: event.title().to_string(),
        start: event.start().to_rfc3339(),
        end: event.end().to_rfc3339(),
        all_day: event.all_day(),
        color: format!("#{:08X}", event.color()),
        uses_default_color: event.uses_default_color(),
        location: Some(event.location().to_string()).filter(|location| !location.is_empty()),
        alarm_active: event.alarm_active(),
        recurring: event.recurring(),
    }
}

/// Formats all agendas as one JSON array.
pub fn format_json(widgets: &[WidgetAgenda]) -> Result<String> {
    let widgets: Vec<JsonWidget> = widgets.iter().map(json_widget).collect();
    Ok(serde_json::to_string_pretty(&widgets)?)
}

// ========== Public Interface ==========

/// Runs the render command.
pub fn run<W: Write>(
    writer: &mut W,
    fixture: &Fixture,
    config: &Config,
    options: &RenderOptions,
) -> Result<()> {
    let widgets = build_all(fixture, config, options, Utc::now())?;

    if options.json {
        writeln!(writer, "{}", format_json(&widgets)?)?;
        return Ok(());
    }

    for (index, widget) in widgets.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        write_agenda(writer, widget)?;
    }
    Ok(())
}
