//! Check command: reports fixture rows the engine would skip.

use std::io::Write;

use agenda_core::normalize_rows;
use anyhow::Result;
use chrono::Utc;

use crate::commands::render::{RenderOptions, resolve};
use crate::config::Config;
use crate::fixture::Fixture;

/// Runs the check command. Returns the number of skipped rows.
pub fn run<W: Write>(writer: &mut W, fixture: &Fixture, config: &Config) -> Result<usize> {
    let options = RenderOptions::default();
    let mut total_skipped = 0;

    for widget in fixture.select(None)? {
        let resolved = resolve(widget, config, &options, Utc::now())?;
        let settings = resolved.settings;
        let zone = settings.locked_time_zone.unwrap_or(resolved.zone);
        let rows: usize = widget.results.iter().map(|batch| batch.rows.len()).sum();
        let normalized = normalize_rows(&widget.results, settings, zone);

        writeln!(
            writer,
            "Widget {}: {rows} rows, {} events, {} skipped",
            widget.widget_id,
            normalized.events.len(),
            normalized.skipped.len()
        )?;
        for skipped in &normalized.skipped {
            let row = skipped
                .row_id
                .map_or_else(|| "?".to_string(), |id| id.to_string());
            writeln!(writer, "  {} row {row}: {}", skipped.source, skipped.error)?;
        }
        total_skipped += normalized.skipped.len();
    }

    Ok(total_skipped)
}
