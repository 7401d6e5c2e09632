//! Recorded row fixtures.
//!
//! A fixture captures what the content providers returned for one or more
//! widgets, so an agenda can be rebuilt without a device.

use std::path::Path;

use agenda_core::{AgendaSettings, RowBatch};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub widgets: Vec<WidgetFixture>,
}

/// Everything recorded for one widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetFixture {
    pub widget_id: u32,
    /// IANA zone the rows were recorded in.
    #[serde(default)]
    pub time_zone: Option<String>,
    /// The moment the rows were recorded.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settings: Option<AgendaSettings>,
    /// Rows per source, in fetch order.
    #[serde(default)]
    pub results: Vec<RowBatch>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse fixture {}", path.display()))
    }

    /// The widgets to process: all of them, or only `widget_id`.
    pub fn select(&self, widget_id: Option<u32>) -> Result<Vec<&WidgetFixture>> {
        match widget_id {
            None => Ok(self.widgets.iter().collect()),
            Some(id) => self
                .widgets
                .iter()
                .find(|widget| widget.widget_id == id)
                .map(|widget| vec![widget])
                .with_context(|| format!("widget {id} not found in fixture")),
        }
    }
}
