//! Agenda entry construction for calendar widgets.
//!
//! This crate turns already-fetched calendar and task rows into the ordered
//! entry sequence a widget renders:
//! - Time: zone-aware conversion with DST-gap correction for all-day values
//! - Clipping and expansion: the visible window and per-day event entries
//! - Filtering: keywords, duplicates, recurring series and past events
//! - Merging: past & due grouping, day headers, filler days and the end marker
//!
//! Everything is a pure function of rows, settings and an explicit [`Clock`].
//!
//! Callers that rebuild on provider change notifications can gate those
//! rebuilds per widget with [`RefreshThrottle`]; the engine itself never
//! throttles.

pub mod engine;
pub mod entry;
mod error;
pub mod event;
mod expand;
mod filter;
mod merge;
mod recurring;
pub mod row;
pub mod settings;
pub mod source;
pub mod throttle;
pub mod time;
pub mod window;

pub use engine::{Agenda, NormalizedRows, SkippedRow, build_agenda, normalize_rows};
pub use entry::{EndTimeSection, EventEntry, WidgetEntry};
pub use error::EntryError;
pub use event::{SourceEvent, TaskItem, TaskSchedule, TimedEvent};
pub use row::{EventRow, RowBatch};
pub use settings::{AgendaSettings, EventsEnded};
pub use source::{OrderedEventSource, ProviderKind, SourceRef};
pub use throttle::RefreshThrottle;
pub use time::Clock;
pub use window::TimeWindow;
