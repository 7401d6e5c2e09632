//! Closest-instance reduction for recurring series.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;

use crate::entry::EventEntry;
use crate::event::SourceEvent;
use crate::source::SourceRef;

type SeriesKey = (SourceRef, i64);

/// Keeps one entry per recurring series: the one whose `entry_start` is
/// closest to `now`, the earlier one on ties.
///
/// Entries are grouped by source and id. Groups holding a single occurrence
/// are left alone, so the fill days of one multi-day event all stay.
pub fn keep_closest_instances(entries: Vec<EventEntry>, now: &DateTime<Tz>) -> Vec<EventEntry> {
    let mut first_seen: HashMap<SeriesKey, &SourceEvent> = HashMap::new();
    let mut recurring: HashSet<SeriesKey> = HashSet::new();
    let mut closest: HashMap<SeriesKey, usize> = HashMap::new();

    for (index, entry) in entries.iter().enumerate() {
        let key = series_key(entry);
        let first = *first_seen.entry(key).or_insert(&*entry.event);
        if !first.same_occurrence(&*entry.event) {
            recurring.insert(key);
        }
        closest
            .entry(key)
            .and_modify(|best| {
                if is_closer(entry, &entries[*best], now) {
                    *best = index;
                }
            })
            .or_insert(index);
    }

    let before = entries.len();
    let kept: Vec<EventEntry> = entries
        .into_iter()
        .enumerate()
        .filter(|(index, entry)| {
            let key = series_key(entry);
            !recurring.contains(&key) || closest.get(&key) == Some(index)
        })
        .map(|(_, entry)| entry)
        .collect();
    tracing::debug!(
        entry_count = kept.len(),
        dropped = before - kept.len(),
        "reduced recurring series to their closest instance"
    );
    kept
}

fn series_key(entry: &EventEntry) -> SeriesKey {
    (entry.event.source(), entry.event.id())
}

fn distance(entry: &EventEntry, now: &DateTime<Tz>) -> TimeDelta {
    (entry.entry_start - *now).abs()
}

fn is_closer(candidate: &EventEntry, best: &EventEntry, now: &DateTime<Tz>) -> bool {
    let (candidate_distance, best_distance) = (distance(candidate, now), distance(best, now));
    candidate_distance < best_distance
        || (candidate_distance == best_distance && candidate.entry_start < best.entry_start)
}
