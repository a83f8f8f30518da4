//! Day-boundary-aware temporal ordering of trip records.
//!
//! Trips departing before 04:00 belong to the previous evening's duty
//! block: a 02:00 departure must sort after the 22:00 and 23:00 trips of
//! the same roster, not before them. Ordering additionally keeps duty
//! chains (same service, original driver badge, and line) contiguous by
//! ranking each group at its earliest operational key.

use std::collections::HashMap;

use chrono::Timelike;

use crate::models::TripRecord;

/// Minutes since local midnight below which a departure is treated as a
/// continuation of the previous operational day (04:00).
pub const MIDNIGHT_CUTOFF_MIN: u32 = 240;

/// One operational day in minutes.
const DAY_MIN: u32 = 1440;

/// Key for records with no usable departure instant; sorts last.
const UNKNOWN_KEY: u32 = u32::MAX;

/// Sort direction; reversal applies to the whole comparison, tie-breaks
/// included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Earliest operational key first
    #[default]
    Ascending,
    /// Latest operational key first
    Descending,
}

/// Duty-chain grouping key: trips sharing it stay contiguous in the
/// sorted roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    /// Service number, when the feed provided one
    pub service_number: Option<String>,
    /// Original driver badge
    pub driver_badge: String,
    /// Line code
    pub line_code: String,
}

/// Grouping key of a record.
#[must_use]
pub fn group_key(record: &TripRecord) -> GroupKey {
    GroupKey {
        service_number: record
            .service_number
            .as_deref()
            .map(|s| s.trim().to_string()),
        driver_badge: record.driver.badge.trim().to_string(),
        line_code: record.line_code.trim().to_string(),
    }
}

/// Departure expressed as minutes since local midnight, preferring the
/// adjusted instant over the scheduled one. `None` when neither exists.
#[must_use]
pub fn effective_minutes(record: &TripRecord) -> Option<u32> {
    record
        .effective_departure()
        .map(|instant| instant.time().hour() * 60 + instant.time().minute())
}

/// Minutes shifted past the midnight cutoff so early-morning trips rank
/// after the previous evening. Unknown departures rank last.
#[must_use]
pub fn operational_key(record: &TripRecord) -> u32 {
    match effective_minutes(record) {
        Some(minutes) if minutes < MIDNIGHT_CUTOFF_MIN => minutes + DAY_MIN,
        Some(minutes) => minutes,
        None => UNKNOWN_KEY,
    }
}

/// Produce a stable total order of the records.
///
/// Primary: the group's minimum operational key (its "anchor key"), so
/// duty chains stay contiguous. Secondary: the record's own operational
/// key. Remaining ties fall to the group key and the raw scheduled
/// departure, so equal inputs always produce the same order.
#[must_use]
pub fn sort_records(records: &[TripRecord], direction: SortDirection) -> Vec<TripRecord> {
    let mut anchors: HashMap<GroupKey, u32> = HashMap::new();
    for record in records {
        let key = operational_key(record);
        anchors
            .entry(group_key(record))
            .and_modify(|anchor| *anchor = (*anchor).min(key))
            .or_insert(key);
    }

    let mut decorated: Vec<_> = records
        .iter()
        .map(|record| {
            let group = group_key(record);
            let anchor = anchors[&group];
            (
                anchor,
                operational_key(record),
                group,
                record.scheduled_departure,
                record.clone(),
            )
        })
        .collect();

    decorated.sort_by(|a, b| {
        let forward = (a.0, a.1, &a.2, a.3).cmp(&(b.0, b.1, &b.2, b.3));
        match direction {
            SortDirection::Ascending => forward,
            SortDirection::Descending => forward.reverse(),
        }
    });

    decorated.into_iter().map(|entry| entry.4).collect()
}
