//! Field-level change detection against the loaded snapshot.
//!
//! Comparison normalizes text first: values are trimmed and an empty
//! string is the same as an unset field. Differences split into two
//! tracks — propagable edits (vehicle, substitute crew, notes) that may
//! cascade downstream, and per-trip adjustments (times, delay reason,
//! confirmation) that never do.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{DelayReason, TripId, TripRecord};
use crate::session::EditSession;
use crate::util::normalize_text_option;

/// Changed propagable fields of one record. A field is present only when
/// it differs from the snapshot; an inner `None` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropagablePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitute_driver_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitute_driver_badge: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitute_conductor_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitute_conductor_badge: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_note: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conductor_note: Option<Option<String>>,
}

impl PropagablePatch {
    /// True when no field changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vehicle_number.is_none()
            && self.substitute_driver_name.is_none()
            && self.substitute_driver_badge.is_none()
            && self.substitute_conductor_name.is_none()
            && self.substitute_conductor_badge.is_none()
            && self.driver_note.is_none()
            && self.conductor_note.is_none()
    }
}

/// Changed adjustment fields of one record.
///
/// The delay reason is included only when the new value belongs to the
/// closed [`DelayReason`] set; anything else is dropped from the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdjustmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_departure: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_arrival: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_reason: Option<DelayReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_note: Option<Option<String>>,
}

impl AdjustmentPatch {
    /// True when no field changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.confirmed.is_none()
            && self.adjusted_departure.is_none()
            && self.adjusted_arrival.is_none()
            && self.delay_reason.is_none()
            && self.delay_note.is_none()
    }
}

/// The two-track difference of one record against its snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripDiff {
    /// Changes that may cascade to downstream trips
    pub propagable: PropagablePatch,
    /// Single-record changes
    pub adjustment: AdjustmentPatch,
}

impl TripDiff {
    /// True when the record matches its snapshot on both tracks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.propagable.is_empty() && self.adjustment.is_empty()
    }
}

/// Canonical form of a delay reason for comparison: known codes collapse
/// to their canonical spelling, unknown text is kept trimmed.
fn canonical_reason(value: Option<&str>) -> Option<String> {
    let value = normalize_text_option(value)?;
    Some(
        DelayReason::from_code(&value)
            .map_or(value, |reason| reason.as_code().to_string()),
    )
}

fn text_changed(current: Option<&str>, snapshot: Option<&str>) -> Option<Option<String>> {
    let current = normalize_text_option(current);
    let snapshot = normalize_text_option(snapshot);
    (current != snapshot).then_some(current)
}

fn diff_propagable(current: &TripRecord, snapshot: &TripRecord) -> PropagablePatch {
    PropagablePatch {
        vehicle_number: text_changed(
            current.vehicle_number.as_deref(),
            snapshot.vehicle_number.as_deref(),
        ),
        substitute_driver_name: text_changed(
            current.substitute_driver_name.as_deref(),
            snapshot.substitute_driver_name.as_deref(),
        ),
        substitute_driver_badge: text_changed(
            current.substitute_driver_badge.as_deref(),
            snapshot.substitute_driver_badge.as_deref(),
        ),
        substitute_conductor_name: text_changed(
            current.substitute_conductor_name.as_deref(),
            snapshot.substitute_conductor_name.as_deref(),
        ),
        substitute_conductor_badge: text_changed(
            current.substitute_conductor_badge.as_deref(),
            snapshot.substitute_conductor_badge.as_deref(),
        ),
        driver_note: text_changed(current.driver_note.as_deref(), snapshot.driver_note.as_deref()),
        conductor_note: text_changed(
            current.conductor_note.as_deref(),
            snapshot.conductor_note.as_deref(),
        ),
    }
}

fn diff_adjustment(current: &TripRecord, snapshot: &TripRecord) -> AdjustmentPatch {
    let reason_changed = canonical_reason(current.delay_reason.as_deref())
        != canonical_reason(snapshot.delay_reason.as_deref());
    AdjustmentPatch {
        confirmed: (current.confirmed != snapshot.confirmed).then_some(current.confirmed),
        adjusted_departure: (current.adjusted_departure != snapshot.adjusted_departure)
            .then_some(current.adjusted_departure),
        adjusted_arrival: (current.adjusted_arrival != snapshot.adjusted_arrival)
            .then_some(current.adjusted_arrival),
        delay_reason: reason_changed
            .then(|| {
                current
                    .delay_reason
                    .as_deref()
                    .and_then(DelayReason::from_code)
            })
            .flatten(),
        delay_note: text_changed(current.delay_note.as_deref(), snapshot.delay_note.as_deref()),
    }
}

/// Whether an adjustment field differs, including a delay reason that got
/// set to something outside the closed set (dirty, but never submitted).
fn adjustment_dirty(current: &TripRecord, snapshot: &TripRecord) -> bool {
    current.confirmed != snapshot.confirmed
        || current.adjusted_departure != snapshot.adjusted_departure
        || current.adjusted_arrival != snapshot.adjusted_arrival
        || normalize_text_option(current.delay_note.as_deref())
            != normalize_text_option(snapshot.delay_note.as_deref())
        || canonical_reason(current.delay_reason.as_deref())
            != canonical_reason(snapshot.delay_reason.as_deref())
}

/// True when the record with this id differs from its snapshot on either
/// track. Unknown ids are never dirty.
#[must_use]
pub fn is_dirty(session: &EditSession, id: TripId) -> bool {
    match (session.record(id), session.snapshot_of(id)) {
        (Some(current), Some(snapshot)) => {
            !diff_propagable(current, snapshot).is_empty() || adjustment_dirty(current, snapshot)
        }
        _ => false,
    }
}

/// Ids of all dirty records, in current roster order.
#[must_use]
pub fn dirty_ids(session: &EditSession) -> Vec<TripId> {
    session
        .records()
        .iter()
        .map(|record| record.id)
        .filter(|id| is_dirty(session, *id))
        .collect()
}

/// Number of dirty records.
#[must_use]
pub fn count_dirty(session: &EditSession) -> usize {
    dirty_ids(session).len()
}

/// The two-track diff of one record, or `None` when the id is unknown.
/// Both patches may be empty for a clean record.
#[must_use]
pub fn diff_item(session: &EditSession, id: TripId) -> Option<TripDiff> {
    let current = session.record(id)?;
    let snapshot = session.snapshot_of(id)?;
    Some(TripDiff {
        propagable: diff_propagable(current, snapshot),
        adjustment: diff_adjustment(current, snapshot),
    })
}
