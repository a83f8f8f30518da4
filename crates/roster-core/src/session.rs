//! In-memory editing session over one day's roster.
//!
//! A session holds the working copy of every loaded trip plus an
//! immutable snapshot captured at load time. All edits go through
//! [`EditSession::apply_edit`]; change detection compares the working
//! copy against the snapshot (see [`crate::diff`]).

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use crate::diff::{AdjustmentPatch, PropagablePatch};
use crate::error::{Error, Result};
use crate::models::{RosterFilters, TripEdit, TripId, TripRecord};
use crate::util::normalize_text_option;

/// Working state for one reference date under one set of filters.
#[derive(Debug, Clone)]
pub struct EditSession {
    reference_date: NaiveDate,
    filters: RosterFilters,
    current: Vec<TripRecord>,
    snapshot: HashMap<TripId, TripRecord>,
}

impl EditSession {
    /// Opens a session over freshly loaded records, capturing them as the
    /// pristine snapshot.
    #[must_use]
    pub fn new(reference_date: NaiveDate, filters: RosterFilters, records: Vec<TripRecord>) -> Self {
        let snapshot = records
            .iter()
            .map(|record| (record.id, record.clone()))
            .collect();
        Self {
            reference_date,
            filters,
            current: records,
            snapshot,
        }
    }

    #[must_use]
    pub const fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    #[must_use]
    pub const fn filters(&self) -> &RosterFilters {
        &self.filters
    }

    /// The working copies, in load order.
    #[must_use]
    pub fn records(&self) -> &[TripRecord] {
        &self.current
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// The working copy of one record.
    #[must_use]
    pub fn record(&self, id: TripId) -> Option<&TripRecord> {
        self.current.iter().find(|record| record.id == id)
    }

    /// The pristine copy captured at load time.
    #[must_use]
    pub fn snapshot_of(&self, id: TripId) -> Option<&TripRecord> {
        self.snapshot.get(&id)
    }

    /// Applies one field edit to the working copy.
    ///
    /// Unknown ids are a no-op. Confirming a trip requires a vehicle
    /// number on the working copy and stamps the confirmation instant;
    /// unconfirming clears it.
    pub fn apply_edit(&mut self, id: TripId, edit: TripEdit) -> Result<()> {
        let Some(record) = self.current.iter_mut().find(|record| record.id == id) else {
            return Ok(());
        };
        match edit {
            TripEdit::VehicleNumber(value) => record.vehicle_number = value,
            TripEdit::SubstituteDriverName(value) => record.substitute_driver_name = value,
            TripEdit::SubstituteDriverBadge(value) => record.substitute_driver_badge = value,
            TripEdit::SubstituteConductorName(value) => record.substitute_conductor_name = value,
            TripEdit::SubstituteConductorBadge(value) => record.substitute_conductor_badge = value,
            TripEdit::DriverNote(value) => record.driver_note = value,
            TripEdit::ConductorNote(value) => record.conductor_note = value,
            TripEdit::AdjustedDeparture(value) => record.adjusted_departure = value,
            TripEdit::AdjustedArrival(value) => record.adjusted_arrival = value,
            TripEdit::DelayReason(value) => record.delay_reason = value,
            TripEdit::DelayNote(value) => record.delay_note = value,
            TripEdit::Confirmed(true) => {
                if normalize_text_option(record.vehicle_number.as_deref()).is_none() {
                    return Err(Error::Validation(format!(
                        "cannot confirm trip {id}: no vehicle number assigned"
                    )));
                }
                record.confirmed = true;
                record.confirmed_at = Some(Utc::now());
            }
            TripEdit::Confirmed(false) => {
                record.confirmed = false;
                record.confirmed_at = None;
            }
        }
        Ok(())
    }

    /// Reverts every working copy to its snapshot, keeping roster order.
    pub fn discard_all(&mut self) {
        for record in &mut self.current {
            if let Some(pristine) = self.snapshot.get(&record.id) {
                *record = pristine.clone();
            }
        }
    }

    /// After a server acknowledged a propagable write, folds the patched
    /// fields into the snapshot so they stop counting as dirty.
    pub fn merge_committed_propagable(&mut self, id: TripId, patch: &PropagablePatch) {
        let Some(snapshot) = self.snapshot.get_mut(&id) else {
            return;
        };
        if let Some(value) = &patch.vehicle_number {
            snapshot.vehicle_number = value.clone();
        }
        if let Some(value) = &patch.substitute_driver_name {
            snapshot.substitute_driver_name = value.clone();
        }
        if let Some(value) = &patch.substitute_driver_badge {
            snapshot.substitute_driver_badge = value.clone();
        }
        if let Some(value) = &patch.substitute_conductor_name {
            snapshot.substitute_conductor_name = value.clone();
        }
        if let Some(value) = &patch.substitute_conductor_badge {
            snapshot.substitute_conductor_badge = value.clone();
        }
        if let Some(value) = &patch.driver_note {
            snapshot.driver_note = value.clone();
        }
        if let Some(value) = &patch.conductor_note {
            snapshot.conductor_note = value.clone();
        }
    }

    /// After a server acknowledged an adjustment write, folds the patched
    /// fields into the snapshot so they stop counting as dirty.
    pub fn merge_committed_adjustment(&mut self, id: TripId, patch: &AdjustmentPatch) {
        let Some(snapshot) = self.snapshot.get_mut(&id) else {
            return;
        };
        if let Some(confirmed) = patch.confirmed {
            snapshot.confirmed = confirmed;
            snapshot.confirmed_at = self
                .current
                .iter()
                .find(|record| record.id == id)
                .and_then(|record| record.confirmed_at);
        }
        if let Some(value) = patch.adjusted_departure {
            snapshot.adjusted_departure = value;
        }
        if let Some(value) = patch.adjusted_arrival {
            snapshot.adjusted_arrival = value;
        }
        if let Some(reason) = patch.delay_reason {
            snapshot.delay_reason = Some(reason.as_code().to_string());
        }
        if let Some(value) = &patch.delay_note {
            snapshot.delay_note = value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::diff;
    use crate::models::CrewMember;

    fn record() -> TripRecord {
        TripRecord {
            id: TripId::new(),
            reference_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            service_number: Some("12".to_string()),
            line_code: "0205".to_string(),
            line_name: "Harbor Loop".to_string(),
            sector: "SOUTH".to_string(),
            direction: "INBOUND".to_string(),
            scheduled_departure: "2025-03-10T06:30:00Z".parse().ok(),
            scheduled_arrival: "2025-03-10T07:10:00Z".parse().ok(),
            driver: CrewMember::new("Ana Reyes", "2201"),
            conductor: None,
            vehicle_number: None,
            substitute_driver_name: None,
            substitute_driver_badge: None,
            substitute_conductor_name: None,
            substitute_conductor_badge: None,
            driver_note: None,
            conductor_note: None,
            adjusted_departure: None,
            adjusted_arrival: None,
            delay_reason: None,
            delay_note: None,
            confirmed: false,
            confirmed_at: None,
        }
    }

    fn session() -> (EditSession, TripId) {
        let r = record();
        let id = r.id;
        (
            EditSession::new(r.reference_date, RosterFilters::default(), vec![r]),
            id,
        )
    }

    #[test]
    fn unknown_id_edit_is_a_noop() {
        let (mut session, _) = session();
        session
            .apply_edit(TripId::new(), TripEdit::DriverNote(Some("x".to_string())))
            .unwrap();
        assert_eq!(diff::count_dirty(&session), 0);
    }

    #[test]
    fn confirm_without_vehicle_is_rejected() {
        let (mut session, id) = session();
        let err = session.apply_edit(id, TripEdit::Confirmed(true)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(!session.record(id).unwrap().confirmed);
    }

    #[test]
    fn confirm_with_vehicle_stamps_the_instant() {
        let (mut session, id) = session();
        session
            .apply_edit(id, TripEdit::VehicleNumber(Some("40125".to_string())))
            .unwrap();
        session.apply_edit(id, TripEdit::Confirmed(true)).unwrap();

        let record = session.record(id).unwrap();
        assert!(record.confirmed);
        assert!(record.confirmed_at.is_some());
    }

    #[test]
    fn unconfirm_clears_the_instant() {
        let (mut session, id) = session();
        session
            .apply_edit(id, TripEdit::VehicleNumber(Some("40125".to_string())))
            .unwrap();
        session.apply_edit(id, TripEdit::Confirmed(true)).unwrap();
        session.apply_edit(id, TripEdit::Confirmed(false)).unwrap();

        let record = session.record(id).unwrap();
        assert!(!record.confirmed);
        assert_eq!(record.confirmed_at, None);
    }

    #[test]
    fn discard_all_reverts_to_snapshot() {
        let (mut session, id) = session();
        session
            .apply_edit(id, TripEdit::VehicleNumber(Some("40125".to_string())))
            .unwrap();
        session
            .apply_edit(id, TripEdit::DelayNote(Some("late pull-out".to_string())))
            .unwrap();
        assert_eq!(diff::count_dirty(&session), 1);

        session.discard_all();
        assert_eq!(diff::count_dirty(&session), 0);
        assert_eq!(session.record(id).unwrap().vehicle_number, None);
    }

    #[test]
    fn merging_a_committed_patch_cleans_the_record() {
        let (mut session, id) = session();
        session
            .apply_edit(id, TripEdit::VehicleNumber(Some("40125".to_string())))
            .unwrap();
        let patch = diff::diff_item(&session, id).unwrap().propagable;
        session.merge_committed_propagable(id, &patch);
        assert!(!diff::is_dirty(&session, id));
    }
}
