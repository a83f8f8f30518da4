//! Ownership of the editing session and its backend client.
//!
//! The store loads one day's roster, keeps the session's working copies
//! in roster order, and funnels every local mutation through it. Commit
//! orchestration lives in [`crate::commit`], implemented on this type.

use chrono::NaiveDate;

use crate::client::RosterClient;
use crate::diff::{self, TripDiff};
use crate::error::{Error, Result};
use crate::models::{RosterFilters, TripEdit, TripId, TripRecord};
use crate::ordering::{self, SortDirection};
use crate::propagation::{self, Substitution};
use crate::session::EditSession;
use crate::util::normalize_text_option;

/// Owns one [`EditSession`] at a time and the client used to load and
/// commit it.
#[derive(Debug)]
pub struct RosterStore<C: RosterClient> {
    client: C,
    session: Option<EditSession>,
}

impl<C: RosterClient> RosterStore<C> {
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self {
            client,
            session: None,
        }
    }

    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Loads the roster for one date, replacing any existing session.
    /// Records are kept in operational order; all dirty state is cleared.
    pub async fn load(&mut self, date: NaiveDate, filters: RosterFilters) -> Result<&EditSession> {
        let records = self.client.fetch_roster(date, &filters).await?;
        let ordered = ordering::sort_records(&records, SortDirection::Ascending);
        tracing::info!(%date, trips = ordered.len(), "roster loaded");
        self.session = Some(EditSession::new(date, filters, ordered));
        Ok(self.session_ref()?)
    }

    /// The active session, or [`Error::NoSession`].
    pub fn session_ref(&self) -> Result<&EditSession> {
        self.session.as_ref().ok_or(Error::NoSession)
    }

    pub(crate) fn session_mut(&mut self) -> Result<&mut EditSession> {
        self.session.as_mut().ok_or(Error::NoSession)
    }

    /// Applies one field edit to the working copy. Purely in-memory.
    pub fn apply_edit(&mut self, id: TripId, edit: TripEdit) -> Result<()> {
        self.session_mut()?.apply_edit(id, edit)
    }

    /// Reverts every working copy to the loaded snapshot.
    pub fn discard_all(&mut self) -> Result<()> {
        self.session_mut()?.discard_all();
        Ok(())
    }

    /// Applies a substitution to the anchor trip and cascades it to the
    /// downstream trips of the same duty. Returns the touched ids with
    /// the anchor first.
    pub fn substitute(
        &mut self,
        anchor_id: TripId,
        substitution: &Substitution,
    ) -> Result<Vec<TripId>> {
        let ordered = self.session_ref()?.records().to_vec();
        propagation::apply_substitution(self.session_mut()?, &ordered, anchor_id, substitution)
    }

    /// Number of records that currently differ from the snapshot.
    pub fn dirty_count(&self) -> Result<usize> {
        Ok(diff::count_dirty(self.session_ref()?))
    }

    /// Ids of all dirty records, in roster order.
    pub fn dirty_ids(&self) -> Result<Vec<TripId>> {
        Ok(diff::dirty_ids(self.session_ref()?))
    }

    /// The two-track diff of one record against its snapshot.
    pub fn diff_item(&self, id: TripId) -> Result<Option<TripDiff>> {
        Ok(diff::diff_item(self.session_ref()?, id))
    }

    /// Reloads the session's date from the backend, then re-applies the
    /// edits of every record that was still dirty, so uncommitted work
    /// survives the refresh. Re-applied edits that no longer validate
    /// (a confirmation whose vehicle vanished server-side) are dropped.
    pub(crate) async fn reload_preserving_edits(&mut self) -> Result<()> {
        let session = self.session_ref()?;
        let date = session.reference_date();
        let filters = session.filters().clone();
        let carryover: Vec<(TripId, Vec<TripEdit>)> = diff::dirty_ids(session)
            .into_iter()
            .filter_map(|id| {
                let current = session.record(id)?;
                let snapshot = session.snapshot_of(id)?;
                Some((id, carryover_edits(current, snapshot)))
            })
            .collect();

        self.load(date, filters).await?;
        let session = self.session_mut()?;
        for (id, edits) in carryover {
            for edit in edits {
                if let Err(error) = session.apply_edit(id, edit) {
                    tracing::warn!(%id, %error, "dropping carried-over edit after reload");
                }
            }
        }
        Ok(())
    }
}

fn push_text_edit(
    edits: &mut Vec<TripEdit>,
    current: Option<&str>,
    snapshot: Option<&str>,
    make: fn(Option<String>) -> TripEdit,
) {
    let current = normalize_text_option(current);
    if current != normalize_text_option(snapshot) {
        edits.push(make(current));
    }
}

/// Edits that reproduce `current`'s divergence from `snapshot` on a
/// freshly loaded record.
fn carryover_edits(current: &TripRecord, snapshot: &TripRecord) -> Vec<TripEdit> {
    let mut edits = Vec::new();
    push_text_edit(
        &mut edits,
        current.vehicle_number.as_deref(),
        snapshot.vehicle_number.as_deref(),
        TripEdit::VehicleNumber,
    );
    push_text_edit(
        &mut edits,
        current.substitute_driver_name.as_deref(),
        snapshot.substitute_driver_name.as_deref(),
        TripEdit::SubstituteDriverName,
    );
    push_text_edit(
        &mut edits,
        current.substitute_driver_badge.as_deref(),
        snapshot.substitute_driver_badge.as_deref(),
        TripEdit::SubstituteDriverBadge,
    );
    push_text_edit(
        &mut edits,
        current.substitute_conductor_name.as_deref(),
        snapshot.substitute_conductor_name.as_deref(),
        TripEdit::SubstituteConductorName,
    );
    push_text_edit(
        &mut edits,
        current.substitute_conductor_badge.as_deref(),
        snapshot.substitute_conductor_badge.as_deref(),
        TripEdit::SubstituteConductorBadge,
    );
    push_text_edit(
        &mut edits,
        current.driver_note.as_deref(),
        snapshot.driver_note.as_deref(),
        TripEdit::DriverNote,
    );
    push_text_edit(
        &mut edits,
        current.conductor_note.as_deref(),
        snapshot.conductor_note.as_deref(),
        TripEdit::ConductorNote,
    );
    push_text_edit(
        &mut edits,
        current.delay_reason.as_deref(),
        snapshot.delay_reason.as_deref(),
        TripEdit::DelayReason,
    );
    push_text_edit(
        &mut edits,
        current.delay_note.as_deref(),
        snapshot.delay_note.as_deref(),
        TripEdit::DelayNote,
    );
    if current.adjusted_departure != snapshot.adjusted_departure {
        edits.push(TripEdit::AdjustedDeparture(current.adjusted_departure));
    }
    if current.adjusted_arrival != snapshot.adjusted_arrival {
        edits.push(TripEdit::AdjustedArrival(current.adjusted_arrival));
    }
    if current.confirmed != snapshot.confirmed {
        edits.push(TripEdit::Confirmed(current.confirmed));
    }
    edits
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::CrewMember;

    fn record() -> TripRecord {
        TripRecord {
            id: TripId::new(),
            reference_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            service_number: Some("05".to_string()),
            line_code: "0100".to_string(),
            line_name: "Central".to_string(),
            sector: "NORTH".to_string(),
            direction: "OUTBOUND".to_string(),
            scheduled_departure: "2025-03-10T08:00:00Z".parse().ok(),
            scheduled_arrival: None,
            driver: CrewMember::new("John Prentice", "1234"),
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

    #[test]
    fn carryover_reproduces_changed_fields_only() {
        let snapshot = record();
        let mut current = snapshot.clone();
        current.vehicle_number = Some("40125".to_string());
        current.delay_note = Some("pull-out delayed".to_string());

        let edits = carryover_edits(&current, &snapshot);
        assert_eq!(
            edits,
            vec![
                TripEdit::VehicleNumber(Some("40125".to_string())),
                TripEdit::DelayNote(Some("pull-out delayed".to_string())),
            ]
        );
    }

    #[test]
    fn carryover_of_a_clean_record_is_empty() {
        let snapshot = record();
        assert!(carryover_edits(&snapshot.clone(), &snapshot).is_empty());
    }
}
