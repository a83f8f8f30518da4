//! Downstream substitution propagation.
//!
//! When a dispatcher substitutes a vehicle or crew member on one trip,
//! the remaining trips of the same duty usually need the same change.
//! The resolver scans forward from the edited anchor through the
//! already-ordered roster and collects every later trip of the same
//! service worked by the same original crew member. The target set is
//! ephemeral — it is recomputed each time a substitution is proposed,
//! never stored.

use crate::error::{Error, Result};
use crate::models::{CrewMember, TripEdit, TripId, TripRecord};
use crate::session::EditSession;
use crate::util::normalize_text_option;

/// Which roster field family a substitution touches. Vehicle and driver
/// substitutions follow the driver's duty chain; conductor substitutions
/// follow the conductor's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionKind {
    Vehicle,
    Driver,
    Conductor,
}

/// A proposed substitution for an anchor trip and its downstream targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution {
    /// Assign a different vehicle.
    Vehicle { number: String },
    /// Replace the driver, with a mandatory note and an optional vehicle
    /// change riding along.
    Driver {
        member: CrewMember,
        note: String,
        vehicle_number: Option<String>,
    },
    /// Replace the conductor, with a mandatory note and an optional
    /// vehicle change riding along.
    Conductor {
        member: CrewMember,
        note: String,
        vehicle_number: Option<String>,
    },
}

impl Substitution {
    #[must_use]
    pub const fn kind(&self) -> SubstitutionKind {
        match self {
            Self::Vehicle { .. } => SubstitutionKind::Vehicle,
            Self::Driver { .. } => SubstitutionKind::Driver,
            Self::Conductor { .. } => SubstitutionKind::Conductor,
        }
    }
}

fn matching_badge(record: &TripRecord, kind: SubstitutionKind) -> Option<String> {
    match kind {
        SubstitutionKind::Vehicle | SubstitutionKind::Driver => {
            normalize_text_option(Some(record.driver.badge.as_str()))
        }
        SubstitutionKind::Conductor => record
            .conductor
            .as_ref()
            .and_then(|member| normalize_text_option(Some(member.badge.as_str()))),
    }
}

/// Whether the candidate's scheduled departure is not earlier than the
/// anchor's. An anchor without a scheduled time admits everything; a
/// candidate without one is only admitted by such an anchor.
fn departs_at_or_after(anchor: &TripRecord, candidate: &TripRecord) -> bool {
    match (anchor.scheduled_departure, candidate.scheduled_departure) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(anchor_at), Some(candidate_at)) => candidate_at >= anchor_at,
    }
}

/// Finds the trips downstream of `anchor_id` that should receive the same
/// substitution.
///
/// `ordered` must already be in roster order (see
/// [`crate::ordering::sort_records`]). Candidates are taken strictly
/// after the anchor's position, must share the anchor's service number
/// and original badge for the relevant role, and must not be scheduled
/// earlier than the anchor. Returns an empty set when the anchor is
/// absent from `ordered` or lacks a service number or badge.
#[must_use]
pub fn find_downstream_targets(
    anchor_id: TripId,
    ordered: &[TripRecord],
    kind: SubstitutionKind,
) -> Vec<TripId> {
    let Some(position) = ordered.iter().position(|record| record.id == anchor_id) else {
        return Vec::new();
    };
    let anchor = &ordered[position];
    let Some(service) = normalize_text_option(anchor.service_number.as_deref()) else {
        return Vec::new();
    };
    let Some(badge) = matching_badge(anchor, kind) else {
        return Vec::new();
    };

    ordered[position + 1..]
        .iter()
        .filter(|candidate| {
            normalize_text_option(candidate.service_number.as_deref()).as_deref()
                == Some(service.as_str())
                && matching_badge(candidate, kind).as_deref() == Some(badge.as_str())
                && departs_at_or_after(anchor, candidate)
        })
        .map(|candidate| candidate.id)
        .collect()
}

fn substitution_edits(substitution: &Substitution) -> Result<Vec<TripEdit>> {
    match substitution {
        Substitution::Vehicle { number } => {
            let Some(number) = normalize_text_option(Some(number.as_str())) else {
                return Err(Error::Validation(
                    "vehicle substitution requires a vehicle number".to_string(),
                ));
            };
            Ok(vec![TripEdit::VehicleNumber(Some(number))])
        }
        Substitution::Driver {
            member,
            note,
            vehicle_number,
        } => {
            let Some(note) = normalize_text_option(Some(note.as_str())) else {
                return Err(Error::Validation(
                    "driver substitution requires a note".to_string(),
                ));
            };
            let mut edits = vec![
                TripEdit::SubstituteDriverName(normalize_text_option(Some(member.name.as_str()))),
                TripEdit::SubstituteDriverBadge(normalize_text_option(Some(member.badge.as_str()))),
                TripEdit::DriverNote(Some(note)),
            ];
            if let Some(number) = normalize_text_option(vehicle_number.as_deref()) {
                edits.push(TripEdit::VehicleNumber(Some(number)));
            }
            Ok(edits)
        }
        Substitution::Conductor {
            member,
            note,
            vehicle_number,
        } => {
            let Some(note) = normalize_text_option(Some(note.as_str())) else {
                return Err(Error::Validation(
                    "conductor substitution requires a note".to_string(),
                ));
            };
            let mut edits = vec![
                TripEdit::SubstituteConductorName(normalize_text_option(Some(member.name.as_str()))),
                TripEdit::SubstituteConductorBadge(normalize_text_option(Some(member.badge.as_str()))),
                TripEdit::ConductorNote(Some(note)),
            ];
            if let Some(number) = normalize_text_option(vehicle_number.as_deref()) {
                edits.push(TripEdit::VehicleNumber(Some(number)));
            }
            Ok(edits)
        }
    }
}

/// Applies a substitution to the anchor and every downstream target,
/// returning the touched ids with the anchor first.
///
/// Validation runs before anything is mutated: a crew substitution
/// without a note, or a vehicle substitution without a number, is
/// rejected and the session is left untouched.
pub fn apply_substitution(
    session: &mut EditSession,
    ordered: &[TripRecord],
    anchor_id: TripId,
    substitution: &Substitution,
) -> Result<Vec<TripId>> {
    let edits = substitution_edits(substitution)?;
    let targets = find_downstream_targets(anchor_id, ordered, substitution.kind());

    let mut touched = Vec::with_capacity(targets.len() + 1);
    touched.push(anchor_id);
    touched.extend(targets);
    for id in &touched {
        for edit in &edits {
            session.apply_edit(*id, edit.clone())?;
        }
    }
    Ok(touched)
}
