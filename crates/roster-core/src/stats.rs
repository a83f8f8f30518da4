//! Daily roster summary figures.

use serde::Serialize;

use crate::diff;
use crate::models::DelayReason;
use crate::session::EditSession;

/// Headline counts for one loaded roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
    /// Trips carrying any propagable edit, committed or not.
    pub edited: usize,
    /// Trips whose working copy differs from the snapshot.
    pub dirty: usize,
    pub delayed: usize,
    pub by_delay_reason: Vec<DelayReasonCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelayReasonCount {
    pub reason: DelayReason,
    pub count: usize,
}

/// Computes the summary for the session's current working copies.
#[must_use]
pub fn compute(session: &EditSession) -> RosterStats {
    let mut stats = RosterStats {
        total: session.len(),
        dirty: diff::count_dirty(session),
        ..RosterStats::default()
    };

    let mut reason_counts = [0_usize; DelayReason::ALL.len()];
    for record in session.records() {
        if record.confirmed {
            stats.confirmed += 1;
        } else {
            stats.pending += 1;
        }
        if record.has_local_edits() {
            stats.edited += 1;
        }
        if let Some(reason) = record
            .delay_reason
            .as_deref()
            .and_then(DelayReason::from_code)
        {
            stats.delayed += 1;
            if let Some(slot) = DelayReason::ALL.iter().position(|known| *known == reason) {
                reason_counts[slot] += 1;
            }
        }
    }

    stats.by_delay_reason = DelayReason::ALL
        .iter()
        .zip(reason_counts)
        .filter(|(_, count)| *count > 0)
        .map(|(reason, count)| DelayReasonCount {
            reason: *reason,
            count,
        })
        .collect();
    stats
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{CrewMember, RosterFilters, TripEdit, TripId, TripRecord};

    fn record(confirmed: bool, delay_reason: Option<&str>) -> TripRecord {
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
            vehicle_number: confirmed.then(|| "40125".to_string()),
            substitute_driver_name: None,
            substitute_driver_badge: None,
            substitute_conductor_name: None,
            substitute_conductor_badge: None,
            driver_note: None,
            conductor_note: None,
            adjusted_departure: None,
            adjusted_arrival: None,
            delay_reason: delay_reason.map(str::to_string),
            delay_note: None,
            confirmed,
            confirmed_at: None,
        }
    }

    #[test]
    fn counts_cover_confirmation_delay_and_dirtiness() {
        let records = vec![
            record(true, Some("TRAFFIC")),
            record(false, Some("TRAFFIC")),
            record(false, Some("NOT_A_REASON")),
            record(false, None),
        ];
        let dirty_id = records[3].id;
        let mut session = EditSession::new(
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            RosterFilters::default(),
            records,
        );
        session
            .apply_edit(dirty_id, TripEdit::DriverNote(Some("held at depot".to_string())))
            .unwrap();

        let stats = compute(&session);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.confirmed, 1);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.dirty, 1);
        assert_eq!(stats.delayed, 2);
        assert_eq!(
            stats.by_delay_reason,
            vec![DelayReasonCount {
                reason: DelayReason::Traffic,
                count: 2
            }]
        );
    }
}
