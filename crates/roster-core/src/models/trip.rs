//! Trip record model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a trip control record, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripId(Uuid);

impl TripId {
    /// Create a new unique trip ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for TripId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TripId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TripId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A crew member as recorded by the external scheduling source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Full name
    pub name: String,
    /// Personnel badge identifier
    pub badge: String,
}

impl CrewMember {
    /// Create a crew member from name and badge
    pub fn new(name: impl Into<String>, badge: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            badge: badge.into(),
        }
    }
}

/// Closed set of delay reasons accepted by the scheduling backend.
///
/// Anything outside this set is stripped from update payloads before
/// submission; it is never sent and never treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelayReason {
    /// Heavy traffic on the route
    Traffic,
    /// Road accident
    Accident,
    /// Vehicle breakdown or defect
    Breakdown,
    /// Any other reason, detailed in the delay note
    Other,
}

impl DelayReason {
    /// Parse a wire code into a delay reason.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Returns `None` for anything outside the closed set.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "TRAFFIC" => Some(Self::Traffic),
            "ACCIDENT" => Some(Self::Accident),
            "BREAKDOWN" => Some(Self::Breakdown),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }

    /// Every accepted reason, in reporting order.
    pub const ALL: [Self; 4] = [Self::Traffic, Self::Accident, Self::Breakdown, Self::Other];

    /// The wire code for this reason
    #[must_use]
    pub const fn as_code(self) -> &'static str {
        match self {
            Self::Traffic => "TRAFFIC",
            Self::Accident => "ACCIDENT",
            Self::Breakdown => "BREAKDOWN",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for DelayReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// One scheduled trip for a reference date.
///
/// Synced fields come from the external scheduling source and are never
/// overwritten locally. Edited fields are the propagable track; adjustment
/// fields apply only to this record and never cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    /// Unique identifier of the control record
    pub id: TripId,
    /// Reference date of the roster this trip belongs to
    pub reference_date: NaiveDate,
    /// Duty/service number; trips on the same service form a duty chain
    pub service_number: Option<String>,
    /// Line code (e.g. "0100")
    pub line_code: String,
    /// Line display name
    pub line_name: String,
    /// Operating sector of the line
    pub sector: String,
    /// Direction of travel as sent by the feed
    pub direction: String,

    /// Scheduled departure instant; `None` when the feed omitted it
    pub scheduled_departure: Option<DateTime<Utc>>,
    /// Scheduled arrival instant
    pub scheduled_arrival: Option<DateTime<Utc>>,
    /// Driver originally rostered by the scheduling source
    pub driver: CrewMember,
    /// Conductor originally rostered; driver-only trips have none
    pub conductor: Option<CrewMember>,

    /// Assigned vehicle number (propagable edit)
    pub vehicle_number: Option<String>,
    /// Substitute driver name (propagable edit)
    pub substitute_driver_name: Option<String>,
    /// Substitute driver badge (propagable edit)
    pub substitute_driver_badge: Option<String>,
    /// Substitute conductor name (propagable edit)
    pub substitute_conductor_name: Option<String>,
    /// Substitute conductor badge (propagable edit)
    pub substitute_conductor_badge: Option<String>,
    /// Driver-facing free-text note (propagable edit)
    pub driver_note: Option<String>,
    /// Conductor-facing free-text note (propagable edit)
    pub conductor_note: Option<String>,

    /// Adjusted departure; overrides the scheduled instant for display and
    /// ordering but never replaces it
    pub adjusted_departure: Option<DateTime<Utc>>,
    /// Adjusted arrival
    pub adjusted_arrival: Option<DateTime<Utc>>,
    /// Delay reason code as stored; validated against [`DelayReason`] only
    /// when building update payloads
    pub delay_reason: Option<String>,
    /// Free-text delay note
    pub delay_note: Option<String>,
    /// Dispatcher confirmation flag
    pub confirmed: bool,
    /// When the trip was confirmed; view layers derive visibility from this
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl TripRecord {
    /// Departure instant used for display and ordering: the adjusted
    /// instant when present, otherwise the scheduled one.
    #[must_use]
    pub const fn effective_departure(&self) -> Option<DateTime<Utc>> {
        match self.adjusted_departure {
            Some(instant) => Some(instant),
            None => self.scheduled_departure,
        }
    }

    /// Arrival counterpart of [`Self::effective_departure`].
    #[must_use]
    pub const fn effective_arrival(&self) -> Option<DateTime<Utc>> {
        match self.adjusted_arrival {
            Some(instant) => Some(instant),
            None => self.scheduled_arrival,
        }
    }

    /// Trip duration in minutes, from the effective instants.
    #[must_use]
    pub fn duration_minutes(&self) -> Option<i64> {
        let departure = self.effective_departure()?;
        let arrival = self.effective_arrival()?;
        Some(arrival.signed_duration_since(departure).num_minutes())
    }

    /// True when any edited (propagable) field carries a non-empty value.
    #[must_use]
    pub fn has_local_edits(&self) -> bool {
        [
            &self.vehicle_number,
            &self.substitute_driver_name,
            &self.substitute_driver_badge,
            &self.substitute_conductor_name,
            &self.substitute_conductor_badge,
            &self.driver_note,
            &self.conductor_note,
        ]
        .into_iter()
        .any(|field| {
            field
                .as_deref()
                .is_some_and(|value| !value.trim().is_empty())
        })
    }
}

/// A typed local edit applied to one trip record.
///
/// `None` / empty payloads clear the field. The stringly-typed
/// field/value pairs of the upstream UI map onto these variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripEdit {
    /// Assign or clear the vehicle number
    VehicleNumber(Option<String>),
    /// Substitute driver name
    SubstituteDriverName(Option<String>),
    /// Substitute driver badge
    SubstituteDriverBadge(Option<String>),
    /// Substitute conductor name
    SubstituteConductorName(Option<String>),
    /// Substitute conductor badge
    SubstituteConductorBadge(Option<String>),
    /// Driver-facing note
    DriverNote(Option<String>),
    /// Conductor-facing note
    ConductorNote(Option<String>),
    /// Adjusted departure instant
    AdjustedDeparture(Option<DateTime<Utc>>),
    /// Adjusted arrival instant
    AdjustedArrival(Option<DateTime<Utc>>),
    /// Delay reason code (raw; validated when payloads are built)
    DelayReason(Option<String>),
    /// Free-text delay note
    DelayNote(Option<String>),
    /// Confirmation flag; `true` requires a non-empty vehicle number
    Confirmed(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TripRecord {
        TripRecord {
            id: TripId::new(),
            reference_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            service_number: Some("05".to_string()),
            line_code: "0100".to_string(),
            line_name: "Central - Terminal North".to_string(),
            sector: "NORTH".to_string(),
            direction: "OUTBOUND".to_string(),
            scheduled_departure: "2025-03-10T08:00:00Z".parse().ok(),
            scheduled_arrival: "2025-03-10T08:45:00Z".parse().ok(),
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
    fn delay_reason_round_trips_codes() {
        for code in ["TRAFFIC", "ACCIDENT", "BREAKDOWN", "OTHER"] {
            let reason = DelayReason::from_code(code).expect("closed-set code");
            assert_eq!(reason.as_code(), code);
        }
    }

    #[test]
    fn delay_reason_rejects_unknown_codes() {
        assert_eq!(DelayReason::from_code("WEATHER"), None);
        assert_eq!(DelayReason::from_code(""), None);
        assert_eq!(DelayReason::from_code(" traffic "), Some(DelayReason::Traffic));
    }

    #[test]
    fn duration_uses_effective_instants() {
        let mut trip = record();
        assert_eq!(trip.duration_minutes(), Some(45));

        trip.adjusted_departure = "2025-03-10T08:10:00Z".parse().ok();
        assert_eq!(trip.duration_minutes(), Some(35));
    }

    #[test]
    fn has_local_edits_ignores_whitespace() {
        let mut trip = record();
        assert!(!trip.has_local_edits());

        trip.driver_note = Some("   ".to_string());
        assert!(!trip.has_local_edits());

        trip.vehicle_number = Some("40125".to_string());
        assert!(trip.has_local_edits());
    }

    #[test]
    fn trip_id_parses_its_display_form() {
        let id = TripId::new();
        let parsed: TripId = id.as_str().parse().expect("round trip");
        assert_eq!(parsed, id);
    }
}
