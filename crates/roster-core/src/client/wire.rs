//! Wire representation of trips as served by the scheduling backend.
//!
//! The backend still stores the driver-facing and conductor-facing notes
//! as one combined string with inline `[DRV]`/`[CON]` markers. The
//! domain model keeps them as two fields, so splitting happens here at
//! the boundary; text without any marker belongs to the driver.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{CrewMember, TripRecord};
use crate::util::normalize_text_option;

/// One trip as fetched from the backend, before domain mapping.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTrip {
    pub id: Uuid,
    pub reference_date: NaiveDate,
    pub service_number: Option<String>,
    pub line_code: Option<String>,
    pub line_name: Option<String>,
    pub sector: Option<String>,
    pub direction: Option<String>,
    pub scheduled_departure: Option<DateTime<Utc>>,
    pub scheduled_arrival: Option<DateTime<Utc>>,
    pub driver_name: Option<String>,
    pub driver_badge: Option<String>,
    pub conductor_name: Option<String>,
    pub conductor_badge: Option<String>,
    pub vehicle_number: Option<String>,
    pub substitute_driver_name: Option<String>,
    pub substitute_driver_badge: Option<String>,
    pub substitute_conductor_name: Option<String>,
    pub substitute_conductor_badge: Option<String>,
    /// Combined note field with `[DRV]`/`[CON]` markers.
    pub notes: Option<String>,
    pub adjusted_departure: Option<DateTime<Utc>>,
    pub adjusted_arrival: Option<DateTime<Utc>>,
    pub delay_reason: Option<String>,
    pub delay_note: Option<String>,
    pub confirmed: bool,
    pub confirmed_at: Option<DateTime<Utc>>,
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[(DRV|CON)\]\s*").unwrap_or_else(|_| unreachable!("static pattern"))
    })
}

/// Splits a combined note string into (driver note, conductor note).
#[must_use]
pub fn split_notes(combined: &str) -> (Option<String>, Option<String>) {
    let mut driver_parts: Vec<&str> = Vec::new();
    let mut conductor_parts: Vec<&str> = Vec::new();

    let pattern = marker_pattern();
    let mut cursor = 0;
    let mut current_marker: Option<&str> = None;
    for found in pattern.captures_iter(combined) {
        let whole = found.get(0).map_or(0..0, |m| m.range());
        let segment = combined[cursor..whole.start].trim();
        if !segment.is_empty() {
            match current_marker {
                Some("CON") => conductor_parts.push(segment),
                _ => driver_parts.push(segment),
            }
        }
        current_marker = found.get(1).map(|m| m.as_str());
        cursor = whole.end;
    }
    let tail = combined[cursor..].trim();
    if !tail.is_empty() {
        match current_marker {
            Some("CON") => conductor_parts.push(tail),
            _ => driver_parts.push(tail),
        }
    }

    let joined = |parts: Vec<&str>| {
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    };
    (joined(driver_parts), joined(conductor_parts))
}

impl RawTrip {
    /// Maps the wire form into the domain record.
    #[must_use]
    pub fn into_record(self) -> TripRecord {
        let (driver_note, conductor_note) = self
            .notes
            .as_deref()
            .map_or((None, None), split_notes);

        let conductor_name = normalize_text_option(self.conductor_name.as_deref());
        let conductor_badge = normalize_text_option(self.conductor_badge.as_deref());
        let conductor = (conductor_name.is_some() || conductor_badge.is_some()).then(|| {
            CrewMember::new(
                conductor_name.unwrap_or_default(),
                conductor_badge.unwrap_or_default(),
            )
        });

        TripRecord {
            id: self.id.into(),
            reference_date: self.reference_date,
            service_number: normalize_text_option(self.service_number.as_deref()),
            line_code: self.line_code.unwrap_or_default(),
            line_name: self.line_name.unwrap_or_default(),
            sector: self.sector.unwrap_or_default(),
            direction: self.direction.unwrap_or_default(),
            scheduled_departure: self.scheduled_departure,
            scheduled_arrival: self.scheduled_arrival,
            driver: CrewMember::new(
                self.driver_name.unwrap_or_default(),
                self.driver_badge.unwrap_or_default(),
            ),
            conductor,
            vehicle_number: normalize_text_option(self.vehicle_number.as_deref()),
            substitute_driver_name: normalize_text_option(self.substitute_driver_name.as_deref()),
            substitute_driver_badge: normalize_text_option(self.substitute_driver_badge.as_deref()),
            substitute_conductor_name: normalize_text_option(
                self.substitute_conductor_name.as_deref(),
            ),
            substitute_conductor_badge: normalize_text_option(
                self.substitute_conductor_badge.as_deref(),
            ),
            driver_note,
            conductor_note,
            adjusted_departure: self.adjusted_departure,
            adjusted_arrival: self.adjusted_arrival,
            delay_reason: normalize_text_option(self.delay_reason.as_deref()),
            delay_note: normalize_text_option(self.delay_note.as_deref()),
            confirmed: self.confirmed,
            confirmed_at: self.confirmed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn unmarked_text_belongs_to_the_driver() {
        let (driver, conductor) = split_notes("left depot late");
        assert_eq!(driver.as_deref(), Some("left depot late"));
        assert_eq!(conductor, None);
    }

    #[test]
    fn markers_route_segments_to_each_role() {
        let (driver, conductor) = split_notes("[DRV] relief at terminal [CON] fare box jammed");
        assert_eq!(driver.as_deref(), Some("relief at terminal"));
        assert_eq!(conductor.as_deref(), Some("fare box jammed"));
    }

    #[test]
    fn repeated_markers_accumulate() {
        let (driver, conductor) = split_notes("[CON] first [DRV] middle [CON] second");
        assert_eq!(driver.as_deref(), Some("middle"));
        assert_eq!(conductor.as_deref(), Some("first second"));
    }

    #[test]
    fn blank_combined_note_maps_to_nothing() {
        assert_eq!(split_notes("   "), (None, None));
    }

    #[test]
    fn raw_trip_maps_into_a_record() {
        let raw: RawTrip = serde_json::from_value(serde_json::json!({
            "id": "018f4e9a-0000-7000-8000-000000000001",
            "reference_date": "2025-03-10",
            "service_number": " 05 ",
            "line_code": "0100",
            "line_name": "Central",
            "driver_name": "John Prentice",
            "driver_badge": "1234",
            "notes": "[DRV] took over at 8 [CON] short on change",
            "confirmed": true,
            "confirmed_at": "2025-03-10T09:00:00Z"
        }))
        .unwrap();

        let record = raw.into_record();
        assert_eq!(record.service_number.as_deref(), Some("05"));
        assert_eq!(record.driver.badge, "1234");
        assert_eq!(record.conductor, None);
        assert_eq!(record.driver_note.as_deref(), Some("took over at 8"));
        assert_eq!(record.conductor_note.as_deref(), Some("short on change"));
        assert!(record.confirmed);
    }
}
