use chrono::{NaiveDate, TimeZone, Utc};
use clap::Parser;
use pretty_assertions::assert_eq;
use roster_core::{CrewMember, Role, TripId, TripRecord};

use crate::cli::{Cli, FilterArgs};
use crate::commands::common::{
    format_time, format_trip_line, parse_instant, parse_reason, parse_trip_id, resolve_actor,
    to_filters,
};
use crate::error::CliError;

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

#[test]
fn parse_instant_accepts_rfc3339() {
    let instant = parse_instant(reference_date(), "2025-03-10T08:30:00Z").unwrap();
    assert_eq!(instant, Utc.with_ymd_and_hms(2025, 3, 10, 8, 30, 0).unwrap());
}

#[test]
fn parse_instant_anchors_clock_times_to_the_date() {
    let instant = parse_instant(reference_date(), "06:45").unwrap();
    assert_eq!(instant, Utc.with_ymd_and_hms(2025, 3, 10, 6, 45, 0).unwrap());
}

#[test]
fn parse_instant_rejects_garbage() {
    assert!(matches!(
        parse_instant(reference_date(), "quarter past"),
        Err(CliError::InvalidInstant(_))
    ));
}

#[test]
fn parse_reason_is_case_insensitive() {
    assert_eq!(parse_reason(" breakdown ").unwrap().as_code(), "BREAKDOWN");
    assert!(matches!(
        parse_reason("WEATHER"),
        Err(CliError::UnknownDelayReason(_))
    ));
}

#[test]
fn parse_trip_id_round_trips() {
    let id = TripId::new();
    assert_eq!(parse_trip_id(&id.to_string()).unwrap(), id);
    assert!(matches!(
        parse_trip_id("not-a-uuid"),
        Err(CliError::InvalidTripId(_))
    ));
}

#[test]
fn filters_map_only_what_was_given() {
    let args = FilterArgs {
        sector: Some("NORTH".to_string()),
        lines: vec!["0100".to_string(), "0205".to_string()],
        edited_only: true,
        ..FilterArgs::default()
    };
    let filters = to_filters(&args);
    assert_eq!(filters.sector.as_deref(), Some("NORTH"));
    assert_eq!(filters.line_codes.len(), 2);
    assert_eq!(filters.edited_only, Some(true));
    assert_eq!(filters.service_number, None);
    assert_eq!(filters.search_text, None);
}

#[test]
fn every_filter_criterion_has_a_flag() {
    let args = FilterArgs {
        sector: Some("NORTH".to_string()),
        lines: vec!["0100".to_string()],
        service: Some("05".to_string()),
        direction: Some("OUTBOUND".to_string()),
        driver_name: Some("Prentice".to_string()),
        driver_badge: Some("1234".to_string()),
        origin: Some("Depot".to_string()),
        destination: Some("Terminal".to_string()),
        edited_only: true,
        search: Some("central".to_string()),
    };
    let filters = to_filters(&args);
    assert_eq!(filters.direction.as_deref(), Some("OUTBOUND"));
    assert_eq!(filters.driver_name.as_deref(), Some("Prentice"));
    assert_eq!(filters.origin.as_deref(), Some("Depot"));
    assert_eq!(filters.destination.as_deref(), Some("Terminal"));
    assert_eq!(filters.search_text.as_deref(), Some("central"));
}

#[test]
fn substitute_rejects_driver_and_conductor_together() {
    let result = Cli::try_parse_from([
        "roster",
        "substitute",
        "2025-03-10",
        "0195f2a0-0000-7000-8000-000000000001",
        "--driver-name",
        "Relief Driver",
        "--driver-badge",
        "8800",
        "--conductor-name",
        "Relief Conductor",
        "--conductor-badge",
        "7700",
        "--note",
        "double cover",
    ]);
    assert!(result.is_err());
}

#[test]
fn substitute_accepts_a_single_crew_role() {
    let result = Cli::try_parse_from([
        "roster",
        "substitute",
        "2025-03-10",
        "0195f2a0-0000-7000-8000-000000000001",
        "--conductor-name",
        "Relief Conductor",
        "--conductor-badge",
        "7700",
        "--note",
        "sick cover",
    ]);
    assert!(result.is_ok());
}

#[test]
fn resolve_actor_honors_the_role_flag() {
    let actor = resolve_actor(Some("analyst".to_string())).unwrap();
    assert_eq!(actor.role, Role::Analyst);
    assert!(matches!(
        resolve_actor(Some("supervisor".to_string())),
        Err(CliError::UnknownRole(_))
    ));
}

#[test]
fn format_time_handles_unknown_instants() {
    assert_eq!(format_time(None), "--:--");
    assert_eq!(
        format_time(Some(Utc.with_ymd_and_hms(2025, 3, 10, 8, 5, 0).unwrap())),
        "08:05"
    );
}

#[test]
fn trip_line_shows_markers_for_state() {
    let record = TripRecord {
        id: TripId::new(),
        reference_date: reference_date(),
        service_number: Some("05".to_string()),
        line_code: "0100".to_string(),
        line_name: "Central".to_string(),
        sector: "NORTH".to_string(),
        direction: "OUTBOUND".to_string(),
        scheduled_departure: Some(Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()),
        scheduled_arrival: None,
        driver: CrewMember::new("John Prentice", "1234"),
        conductor: None,
        vehicle_number: Some("40125".to_string()),
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
        confirmed: true,
        confirmed_at: Some(Utc.with_ymd_and_hms(2025, 3, 10, 8, 50, 0).unwrap()),
    };

    let line = format_trip_line(&record, false);
    assert!(line.contains("08:00"));
    assert!(line.contains("veh 40125"));
    assert!(line.contains("[confirmed]"));
    assert!(line.contains("[edited]"));
    assert!(!line.ends_with('*'));
}
