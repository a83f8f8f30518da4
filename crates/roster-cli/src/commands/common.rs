//! Shared plumbing for the roster commands.

use std::env;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use roster_core::{
    Actor, CommitReport, DelayReason, HttpRosterClient, Role, RosterFilters, RosterStore, TripId,
    TripRecord, WriteOutcome,
};

use crate::cli::FilterArgs;
use crate::error::CliError;

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn resolve_endpoint(flag: Option<String>) -> Result<String, CliError> {
    flag.or_else(|| env_value("ROSTER_API_URL"))
        .ok_or(CliError::MissingEndpoint)
}

pub fn resolve_token(flag: Option<String>) -> Option<String> {
    flag.or_else(|| env_value("ROSTER_API_TOKEN"))
}

/// Builds the acting identity from flags and environment. The backend
/// re-checks permissions; the role here only gates what we attempt.
pub fn resolve_actor(role_flag: Option<String>) -> Result<Actor, CliError> {
    let role = match role_flag.or_else(|| env_value("ROSTER_ROLE")) {
        Some(raw) => raw.parse::<Role>().map_err(CliError::UnknownRole)?,
        None => Role::Dispatcher,
    };
    let name = env_value("ROSTER_ACTOR_NAME").unwrap_or_else(|| "roster-cli".to_string());
    let email =
        env_value("ROSTER_ACTOR_EMAIL").unwrap_or_else(|| "roster-cli@localhost".to_string());
    Ok(Actor::new(name, email, role))
}

pub fn build_store(
    endpoint: Option<String>,
    token: Option<String>,
) -> Result<RosterStore<HttpRosterClient>, CliError> {
    let endpoint = resolve_endpoint(endpoint)?;
    let mut client = HttpRosterClient::new(endpoint)?;
    if let Some(token) = resolve_token(token) {
        client = client.with_bearer_token(token);
    }
    Ok(RosterStore::new(client))
}

pub fn to_filters(args: &FilterArgs) -> RosterFilters {
    RosterFilters {
        sector: args.sector.clone(),
        line_codes: args.lines.clone(),
        service_number: args.service.clone(),
        direction: args.direction.clone(),
        driver_name: args.driver_name.clone(),
        driver_badge: args.driver_badge.clone(),
        origin: args.origin.clone(),
        destination: args.destination.clone(),
        edited_only: args.edited_only.then_some(true),
        search_text: args.search.clone(),
    }
}

pub fn parse_trip_id(raw: &str) -> Result<TripId, CliError> {
    raw.trim()
        .parse::<TripId>()
        .map_err(|_| CliError::InvalidTripId(raw.to_string()))
}

/// Parses an instant as RFC 3339, or as `HH:MM` anchored to the
/// reference date (read as UTC).
pub fn parse_instant(date: NaiveDate, raw: &str) -> Result<DateTime<Utc>, CliError> {
    let raw = raw.trim();
    if let Ok(instant) = raw.parse::<DateTime<Utc>>() {
        return Ok(instant);
    }
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map(|time| Utc.from_utc_datetime(&date.and_time(time)))
        .map_err(|_| CliError::InvalidInstant(raw.to_string()))
}

pub fn parse_reason(raw: &str) -> Result<DelayReason, CliError> {
    DelayReason::from_code(raw).ok_or_else(|| CliError::UnknownDelayReason(raw.to_string()))
}

pub fn format_time(instant: Option<DateTime<Utc>>) -> String {
    instant.map_or_else(|| "--:--".to_string(), |at| at.format("%H:%M").to_string())
}

pub fn format_trip_line(record: &TripRecord, dirty: bool) -> String {
    let mut line = format!(
        "{}  {} {}  svc {}  {} ({})",
        format_time(record.effective_departure()),
        record.line_code,
        record.line_name,
        record.service_number.as_deref().unwrap_or("--"),
        record.driver.name,
        record.driver.badge,
    );
    if let Some(vehicle) = &record.vehicle_number {
        line.push_str(&format!("  veh {vehicle}"));
    }
    if let Some(substitute) = &record.substitute_driver_name {
        line.push_str(&format!("  sub {substitute}"));
    }
    if record.confirmed {
        line.push_str("  [confirmed]");
    }
    if record.has_local_edits() {
        line.push_str("  [edited]");
    }
    if dirty {
        line.push_str("  *");
    }
    format!("{}  {line}", record.id)
}

pub fn describe_outcome(outcome: &WriteOutcome) -> String {
    match outcome {
        WriteOutcome::Applied => "applied".to_string(),
        WriteOutcome::Denied => "denied (insufficient permissions)".to_string(),
        WriteOutcome::Failed(reason) => format!("failed: {reason}"),
    }
}

pub fn print_report(report: &CommitReport) {
    if let Some(outcome) = &report.batch {
        println!(
            "batch ({} trip(s)): {}",
            report.batch_ids.len(),
            describe_outcome(outcome)
        );
    }
    for (id, outcome) in &report.adjustments {
        println!("{id}: {}", describe_outcome(outcome));
    }
    if report.dirty_after == 0 {
        println!("All changes saved");
    } else {
        println!(
            "{} trip(s) still have unsaved changes; rerun to retry",
            report.dirty_after
        );
    }
}
