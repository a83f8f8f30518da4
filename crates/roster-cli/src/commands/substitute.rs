use chrono::NaiveDate;
use roster_core::{
    Actor, CrewMember, HttpRosterClient, RosterFilters, RosterStore, Substitution,
};

use crate::commands::common::{format_trip_line, parse_trip_id, print_report};
use crate::error::CliError;

pub struct SubstituteArgs {
    pub date: NaiveDate,
    pub id: String,
    pub vehicle: Option<String>,
    pub driver_name: Option<String>,
    pub driver_badge: Option<String>,
    pub conductor_name: Option<String>,
    pub conductor_badge: Option<String>,
    pub note: Option<String>,
    pub dry_run: bool,
}

fn build_substitution(args: &SubstituteArgs) -> Result<Substitution, CliError> {
    let note = args.note.clone().unwrap_or_default();
    if let (Some(name), Some(badge)) = (&args.driver_name, &args.driver_badge) {
        return Ok(Substitution::Driver {
            member: CrewMember::new(name.clone(), badge.clone()),
            note,
            vehicle_number: args.vehicle.clone(),
        });
    }
    if let (Some(name), Some(badge)) = (&args.conductor_name, &args.conductor_badge) {
        return Ok(Substitution::Conductor {
            member: CrewMember::new(name.clone(), badge.clone()),
            note,
            vehicle_number: args.vehicle.clone(),
        });
    }
    if let Some(number) = &args.vehicle {
        return Ok(Substitution::Vehicle {
            number: number.clone(),
        });
    }
    Err(CliError::NothingToChange)
}

pub async fn run_substitute(
    store: &mut RosterStore<HttpRosterClient>,
    actor: &Actor,
    args: SubstituteArgs,
) -> Result<(), CliError> {
    let substitution = build_substitution(&args)?;
    let anchor_id = parse_trip_id(&args.id)?;

    store.load(args.date, RosterFilters::default()).await?;
    if store.session_ref()?.record(anchor_id).is_none() {
        return Err(CliError::TripNotFound(args.id));
    }

    let touched = store.substitute(anchor_id, &substitution)?;
    tracing::info!(
        "Substitution from {anchor_id} reaches {} trip(s)",
        touched.len()
    );
    println!("Substitution covers {} trip(s):", touched.len());
    for id in &touched {
        if let Some(record) = store.session_ref()?.record(*id) {
            println!("  {}", format_trip_line(record, true));
        }
    }

    if args.dry_run {
        store.discard_all()?;
        println!("Dry run: nothing committed");
        return Ok(());
    }

    let report = store.commit(actor).await?;
    print_report(&report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SubstituteArgs {
        SubstituteArgs {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            id: String::new(),
            vehicle: None,
            driver_name: None,
            driver_badge: None,
            conductor_name: None,
            conductor_badge: None,
            note: None,
            dry_run: false,
        }
    }

    #[test]
    fn no_flags_is_rejected() {
        assert!(matches!(
            build_substitution(&args()),
            Err(CliError::NothingToChange)
        ));
    }

    #[test]
    fn vehicle_alone_builds_a_vehicle_substitution() {
        let mut args = args();
        args.vehicle = Some("40125".to_string());
        assert!(matches!(
            build_substitution(&args),
            Ok(Substitution::Vehicle { .. })
        ));
    }

    #[test]
    fn crew_flags_take_precedence_over_vehicle() {
        let mut args = args();
        args.vehicle = Some("40125".to_string());
        args.driver_name = Some("Relief Driver".to_string());
        args.driver_badge = Some("8800".to_string());
        args.note = Some("sick cover".to_string());
        assert!(matches!(
            build_substitution(&args),
            Ok(Substitution::Driver { .. })
        ));
    }
}
