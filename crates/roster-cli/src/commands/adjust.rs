use chrono::NaiveDate;
use roster_core::{Actor, HttpRosterClient, RosterFilters, RosterStore, TripEdit};

use crate::commands::common::{parse_instant, parse_reason, parse_trip_id, print_report};
use crate::error::CliError;

pub struct AdjustArgs {
    pub date: NaiveDate,
    pub id: String,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub reason: Option<String>,
    pub note: Option<String>,
    pub confirm: bool,
    pub unconfirm: bool,
}

fn build_edits(args: &AdjustArgs) -> Result<Vec<TripEdit>, CliError> {
    let mut edits = Vec::new();
    if let Some(raw) = &args.departure {
        edits.push(TripEdit::AdjustedDeparture(Some(parse_instant(
            args.date, raw,
        )?)));
    }
    if let Some(raw) = &args.arrival {
        edits.push(TripEdit::AdjustedArrival(Some(parse_instant(
            args.date, raw,
        )?)));
    }
    if let Some(raw) = &args.reason {
        edits.push(TripEdit::DelayReason(Some(
            parse_reason(raw)?.as_code().to_string(),
        )));
    }
    if let Some(note) = &args.note {
        edits.push(TripEdit::DelayNote(Some(note.clone())));
    }
    if args.confirm {
        edits.push(TripEdit::Confirmed(true));
    }
    if args.unconfirm {
        edits.push(TripEdit::Confirmed(false));
    }
    if edits.is_empty() {
        return Err(CliError::NothingToChange);
    }
    Ok(edits)
}

pub async fn run_adjust(
    store: &mut RosterStore<HttpRosterClient>,
    actor: &Actor,
    args: AdjustArgs,
) -> Result<(), CliError> {
    let edits = build_edits(&args)?;
    let id = parse_trip_id(&args.id)?;

    store.load(args.date, RosterFilters::default()).await?;
    if store.session_ref()?.record(id).is_none() {
        return Err(CliError::TripNotFound(args.id));
    }

    for edit in edits {
        store.apply_edit(id, edit)?;
    }
    tracing::info!("Adjusting trip {id}");

    let report = store.commit(actor).await?;
    print_report(&report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> AdjustArgs {
        AdjustArgs {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            id: String::new(),
            departure: None,
            arrival: None,
            reason: None,
            note: None,
            confirm: false,
            unconfirm: false,
        }
    }

    #[test]
    fn no_flags_is_rejected() {
        assert!(matches!(build_edits(&args()), Err(CliError::NothingToChange)));
    }

    #[test]
    fn reason_is_canonicalized_to_its_wire_code() {
        let mut args = args();
        args.reason = Some("traffic".to_string());
        let edits = build_edits(&args).unwrap();
        assert_eq!(
            edits,
            vec![TripEdit::DelayReason(Some("TRAFFIC".to_string()))]
        );
    }

    #[test]
    fn unknown_reason_is_rejected() {
        let mut args = args();
        args.reason = Some("WEATHER".to_string());
        assert!(matches!(
            build_edits(&args),
            Err(CliError::UnknownDelayReason(_))
        ));
    }
}
