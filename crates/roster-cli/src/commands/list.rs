use chrono::NaiveDate;
use roster_core::ordering::{self, SortDirection};
use roster_core::{HttpRosterClient, RosterStore};

use crate::cli::FilterArgs;
use crate::commands::common::{format_trip_line, to_filters};
use crate::error::CliError;

pub async fn run_list(
    store: &mut RosterStore<HttpRosterClient>,
    date: NaiveDate,
    filters: &FilterArgs,
    descending: bool,
    as_json: bool,
) -> Result<(), CliError> {
    let session = store.load(date, to_filters(filters)).await?;

    let records = if descending {
        ordering::sort_records(session.records(), SortDirection::Descending)
    } else {
        session.records().to_vec()
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No trips for {date}");
        return Ok(());
    }
    for record in &records {
        println!("{}", format_trip_line(record, false));
    }
    println!("{} trips", records.len());
    Ok(())
}
