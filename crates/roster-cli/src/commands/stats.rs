use chrono::NaiveDate;
use roster_core::{stats, HttpRosterClient, RosterStore};

use crate::cli::FilterArgs;
use crate::commands::common::to_filters;
use crate::error::CliError;

pub async fn run_stats(
    store: &mut RosterStore<HttpRosterClient>,
    date: NaiveDate,
    filters: &FilterArgs,
    as_json: bool,
) -> Result<(), CliError> {
    let session = store.load(date, to_filters(filters)).await?;
    let summary = stats::compute(session);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Roster for {date}");
    println!("  trips      {}", summary.total);
    println!("  confirmed  {}", summary.confirmed);
    println!("  pending    {}", summary.pending);
    println!("  edited     {}", summary.edited);
    println!("  delayed    {}", summary.delayed);
    for entry in &summary.by_delay_reason {
        println!("    {:<10} {}", entry.reason.as_code(), entry.count);
    }
    Ok(())
}
