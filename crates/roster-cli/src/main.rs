//! roster - command-line dispatch roster reconciliation
//!
//! Loads the daily trip roster, applies local corrections (vehicle and
//! crew substitutions, time adjustments, confirmations), and commits
//! only the fields that actually changed.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::adjust::{run_adjust, AdjustArgs};
use crate::commands::common::{build_store, resolve_actor};
use crate::commands::list::run_list;
use crate::commands::stats::run_stats;
use crate::commands::substitute::{run_substitute, SubstituteArgs};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roster=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let mut store = build_store(cli.endpoint, cli.token)?;
    let actor = resolve_actor(cli.role)?;

    match cli.command {
        Commands::List {
            date,
            filters,
            desc,
            json,
        } => run_list(&mut store, date, &filters, desc, json).await?,
        Commands::Stats {
            date,
            filters,
            json,
        } => run_stats(&mut store, date, &filters, json).await?,
        Commands::Substitute {
            date,
            id,
            vehicle,
            driver_name,
            driver_badge,
            conductor_name,
            conductor_badge,
            note,
            dry_run,
        } => {
            run_substitute(
                &mut store,
                &actor,
                SubstituteArgs {
                    date,
                    id,
                    vehicle,
                    driver_name,
                    driver_badge,
                    conductor_name,
                    conductor_badge,
                    note,
                    dry_run,
                },
            )
            .await?;
        }
        Commands::Adjust {
            date,
            id,
            departure,
            arrival,
            reason,
            note,
            confirm,
            unconfirm,
        } => {
            run_adjust(
                &mut store,
                &actor,
                AdjustArgs {
                    date,
                    id,
                    departure,
                    arrival,
                    reason,
                    note,
                    confirm,
                    unconfirm,
                },
            )
            .await?;
        }
    }

    Ok(())
}
