//! Argument definitions for the `roster` binary.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Inspect and reconcile the daily bus trip roster")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API base URL (defaults to ROSTER_API_URL)
    #[arg(long, value_name = "URL", global = true)]
    pub endpoint: Option<String>,

    /// Bearer token for the backend (defaults to ROSTER_API_TOKEN)
    #[arg(long, value_name = "TOKEN", global = true)]
    pub token: Option<String>,

    /// Acting role (defaults to ROSTER_ROLE)
    #[arg(long, value_name = "ROLE", global = true)]
    pub role: Option<String>,
}

#[derive(Args, Clone, Default)]
pub struct FilterArgs {
    /// Restrict to one sector
    #[arg(long)]
    pub sector: Option<String>,

    /// Restrict to one or more line codes
    #[arg(long = "line", value_name = "CODE")]
    pub lines: Vec<String>,

    /// Restrict to one service number
    #[arg(long)]
    pub service: Option<String>,

    /// Restrict to one direction of travel
    #[arg(long)]
    pub direction: Option<String>,

    /// Restrict to one original driver name (substring match)
    #[arg(long)]
    pub driver_name: Option<String>,

    /// Restrict to one original driver badge
    #[arg(long)]
    pub driver_badge: Option<String>,

    /// Restrict to one origin location
    #[arg(long)]
    pub origin: Option<String>,

    /// Restrict to one destination location
    #[arg(long)]
    pub destination: Option<String>,

    /// Only trips that already carry an edit
    #[arg(long)]
    pub edited_only: bool,

    /// Free-text search across line, crew, and locations
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the roster for one date
    List {
        /// Reference date (YYYY-MM-DD)
        date: NaiveDate,
        #[command(flatten)]
        filters: FilterArgs,
        /// Latest departures first
        #[arg(long)]
        desc: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize one date's roster
    Stats {
        /// Reference date (YYYY-MM-DD)
        date: NaiveDate,
        #[command(flatten)]
        filters: FilterArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Substitute a vehicle or crew member on a trip and its duty chain
    Substitute {
        /// Reference date (YYYY-MM-DD)
        date: NaiveDate,
        /// Anchor trip id
        id: String,
        /// New vehicle number
        #[arg(long)]
        vehicle: Option<String>,
        /// Substitute driver name
        #[arg(
            long,
            requires = "driver_badge",
            conflicts_with_all = ["conductor_name", "conductor_badge"]
        )]
        driver_name: Option<String>,
        /// Substitute driver badge
        #[arg(
            long,
            requires = "driver_name",
            conflicts_with_all = ["conductor_name", "conductor_badge"]
        )]
        driver_badge: Option<String>,
        /// Substitute conductor name
        #[arg(long, requires = "conductor_badge")]
        conductor_name: Option<String>,
        /// Substitute conductor badge
        #[arg(long, requires = "conductor_name")]
        conductor_badge: Option<String>,
        /// Note explaining the substitution (required for crew changes)
        #[arg(long)]
        note: Option<String>,
        /// Show the affected trips without committing
        #[arg(long)]
        dry_run: bool,
    },
    /// Adjust times, delay cause, or confirmation of a single trip
    Adjust {
        /// Reference date (YYYY-MM-DD)
        date: NaiveDate,
        /// Trip id
        id: String,
        /// Adjusted departure (RFC 3339 or HH:MM on the reference date)
        #[arg(long)]
        departure: Option<String>,
        /// Adjusted arrival (RFC 3339 or HH:MM on the reference date)
        #[arg(long)]
        arrival: Option<String>,
        /// Delay reason (TRAFFIC, ACCIDENT, BREAKDOWN, OTHER)
        #[arg(long)]
        reason: Option<String>,
        /// Delay note
        #[arg(long)]
        note: Option<String>,
        /// Confirm the trip
        #[arg(long, conflicts_with = "unconfirm")]
        confirm: bool,
        /// Withdraw a confirmation
        #[arg(long)]
        unconfirm: bool,
    },
}
