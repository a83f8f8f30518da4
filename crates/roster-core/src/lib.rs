//! roster-core - Core library for the dispatch roster tools
//!
//! This crate contains the trip models, snapshot-based change detection,
//! day-boundary-aware ordering, substitution propagation, and the
//! two-track commit protocol used by every roster interface.

pub mod client;
pub mod commit;
pub mod diff;
pub mod error;
pub mod models;
pub mod ordering;
pub mod propagation;
pub mod session;
pub mod stats;
pub mod store;
pub mod util;

pub use client::{BatchEntry, HttpRosterClient, RosterClient};
pub use commit::{CommitReport, CommitStatus, WriteOutcome};
pub use diff::{AdjustmentPatch, PropagablePatch, TripDiff};
pub use error::{Error, Result};
pub use models::{
    Actor, CrewMember, DelayReason, EditCategory, Role, RosterFilters, TripEdit, TripId,
    TripRecord,
};
pub use propagation::{Substitution, SubstitutionKind};
pub use session::EditSession;
pub use store::RosterStore;
