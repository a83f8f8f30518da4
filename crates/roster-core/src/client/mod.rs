//! Collaborator interface to the trip scheduling backend.
//!
//! The engine talks to the backend through [`RosterClient`]: one read
//! capability and two write capabilities (a batched update for
//! propagable fields, a per-record update for adjustments). The HTTP
//! implementation lives in [`http`]; tests substitute their own.

pub mod http;
pub mod wire;

use chrono::NaiveDate;
use serde::Serialize;

use crate::diff::{AdjustmentPatch, PropagablePatch};
use crate::error::Result;
use crate::models::{RosterFilters, TripId, TripRecord};

pub use http::HttpRosterClient;
pub use wire::RawTrip;

/// One record's entry in a batched propagable update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub id: TripId,
    #[serde(flatten)]
    pub patch: PropagablePatch,
}

/// Read and write capabilities of the scheduling backend.
///
/// Write failures distinguish authorization denial
/// ([`crate::Error::Authorization`]) from every other remote failure;
/// retry policy is the caller's concern.
#[allow(async_fn_in_trait)]
pub trait RosterClient {
    /// Fetches the roster for one reference date, including previously
    /// persisted edits so a reopened date restores its state.
    async fn fetch_roster(
        &self,
        date: NaiveDate,
        filters: &RosterFilters,
    ) -> Result<Vec<TripRecord>>;

    /// Submits changed propagable fields for many records in one call.
    async fn submit_batch_update(&self, updates: &[BatchEntry]) -> Result<()>;

    /// Submits changed adjustment fields for a single record.
    async fn submit_record_update(&self, id: TripId, patch: &AdjustmentPatch) -> Result<()>;
}
