//! Two-track commit of pending edits.
//!
//! Propagable edits travel as one batched update; adjustments go out as
//! one call per record. The tracks fail independently: a failed batch
//! never blocks adjustments, a failed adjustment never touches its
//! neighbours, and every failure leaves the affected fields dirty so a
//! later commit retries them.

use crate::client::{BatchEntry, RosterClient};
use crate::diff::{self, AdjustmentPatch};
use crate::error::{Error, Result};
use crate::models::{Actor, EditCategory, TripId};
use crate::session::EditSession;
use crate::store::RosterStore;
use crate::util::normalize_text_option;

/// How one write attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The backend accepted the write; its fields were merged clean.
    Applied,
    /// The actor lacked permission; the write was not attempted or was
    /// refused, and its fields stay dirty.
    Denied,
    /// The write failed for a non-authorization reason; fields stay dirty.
    Failed(String),
}

impl WriteOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Aggregate result of one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    /// Nothing was dirty; no write was attempted.
    Clean,
    /// Every attempted write was applied.
    Committed,
    /// Some writes were applied, others were denied or failed.
    Partial,
    /// No attempted write was applied.
    Failed,
}

/// Per-write outcomes of one commit, enough to drive a save/retry
/// affordance without knowing anything about presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    /// Outcome of the batched propagable update, or `None` when no
    /// record had propagable changes.
    pub batch: Option<WriteOutcome>,
    /// Ids covered by the batched update.
    pub batch_ids: Vec<TripId>,
    /// Outcome of each per-record adjustment update.
    pub adjustments: Vec<(TripId, WriteOutcome)>,
    /// Dirty records remaining after the commit and reload.
    pub dirty_after: usize,
}

impl CommitReport {
    #[must_use]
    pub fn status(&self) -> CommitStatus {
        let outcomes: Vec<&WriteOutcome> = self
            .batch
            .iter()
            .chain(self.adjustments.iter().map(|(_, outcome)| outcome))
            .collect();
        if outcomes.is_empty() {
            return CommitStatus::Clean;
        }
        let applied = outcomes
            .iter()
            .filter(|outcome| outcome.is_applied())
            .count();
        if applied == outcomes.len() {
            CommitStatus::Committed
        } else if applied == 0 {
            CommitStatus::Failed
        } else {
            CommitStatus::Partial
        }
    }
}

/// Rejects, before any network call, dirty state that must never be
/// submitted: a confirmation without a vehicle number, or a substitute
/// identity without its mandatory note.
fn validate_session(session: &EditSession) -> Result<()> {
    for id in diff::dirty_ids(session) {
        let Some(record) = session.record(id) else {
            continue;
        };
        if record.confirmed
            && normalize_text_option(record.vehicle_number.as_deref()).is_none()
        {
            return Err(Error::Validation(format!(
                "cannot commit trip {id}: confirmed without a vehicle number"
            )));
        }
        let driver_substituted = normalize_text_option(record.substitute_driver_name.as_deref())
            .is_some()
            || normalize_text_option(record.substitute_driver_badge.as_deref()).is_some();
        if driver_substituted && normalize_text_option(record.driver_note.as_deref()).is_none() {
            return Err(Error::Validation(format!(
                "cannot commit trip {id}: driver substitution without a note"
            )));
        }
        let conductor_substituted =
            normalize_text_option(record.substitute_conductor_name.as_deref()).is_some()
                || normalize_text_option(record.substitute_conductor_badge.as_deref()).is_some();
        if conductor_substituted
            && normalize_text_option(record.conductor_note.as_deref()).is_none()
        {
            return Err(Error::Validation(format!(
                "cannot commit trip {id}: conductor substitution without a note"
            )));
        }
    }
    Ok(())
}

fn prepare(session: &EditSession) -> (Vec<BatchEntry>, Vec<(TripId, AdjustmentPatch)>) {
    let mut batch = Vec::new();
    let mut adjustments = Vec::new();
    for id in diff::dirty_ids(session) {
        let Some(item) = diff::diff_item(session, id) else {
            continue;
        };
        if !item.propagable.is_empty() {
            batch.push(BatchEntry {
                id,
                patch: item.propagable,
            });
        }
        if !item.adjustment.is_empty() {
            adjustments.push((id, item.adjustment));
        }
    }
    (batch, adjustments)
}

fn outcome_of(error: &Error) -> WriteOutcome {
    if error.is_authorization() {
        WriteOutcome::Denied
    } else {
        WriteOutcome::Failed(error.to_string())
    }
}

impl<C: RosterClient> RosterStore<C> {
    /// Commits every pending edit on behalf of `actor`.
    ///
    /// Validation runs first and aborts the whole commit with nothing
    /// sent. A category the actor is not permitted for is skipped and
    /// reported as denied; the other category still proceeds. After both
    /// tracks complete, the roster is reloaded and any still-dirty edits
    /// are carried over so they can be recommitted.
    pub async fn commit(&mut self, actor: &Actor) -> Result<CommitReport> {
        let session = self.session_ref()?;
        validate_session(session)?;
        let (batch, adjustments) = prepare(session);

        let batch_ids: Vec<TripId> = batch.iter().map(|entry| entry.id).collect();
        let batch_outcome = if batch.is_empty() {
            None
        } else if actor.may_edit(EditCategory::Propagable) {
            let submitted = self.client().submit_batch_update(&batch).await;
            match submitted {
                Ok(()) => {
                    let session = self.session_mut()?;
                    for entry in &batch {
                        session.merge_committed_propagable(entry.id, &entry.patch);
                    }
                    Some(WriteOutcome::Applied)
                }
                Err(error) => {
                    tracing::warn!(%error, ids = batch.len(), "batched update failed");
                    Some(outcome_of(&error))
                }
            }
        } else {
            tracing::warn!(role = %actor.role, "propagable updates denied locally");
            Some(WriteOutcome::Denied)
        };

        let mut adjustment_outcomes = Vec::with_capacity(adjustments.len());
        let adjustments_allowed = actor.may_edit(EditCategory::Adjustment);
        for (id, patch) in &adjustments {
            if !adjustments_allowed {
                adjustment_outcomes.push((*id, WriteOutcome::Denied));
                continue;
            }
            let submitted = self.client().submit_record_update(*id, patch).await;
            match submitted {
                Ok(()) => {
                    self.session_mut()?.merge_committed_adjustment(*id, patch);
                    adjustment_outcomes.push((*id, WriteOutcome::Applied));
                }
                Err(error) => {
                    tracing::warn!(%id, %error, "record update failed");
                    adjustment_outcomes.push((*id, outcome_of(&error)));
                }
            }
        }
        if !adjustments_allowed && !adjustments.is_empty() {
            tracing::warn!(role = %actor.role, "adjustment updates denied locally");
        }

        if let Err(error) = self.reload_preserving_edits().await {
            tracing::warn!(%error, "post-commit reload failed; keeping in-memory state");
        }

        Ok(CommitReport {
            batch: batch_outcome,
            batch_ids,
            adjustments: adjustment_outcomes,
            dirty_after: self.dirty_count()?,
        })
    }
}
