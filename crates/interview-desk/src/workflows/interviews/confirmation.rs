use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{ActorRole, InterviewSlot, SlotId, SlotStatus};
use super::error::ScheduleError;
use super::store::{SlotStore, StoreError};

/// The single place the double-booking race is resolved.
///
/// Confirmation delegates to the store's guarded compare-and-set: when two
/// reviewers simultaneously confirm different proposed slots of one owner,
/// exactly one transition lands; the other caller observes the sibling
/// already booked and is told to refresh.
pub struct SlotConfirmationService<S> {
    store: Arc<S>,
}

impl<S> SlotConfirmationService<S>
where
    S: SlotStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn confirm(
        &self,
        slot_id: &SlotId,
        confirmed_by: ActorRole,
    ) -> Result<InterviewSlot, ScheduleError> {
        if !confirmed_by.can_review() {
            return Err(ScheduleError::Authorization(format!(
                "confirming an interview slot requires a reviewer role, got {confirmed_by}"
            )));
        }

        match self
            .store
            .transition_slot(slot_id, SlotStatus::Proposed, SlotStatus::Confirmed)
        {
            Ok(confirmed) => {
                info!(
                    slot = %confirmed.id,
                    owner = %confirmed.owner,
                    scheduled_at = %confirmed.scheduled_at,
                    "interview slot confirmed"
                );
                Ok(confirmed)
            }
            Err(err @ (StoreError::SlotTransitionConflict { .. }
            | StoreError::OwnerAlreadyBooked(_))) => {
                warn!(slot = %slot_id, "interview slot confirmation lost to a sibling");
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Withdraw a proposed slot. Confirmed slots are never cancelled here;
    /// they leave the schedule through completion only.
    pub fn cancel(
        &self,
        slot_id: &SlotId,
        cancelled_by: ActorRole,
    ) -> Result<InterviewSlot, ScheduleError> {
        if !cancelled_by.can_review() {
            return Err(ScheduleError::Authorization(format!(
                "cancelling an interview slot requires a reviewer role, got {cancelled_by}"
            )));
        }

        let cancelled =
            self.store
                .transition_slot(slot_id, SlotStatus::Proposed, SlotStatus::Cancelled)?;
        info!(slot = %cancelled.id, owner = %cancelled.owner, "proposed interview slot cancelled");
        Ok(cancelled)
    }
}
