use std::sync::Arc;

use tracing::info;

use super::domain::{
    ActorRole, AvailabilityRequest, InterviewSlot, NewSlot, OwnerRef, RequestId,
};
use super::error::{ScheduleError, ValidationError};
use super::proposal::{parse_timestamp, validate_duration};
use super::store::SlotStore;

pub const MAX_PREFERRED_WINDOWS: usize = 3;

/// Interviewee-side service for proposing preferred time windows, and the
/// reviewer-side acceptance that turns one of them into a confirmed slot.
pub struct AvailabilityRequestService<S> {
    store: Arc<S>,
}

impl<S> AvailabilityRequestService<S>
where
    S: SlotStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn submit_request(
        &self,
        owner: OwnerRef,
        preferred_windows: Vec<String>,
        note: Option<String>,
        submitted_by: ActorRole,
    ) -> Result<AvailabilityRequest, ScheduleError> {
        if !submitted_by.is_interviewee() {
            return Err(ScheduleError::Authorization(format!(
                "availability requests are interviewee-initiated, got {submitted_by}"
            )));
        }

        if preferred_windows.is_empty() || preferred_windows.len() > MAX_PREFERRED_WINDOWS {
            return Err(ValidationError::WindowCountOutOfRange {
                found: preferred_windows.len(),
            }
            .into());
        }

        let mut windows = Vec::with_capacity(preferred_windows.len());
        for raw in &preferred_windows {
            windows.push(parse_timestamp(raw)?);
        }

        let request = self
            .store
            .insert_request(owner, windows, note, submitted_by)?;
        info!(request = %request.id, owner = %request.owner, "availability request submitted");
        Ok(request)
    }

    /// Reviewer picks a time (one of the preferred windows, or any other) and
    /// books it. The store resolves the request and creates the confirmed
    /// slot in one guarded operation.
    pub fn accept_request(
        &self,
        request_id: &RequestId,
        scheduled_at: &str,
        duration_minutes: i64,
        meeting_link: Option<String>,
        accepted_by: ActorRole,
    ) -> Result<(InterviewSlot, AvailabilityRequest), ScheduleError> {
        if !accepted_by.can_review() {
            return Err(ScheduleError::Authorization(format!(
                "accepting an availability request requires a reviewer role, got {accepted_by}"
            )));
        }

        let slot = NewSlot {
            scheduled_at: parse_timestamp(scheduled_at)?,
            duration_minutes: validate_duration(duration_minutes)?,
            meeting_link,
            proposed_by: accepted_by,
        };

        let (confirmed, accepted) = self.store.accept_request(request_id, slot)?;
        info!(
            request = %accepted.id,
            slot = %confirmed.id,
            owner = %confirmed.owner,
            "availability request accepted"
        );
        Ok((confirmed, accepted))
    }

    pub fn decline_request(
        &self,
        request_id: &RequestId,
        declined_by: ActorRole,
    ) -> Result<AvailabilityRequest, ScheduleError> {
        if !declined_by.can_review() {
            return Err(ScheduleError::Authorization(format!(
                "declining an availability request requires a reviewer role, got {declined_by}"
            )));
        }

        let declined = self.store.decline_request(request_id)?;
        info!(request = %declined.id, owner = %declined.owner, "availability request declined");
        Ok(declined)
    }
}
