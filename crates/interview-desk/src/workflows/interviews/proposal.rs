use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{ActorRole, InterviewSlot, NewSlot, OwnerRef, SlotSpec};
use super::error::{ScheduleError, ValidationError};
use super::store::SlotStore;

pub const MIN_DURATION_MINUTES: i64 = 15;
pub const MAX_DURATION_MINUTES: i64 = 180;
pub const MAX_SLOTS_PER_POST: usize = 3;

pub(super) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| ValidationError::UnparseableTimestamp {
            raw: raw.to_string(),
        })
}

pub(super) fn validate_duration(minutes: i64) -> Result<u32, ValidationError> {
    if (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
        Ok(minutes as u32)
    } else {
        Err(ValidationError::DurationOutOfRange { minutes })
    }
}

/// Reviewer-side service posting candidate time slots for an owner.
///
/// Validation happens entirely up front; the store call is all-or-nothing, so
/// a bad spec in the batch leaves zero slots behind.
pub struct SlotProposalService<S> {
    store: Arc<S>,
}

impl<S> SlotProposalService<S>
where
    S: SlotStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn post_slots_bulk(
        &self,
        owner: OwnerRef,
        specs: Vec<SlotSpec>,
        proposed_by: ActorRole,
    ) -> Result<Vec<InterviewSlot>, ScheduleError> {
        if !proposed_by.can_review() {
            return Err(ScheduleError::Authorization(format!(
                "posting interview slots requires a reviewer role, got {proposed_by}"
            )));
        }

        if specs.is_empty() || specs.len() > MAX_SLOTS_PER_POST {
            return Err(ValidationError::SlotCountOutOfRange { found: specs.len() }.into());
        }

        let mut validated = Vec::with_capacity(specs.len());
        for spec in &specs {
            let scheduled_at = parse_timestamp(&spec.scheduled_at)?;
            let duration_minutes = validate_duration(spec.duration_minutes)?;
            validated.push(NewSlot {
                scheduled_at,
                duration_minutes,
                meeting_link: spec.meeting_link.clone(),
                proposed_by,
            });
        }

        let created = self.store.create_slots(owner.clone(), validated)?;
        info!(owner = %owner, count = created.len(), "interview slots proposed");
        Ok(created)
    }
}
