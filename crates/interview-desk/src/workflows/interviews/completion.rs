use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    ActorRole, ApplicationId, ApplicationPhase, ApplicationRecord, GateId, GateStatus, HasSlots,
    HiringOutcome, InterviewSlot, OwnerRef, ReadinessDecision, ReadinessGateRecord,
    ReadinessOutcome, Recommendation, SlotId, SlotStatus,
};
use super::error::{NotFoundError, ScheduleError, ValidationError};
use super::store::{OwnerRepository, SlotStore};

const fn gate_status_for(decision: ReadinessDecision) -> GateStatus {
    match decision {
        ReadinessDecision::Pass => GateStatus::Certified,
        ReadinessDecision::Hold => GateStatus::OnHold,
        ReadinessDecision::Fail => GateStatus::Failed,
        ReadinessDecision::Waive => GateStatus::Waived,
    }
}

/// Records terminal interview outcomes and advances the owner's status.
///
/// This is the only component allowed to move a confirmed slot into
/// completed, and the only writer of owner outcome fields.
pub struct InterviewCompletionService<S, O> {
    store: Arc<S>,
    owners: Arc<O>,
}

impl<S, O> InterviewCompletionService<S, O>
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    pub fn new(store: Arc<S>, owners: Arc<O>) -> Self {
        Self { store, owners }
    }

    pub fn complete_hiring(
        &self,
        application_id: &ApplicationId,
        slot_id: &SlotId,
        recommendation: Recommendation,
        content: String,
        strengths: Option<String>,
        concerns: Option<String>,
        completed_by: ActorRole,
    ) -> Result<ApplicationRecord, ScheduleError> {
        if !completed_by.can_review() {
            return Err(ScheduleError::Authorization(format!(
                "completing a hiring interview requires a reviewer role, got {completed_by}"
            )));
        }
        if content.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "content" }.into());
        }

        let mut application = self.fetch_open_application(application_id)?;

        let slot = self.expect_confirmed_slot(slot_id, &application.owner_ref())?;
        self.store
            .transition_slot(&slot.id, SlotStatus::Confirmed, SlotStatus::Completed)?;

        application.outcome = Some(HiringOutcome {
            recommendation,
            content,
            strengths,
            concerns,
            slot_id: Some(slot.id.clone()),
            recorded_at: Utc::now(),
        });
        application.phase = ApplicationPhase::Decision;
        self.owners.update_application(application.clone())?;

        info!(
            application = %application.id,
            slot = %slot.id,
            recommendation = recommendation.label(),
            "hiring interview completed"
        );
        Ok(application)
    }

    /// Note-only fallback for interviews that happened outside the
    /// scheduling flow. Refused while a proposed or confirmed slot exists.
    pub fn save_structured_note(
        &self,
        application_id: &ApplicationId,
        recommendation: Recommendation,
        content: String,
        noted_by: ActorRole,
    ) -> Result<ApplicationRecord, ScheduleError> {
        if !noted_by.can_review() {
            return Err(ScheduleError::Authorization(format!(
                "recording an interview note requires a reviewer role, got {noted_by}"
            )));
        }
        if content.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "content" }.into());
        }

        let mut application = self.fetch_open_application(application_id)?;

        let slots = self.store.slots_for_owner(&application.owner_ref())?;
        if let Some(live) = slots.iter().find(|slot| slot.status.is_live()) {
            return Err(ScheduleError::State(format!(
                "application {} has a {} slot; complete the scheduled interview instead",
                application.id, live.status
            )));
        }

        application.outcome = Some(HiringOutcome {
            recommendation,
            content,
            strengths: None,
            concerns: None,
            slot_id: None,
            recorded_at: Utc::now(),
        });
        application.phase = ApplicationPhase::Decision;
        self.owners.update_application(application.clone())?;

        info!(
            application = %application.id,
            recommendation = recommendation.label(),
            "structured interview note recorded without a slot"
        );
        Ok(application)
    }

    pub fn complete_readiness(
        &self,
        gate_id: &GateId,
        slot_id: Option<&SlotId>,
        decision: ReadinessDecision,
        review_notes: Option<String>,
        completed_by: ActorRole,
    ) -> Result<ReadinessGateRecord, ScheduleError> {
        let mut gate = self
            .owners
            .fetch_gate(gate_id)?
            .ok_or_else(|| NotFoundError::Gate(gate_id.clone()))?;
        if gate.outcome.is_some() {
            return Err(ScheduleError::State(format!(
                "readiness interview for gate {} is already complete",
                gate.id
            )));
        }

        let completed_slot = if decision.requires_slot() {
            if !completed_by.can_review() {
                return Err(ScheduleError::Authorization(format!(
                    "recording a readiness decision requires a reviewer role, got {completed_by}"
                )));
            }

            let blockers = gate.unmet_prerequisites();
            if let Some(blocker) = blockers.first() {
                return Err(ScheduleError::State(format!(
                    "gate {} cannot be decided yet: {blocker}",
                    gate.id
                )));
            }

            let slot_id = slot_id.ok_or_else(|| {
                ScheduleError::State(format!(
                    "recording {decision} requires a confirmed interview slot"
                ))
            })?;
            let slot = self.expect_confirmed_slot(slot_id, &gate.owner_ref())?;
            self.store
                .transition_slot(&slot.id, SlotStatus::Confirmed, SlotStatus::Completed)?;
            Some(slot.id)
        } else {
            // Waivers bypass scheduling entirely and are an admin call.
            if completed_by != ActorRole::Admin {
                return Err(ScheduleError::Authorization(format!(
                    "waiving a readiness interview requires an admin role, got {completed_by}"
                )));
            }
            None
        };

        gate.outcome = Some(ReadinessOutcome {
            decision,
            review_notes,
            slot_id: completed_slot.clone(),
            recorded_at: Utc::now(),
        });
        gate.status = gate_status_for(decision);
        self.owners.update_gate(gate.clone())?;

        info!(
            gate = %gate.id,
            decision = decision.label(),
            slot = completed_slot.as_ref().map(|id| id.0.as_str()).unwrap_or("none"),
            "readiness interview decided"
        );
        Ok(gate)
    }

    fn fetch_open_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, ScheduleError> {
        let application = self
            .owners
            .fetch_application(application_id)?
            .ok_or_else(|| NotFoundError::Application(application_id.clone()))?;
        if application.outcome.is_some() {
            return Err(ScheduleError::State(format!(
                "hiring interview for application {} is already complete",
                application.id
            )));
        }
        Ok(application)
    }

    fn expect_confirmed_slot(
        &self,
        slot_id: &SlotId,
        owner: &OwnerRef,
    ) -> Result<InterviewSlot, ScheduleError> {
        let slot = self
            .store
            .get_slot(slot_id)?
            .ok_or_else(|| NotFoundError::Slot(slot_id.clone()))?;
        if &slot.owner != owner {
            return Err(ScheduleError::State(format!(
                "slot {} belongs to {}, not {owner}",
                slot.id, slot.owner
            )));
        }
        if slot.status != SlotStatus::Confirmed {
            return Err(ScheduleError::State(format!(
                "slot {} is {}; completion requires a confirmed slot",
                slot.id, slot.status
            )));
        }
        Ok(slot)
    }
}
