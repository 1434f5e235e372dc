use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::availability::AvailabilityRequestService;
use super::completion::InterviewCompletionService;
use super::confirmation::SlotConfirmationService;
use super::derivation::{derive_task, InterviewTask};
use super::domain::{
    ActorRole, ApplicationId, ApplicationRecord, GateId, HasOutcome, HasSlots, InterviewOutcome,
    InterviewOwner, OwnerKind, OwnerRef, ReadinessDecision, ReadinessGateRecord, Recommendation,
    RequestId, SecondaryLink, SlotId, SlotSpec,
};
use super::error::{NotFoundError, ScheduleError, ValidationError};
use super::proposal::SlotProposalService;
use super::store::{OwnerRepository, SlotStore};

/// The resolved record behind an owner reference.
pub enum OwnerRecord {
    Application(ApplicationRecord),
    ReadinessGate(ReadinessGateRecord),
}

impl HasSlots for OwnerRecord {
    fn owner_ref(&self) -> OwnerRef {
        match self {
            OwnerRecord::Application(record) => record.owner_ref(),
            OwnerRecord::ReadinessGate(record) => record.owner_ref(),
        }
    }

    fn interviewee_id(&self) -> &str {
        match self {
            OwnerRecord::Application(record) => record.interviewee_id(),
            OwnerRecord::ReadinessGate(record) => record.interviewee_id(),
        }
    }

    fn unmet_prerequisites(&self) -> Vec<String> {
        match self {
            OwnerRecord::Application(record) => record.unmet_prerequisites(),
            OwnerRecord::ReadinessGate(record) => record.unmet_prerequisites(),
        }
    }
}

impl HasOutcome for OwnerRecord {
    fn recorded_outcome(&self) -> Option<InterviewOutcome> {
        match self {
            OwnerRecord::Application(record) => record.recorded_outcome(),
            OwnerRecord::ReadinessGate(record) => record.recorded_outcome(),
        }
    }
}

impl InterviewOwner for OwnerRecord {
    fn headline(&self) -> String {
        match self {
            OwnerRecord::Application(record) => record.headline(),
            OwnerRecord::ReadinessGate(record) => record.headline(),
        }
    }

    fn subheadline(&self) -> String {
        match self {
            OwnerRecord::Application(record) => record.subheadline(),
            OwnerRecord::ReadinessGate(record) => record.subheadline(),
        }
    }

    fn detail(&self) -> String {
        match self {
            OwnerRecord::Application(record) => record.detail(),
            OwnerRecord::ReadinessGate(record) => record.detail(),
        }
    }

    fn secondary_links(&self) -> Vec<SecondaryLink> {
        match self {
            OwnerRecord::Application(record) => record.secondary_links(),
            OwnerRecord::ReadinessGate(record) => record.secondary_links(),
        }
    }
}

/// Facade composing the scheduling components into the command surface the
/// surrounding portal calls. Every mutating command re-derives and returns
/// the owner's task from the acting role's perspective.
pub struct InterviewDeskService<S, O> {
    store: Arc<S>,
    owners: Arc<O>,
    proposals: SlotProposalService<S>,
    availability: AvailabilityRequestService<S>,
    confirmations: SlotConfirmationService<S>,
    completions: InterviewCompletionService<S, O>,
}

impl<S, O> InterviewDeskService<S, O>
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    pub fn new(store: Arc<S>, owners: Arc<O>) -> Self {
        Self {
            proposals: SlotProposalService::new(store.clone()),
            availability: AvailabilityRequestService::new(store.clone()),
            confirmations: SlotConfirmationService::new(store.clone()),
            completions: InterviewCompletionService::new(store.clone(), owners.clone()),
            store,
            owners,
        }
    }

    pub fn post_application_interview_slots_bulk(
        &self,
        application_id: &ApplicationId,
        specs: Vec<SlotSpec>,
        actor: ActorRole,
    ) -> Result<InterviewTask, ScheduleError> {
        let application = self
            .owners
            .fetch_application(application_id)?
            .ok_or_else(|| NotFoundError::Application(application_id.clone()))?;
        let record = OwnerRecord::Application(application);
        Self::ensure_open(&record)?;

        self.proposals
            .post_slots_bulk(record.owner_ref(), specs, actor)?;
        self.task_for(&record, actor, Utc::now())
    }

    pub fn post_instructor_interview_slots_bulk(
        &self,
        instructor_id: &str,
        gate_id: &GateId,
        specs: Vec<SlotSpec>,
        actor: ActorRole,
    ) -> Result<InterviewTask, ScheduleError> {
        let gate = self
            .owners
            .fetch_gate(gate_id)?
            .ok_or_else(|| NotFoundError::Gate(gate_id.clone()))?;
        if gate.instructor_id != instructor_id {
            return Err(ValidationError::GateOwnerMismatch {
                gate: gate_id.clone(),
                instructor: instructor_id.to_string(),
            }
            .into());
        }
        let record = OwnerRecord::ReadinessGate(gate);
        Self::ensure_open(&record)?;

        self.proposals
            .post_slots_bulk(record.owner_ref(), specs, actor)?;
        self.task_for(&record, actor, Utc::now())
    }

    pub fn confirm_interview_slot(
        &self,
        slot_id: &SlotId,
        actor: ActorRole,
    ) -> Result<InterviewTask, ScheduleError> {
        let record = self.owner_of_slot(slot_id)?;
        Self::ensure_open(&record)?;

        self.confirmations.confirm(slot_id, actor)?;
        self.task_for(&record, actor, Utc::now())
    }

    /// Alias command for the readiness pipeline; the confirmation semantics
    /// are identical for both owner kinds.
    pub fn confirm_posted_interview_slot(
        &self,
        slot_id: &SlotId,
        actor: ActorRole,
    ) -> Result<InterviewTask, ScheduleError> {
        self.confirm_interview_slot(slot_id, actor)
    }

    pub fn cancel_interview_slot(
        &self,
        slot_id: &SlotId,
        actor: ActorRole,
    ) -> Result<InterviewTask, ScheduleError> {
        let record = self.owner_of_slot(slot_id)?;
        Self::ensure_open(&record)?;

        self.confirmations.cancel(slot_id, actor)?;
        self.task_for(&record, actor, Utc::now())
    }

    pub fn complete_application_interview_and_note(
        &self,
        application_id: &ApplicationId,
        slot_id: &SlotId,
        recommendation: Recommendation,
        content: String,
        strengths: Option<String>,
        concerns: Option<String>,
        actor: ActorRole,
    ) -> Result<InterviewTask, ScheduleError> {
        let application = self.completions.complete_hiring(
            application_id,
            slot_id,
            recommendation,
            content,
            strengths,
            concerns,
            actor,
        )?;
        self.task_for(&OwnerRecord::Application(application), actor, Utc::now())
    }

    pub fn save_structured_interview_note(
        &self,
        application_id: &ApplicationId,
        recommendation: Recommendation,
        content: String,
        actor: ActorRole,
    ) -> Result<InterviewTask, ScheduleError> {
        let application =
            self.completions
                .save_structured_note(application_id, recommendation, content, actor)?;
        self.task_for(&OwnerRecord::Application(application), actor, Utc::now())
    }

    pub fn submit_interview_availability_request(
        &self,
        instructor_id: &str,
        preferred_windows: Vec<String>,
        note: Option<String>,
        actor: ActorRole,
    ) -> Result<InterviewTask, ScheduleError> {
        let gate = self
            .owners
            .gate_for_instructor(instructor_id)?
            .ok_or_else(|| NotFoundError::GateForInstructor(instructor_id.to_string()))?;
        let record = OwnerRecord::ReadinessGate(gate);
        Self::ensure_open(&record)?;

        self.availability
            .submit_request(record.owner_ref(), preferred_windows, note, actor)?;
        self.task_for(&record, actor, Utc::now())
    }

    pub fn accept_interview_availability_request(
        &self,
        request_id: &RequestId,
        scheduled_at: &str,
        duration_minutes: i64,
        meeting_link: Option<String>,
        actor: ActorRole,
    ) -> Result<InterviewTask, ScheduleError> {
        let record = self.owner_of_request(request_id)?;
        Self::ensure_open(&record)?;

        self.availability.accept_request(
            request_id,
            scheduled_at,
            duration_minutes,
            meeting_link,
            actor,
        )?;
        self.task_for(&record, actor, Utc::now())
    }

    pub fn decline_interview_availability_request(
        &self,
        request_id: &RequestId,
        actor: ActorRole,
    ) -> Result<InterviewTask, ScheduleError> {
        let record = self.owner_of_request(request_id)?;
        Self::ensure_open(&record)?;

        self.availability.decline_request(request_id, actor)?;
        self.task_for(&record, actor, Utc::now())
    }

    pub fn complete_instructor_interview_and_set_outcome(
        &self,
        gate_id: &GateId,
        slot_id: Option<&SlotId>,
        decision: ReadinessDecision,
        review_notes: Option<String>,
        actor: ActorRole,
    ) -> Result<InterviewTask, ScheduleError> {
        let gate =
            self.completions
                .complete_readiness(gate_id, slot_id, decision, review_notes, actor)?;
        self.task_for(&OwnerRecord::ReadinessGate(gate), actor, Utc::now())
    }

    /// The derived task feed for one viewer. Reviewers see every owner;
    /// candidates and instructors see their own records only.
    pub fn list_interview_tasks(
        &self,
        for_role: ActorRole,
        for_user: &str,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<InterviewTask>, ScheduleError> {
        let mut tasks = Vec::new();

        if for_role.can_review() || for_role == ActorRole::Candidate {
            for application in self.owners.list_applications()? {
                if for_role == ActorRole::Candidate && application.candidate_id != for_user {
                    continue;
                }
                let record = OwnerRecord::Application(application);
                tasks.push(self.task_for(&record, for_role, as_of)?);
            }
        }

        if for_role.can_review() || for_role == ActorRole::Instructor {
            for gate in self.owners.list_gates()? {
                if for_role == ActorRole::Instructor && gate.instructor_id != for_user {
                    continue;
                }
                let record = OwnerRecord::ReadinessGate(gate);
                tasks.push(self.task_for(&record, for_role, as_of)?);
            }
        }

        tasks.sort_by(|a, b| {
            a.stage
                .sort_weight()
                .cmp(&b.stage.sort_weight())
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(tasks)
    }

    fn task_for(
        &self,
        record: &OwnerRecord,
        perspective: ActorRole,
        as_of: DateTime<Utc>,
    ) -> Result<InterviewTask, ScheduleError> {
        let owner_ref = record.owner_ref();
        let slots = self.store.slots_for_owner(&owner_ref)?;
        let requests = self.store.requests_for_owner(&owner_ref)?;
        Ok(derive_task(record, &slots, &requests, perspective, as_of))
    }

    fn ensure_open(record: &OwnerRecord) -> Result<(), ScheduleError> {
        if record.recorded_outcome().is_some() {
            return Err(ScheduleError::State(format!(
                "interview for {} is already complete",
                record.owner_ref()
            )));
        }
        Ok(())
    }

    fn owner_of_slot(&self, slot_id: &SlotId) -> Result<OwnerRecord, ScheduleError> {
        let slot = self
            .store
            .get_slot(slot_id)?
            .ok_or_else(|| NotFoundError::Slot(slot_id.clone()))?;
        self.resolve_owner(&slot.owner)
    }

    fn owner_of_request(&self, request_id: &RequestId) -> Result<OwnerRecord, ScheduleError> {
        let request = self
            .store
            .get_request(request_id)?
            .ok_or_else(|| NotFoundError::Request(request_id.clone()))?;
        self.resolve_owner(&request.owner)
    }

    fn resolve_owner(&self, owner_ref: &OwnerRef) -> Result<OwnerRecord, ScheduleError> {
        match owner_ref.kind {
            OwnerKind::Application => {
                let id = ApplicationId(owner_ref.id.clone());
                let application = self
                    .owners
                    .fetch_application(&id)?
                    .ok_or(NotFoundError::Application(id))?;
                Ok(OwnerRecord::Application(application))
            }
            OwnerKind::ReadinessGate => {
                let id = GateId(owner_ref.id.clone());
                let gate = self
                    .owners
                    .fetch_gate(&id)?
                    .ok_or(NotFoundError::Gate(id))?;
                Ok(OwnerRecord::ReadinessGate(gate))
            }
        }
    }
}
