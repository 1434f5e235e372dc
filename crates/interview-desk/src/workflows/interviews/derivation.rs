use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::domain::{
    ActorRole, ApplicationId, AvailabilityRequest, GateId, InterviewOwner, InterviewSlot,
    OwnerKind, OwnerRef, RequestId, RequestStatus, SecondaryLink, SlotId, SlotStatus,
};

/// Derived status shown to a user for one owner's interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStage {
    Blocked,
    NeedsAction,
    Scheduled,
    Completed,
}

impl TaskStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Blocked => "blocked",
            Self::NeedsAction => "needs_action",
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
        }
    }

    /// Feed ordering: actionable work first, settled work last.
    pub const fn sort_weight(self) -> u8 {
        match self {
            Self::NeedsAction => 0,
            Self::Scheduled => 1,
            Self::Blocked => 2,
            Self::Completed => 3,
        }
    }
}

/// The one thing the renderer should offer for a task. Closed sum so a
/// renderer match is checked for exhaustiveness at compile time; no variant
/// performs I/O itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrimaryAction {
    OpenDetails,
    ConfirmSlot {
        slot_id: SlotId,
    },
    PostSlotsBulk {
        application_id: ApplicationId,
        default_time: DateTime<Utc>,
    },
    CompleteHiringInterview {
        application_id: ApplicationId,
        slot_id: SlotId,
    },
    AddRecommendationNote {
        application_id: ApplicationId,
    },
    ConfirmReadinessSlot {
        slot_id: SlotId,
    },
    RequestAvailability {
        owner: OwnerRef,
        default_time: DateTime<Utc>,
    },
    PostReadinessSlotsBulk {
        instructor_id: String,
        gate_id: GateId,
    },
    AcceptAvailabilityRequest {
        request_id: RequestId,
    },
    CompleteReadinessInterview {
        gate_id: GateId,
        slot_id: Option<SlotId>,
    },
}

impl PrimaryAction {
    /// Stable wire name of the variant, matching the serialized `kind` tag.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::OpenDetails => "open_details",
            Self::ConfirmSlot { .. } => "confirm_slot",
            Self::PostSlotsBulk { .. } => "post_slots_bulk",
            Self::CompleteHiringInterview { .. } => "complete_hiring_interview",
            Self::AddRecommendationNote { .. } => "add_recommendation_note",
            Self::ConfirmReadinessSlot { .. } => "confirm_readiness_slot",
            Self::RequestAvailability { .. } => "request_availability",
            Self::PostReadinessSlotsBulk { .. } => "post_readiness_slots_bulk",
            Self::AcceptAvailabilityRequest { .. } => "accept_availability_request",
            Self::CompleteReadinessInterview { .. } => "complete_readiness_interview",
        }
    }
}

/// Read-only task view; recomputed from source records on every read and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewTask {
    pub owner: OwnerRef,
    pub title: String,
    pub subtitle: String,
    pub detail: String,
    pub stage: TaskStage,
    pub blockers: Vec<String>,
    pub primary_action: PrimaryAction,
    pub secondary_links: Vec<SecondaryLink>,
}

fn earliest_with_status(slots: &[InterviewSlot], status: SlotStatus) -> Option<&InterviewSlot> {
    slots
        .iter()
        .filter(|slot| slot.status == status)
        .min_by_key(|slot| slot.scheduled_at)
}

fn first_pending(requests: &[AvailabilityRequest]) -> Option<&AvailabilityRequest> {
    requests
        .iter()
        .find(|request| request.status == RequestStatus::Pending)
}

/// Derive one owner's interview task from its current records.
///
/// Total over its inputs: a broken owner record surfaces as a blocked task
/// rather than an error, so one bad row cannot take down the whole feed.
/// `as_of` seeds the default time offered by scheduling actions.
pub fn derive_task<O>(
    owner: &O,
    slots: &[InterviewSlot],
    requests: &[AvailabilityRequest],
    perspective: ActorRole,
    as_of: DateTime<Utc>,
) -> InterviewTask
where
    O: InterviewOwner + ?Sized,
{
    let owner_ref = owner.owner_ref();
    let blockers = owner.unmet_prerequisites();

    let (stage, primary_action) = if !blockers.is_empty() {
        (TaskStage::Blocked, PrimaryAction::OpenDetails)
    } else if owner.recorded_outcome().is_some() {
        (TaskStage::Completed, PrimaryAction::OpenDetails)
    } else if let Some(confirmed) = earliest_with_status(slots, SlotStatus::Confirmed) {
        (
            TaskStage::Scheduled,
            scheduled_action(&owner_ref, confirmed, perspective),
        )
    } else if let Some(action) = pending_work_action(&owner_ref, slots, requests, perspective) {
        (TaskStage::NeedsAction, action)
    } else {
        (
            TaskStage::NeedsAction,
            bootstrap_action(owner, &owner_ref, slots, perspective, as_of),
        )
    };

    InterviewTask {
        owner: owner_ref,
        title: owner.headline(),
        subtitle: owner.subheadline(),
        detail: owner.detail(),
        stage,
        blockers,
        primary_action,
        secondary_links: owner.secondary_links(),
    }
}

fn scheduled_action(
    owner_ref: &OwnerRef,
    confirmed: &InterviewSlot,
    perspective: ActorRole,
) -> PrimaryAction {
    if !perspective.can_review() {
        return PrimaryAction::OpenDetails;
    }

    match owner_ref.kind {
        OwnerKind::Application => PrimaryAction::CompleteHiringInterview {
            application_id: ApplicationId(owner_ref.id.clone()),
            slot_id: confirmed.id.clone(),
        },
        OwnerKind::ReadinessGate => PrimaryAction::CompleteReadinessInterview {
            gate_id: GateId(owner_ref.id.clone()),
            slot_id: Some(confirmed.id.clone()),
        },
    }
}

/// Proposals and pending requests both wait on a reviewer decision;
/// proposed slots take precedence when both exist.
fn pending_work_action(
    owner_ref: &OwnerRef,
    slots: &[InterviewSlot],
    requests: &[AvailabilityRequest],
    perspective: ActorRole,
) -> Option<PrimaryAction> {
    let proposed = earliest_with_status(slots, SlotStatus::Proposed);
    let pending = first_pending(requests);
    if proposed.is_none() && pending.is_none() {
        return None;
    }

    if !perspective.can_review() {
        return Some(PrimaryAction::OpenDetails);
    }

    if let Some(slot) = proposed {
        return Some(match owner_ref.kind {
            OwnerKind::Application => PrimaryAction::ConfirmSlot {
                slot_id: slot.id.clone(),
            },
            OwnerKind::ReadinessGate => PrimaryAction::ConfirmReadinessSlot {
                slot_id: slot.id.clone(),
            },
        });
    }

    pending.map(|request| PrimaryAction::AcceptAvailabilityRequest {
        request_id: request.id.clone(),
    })
}

/// Nothing is in flight, so the action starts scheduling. Reviewers post
/// slots; interviewees ask for times. An application whose slot history
/// fell through entirely falls back to a note-only completion.
fn bootstrap_action<O>(
    owner: &O,
    owner_ref: &OwnerRef,
    slots: &[InterviewSlot],
    perspective: ActorRole,
    as_of: DateTime<Utc>,
) -> PrimaryAction
where
    O: InterviewOwner + ?Sized,
{
    let default_time = as_of + Duration::days(1);

    if !perspective.can_review() {
        return PrimaryAction::RequestAvailability {
            owner: owner_ref.clone(),
            default_time,
        };
    }

    match owner_ref.kind {
        OwnerKind::Application => {
            if slots.is_empty() {
                PrimaryAction::PostSlotsBulk {
                    application_id: ApplicationId(owner_ref.id.clone()),
                    default_time,
                }
            } else {
                PrimaryAction::AddRecommendationNote {
                    application_id: ApplicationId(owner_ref.id.clone()),
                }
            }
        }
        OwnerKind::ReadinessGate => PrimaryAction::PostReadinessSlotsBulk {
            instructor_id: owner.interviewee_id().to_string(),
            gate_id: GateId(owner_ref.id.clone()),
        },
    }
}
