//! Interview scheduling and decision orchestration.
//!
//! One state machine serves both human pipelines: hiring interviews for job
//! applications and certification readiness interviews for instructors. The
//! write side goes through small per-concern services that share a guarded
//! slot store; the read side derives a task feed from the underlying records
//! and never persists it.

pub mod availability;
pub mod completion;
pub mod confirmation;
pub mod derivation;
pub mod domain;
pub mod error;
pub mod proposal;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use availability::AvailabilityRequestService;
pub use completion::InterviewCompletionService;
pub use confirmation::SlotConfirmationService;
pub use derivation::{derive_task, InterviewTask, PrimaryAction, TaskStage};
pub use domain::{
    ActorRole, ApplicationId, ApplicationPhase, ApplicationRecord, AvailabilityRequest, GateId,
    GateStatus, HasOutcome, HasSlots, HiringOutcome, InterviewOutcome, InterviewOwner,
    InterviewSlot, ModuleRequirement, NewSlot, OwnerKind, OwnerRef, ReadinessDecision,
    ReadinessGateRecord, ReadinessOutcome, Recommendation, RequestId, RequestStatus,
    SecondaryLink, SlotId, SlotSpec, SlotStatus,
};
pub use error::{NotFoundError, ScheduleError, ValidationError};
pub use proposal::SlotProposalService;
pub use router::interview_router;
pub use service::{InterviewDeskService, OwnerRecord};
pub use store::{MemorySlotStore, OwnerRepository, SlotStore, StoreError};
