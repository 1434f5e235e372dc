use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for hiring applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for instructor readiness gates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateId(pub String);

/// Identifier wrapper for interview slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub String);

/// Identifier wrapper for availability requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two pipelines an interview can be scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Application,
    ReadinessGate,
}

impl OwnerKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::ReadinessGate => "readiness_gate",
        }
    }
}

/// Polymorphic reference to the record an interview belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    pub kind: OwnerKind,
    pub id: String,
}

impl OwnerRef {
    pub fn application(id: &ApplicationId) -> Self {
        Self {
            kind: OwnerKind::Application,
            id: id.0.clone(),
        }
    }

    pub fn gate(id: &GateId) -> Self {
        Self {
            kind: OwnerKind::ReadinessGate,
            id: id.0.clone(),
        }
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.id)
    }
}

/// Role flags resolved by the surrounding portal and consumed here as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Reviewer,
    Candidate,
    Instructor,
    Admin,
}

impl ActorRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reviewer => "reviewer",
            Self::Candidate => "candidate",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }

    /// Admins hold every reviewer capability.
    pub const fn can_review(self) -> bool {
        matches!(self, Self::Reviewer | Self::Admin)
    }

    /// Roles that sit on the interviewee side of the table.
    pub const fn is_interviewee(self) -> bool {
        matches!(self, Self::Candidate | Self::Instructor)
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Slot lifecycle. Confirmed and Completed are mutually exclusive across
/// siblings of one owner; Superseded and Cancelled are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Proposed,
    Confirmed,
    Completed,
    Superseded,
    Cancelled,
}

impl SlotStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Superseded => "superseded",
            Self::Cancelled => "cancelled",
        }
    }

    /// True for the states that hold the owner's single booking.
    pub const fn is_booked(self) -> bool {
        matches!(self, Self::Confirmed | Self::Completed)
    }

    /// True while the slot can still move somewhere.
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Proposed | Self::Confirmed)
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Availability request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A proposed or confirmed interview time, scoped to one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSlot {
    pub id: SlotId,
    pub owner: OwnerRef,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub meeting_link: Option<String>,
    pub status: SlotStatus,
    pub proposed_by: ActorRole,
}

/// Validated slot attributes handed to the store for creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSlot {
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub meeting_link: Option<String>,
    pub proposed_by: ActorRole,
}

/// Raw inbound slot description; timestamps are parsed during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub scheduled_at: String,
    pub duration_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
}

/// Interviewee-submitted preferred time windows awaiting reviewer acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub id: RequestId,
    pub owner: OwnerRef,
    pub preferred_windows: Vec<DateTime<Utc>>,
    pub note: Option<String>,
    pub status: RequestStatus,
    pub submitted_by: ActorRole,
}

/// Hiring recommendation scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongYes,
    Yes,
    Maybe,
    No,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::StrongYes => "strong yes",
            Self::Yes => "yes",
            Self::Maybe => "maybe",
            Self::No => "no",
        }
    }
}

/// Terminal decision for a readiness interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessDecision {
    Pass,
    Hold,
    Fail,
    Waive,
}

impl ReadinessDecision {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Hold => "hold",
            Self::Fail => "fail",
            Self::Waive => "waive",
        }
    }

    /// Waivers bypass scheduling entirely; every other decision is recorded
    /// against a confirmed slot.
    pub const fn requires_slot(self) -> bool {
        !matches!(self, Self::Waive)
    }
}

impl fmt::Display for ReadinessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Terminal record for a completed hiring interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiringOutcome {
    pub recommendation: Recommendation,
    pub content: String,
    pub strengths: Option<String>,
    pub concerns: Option<String>,
    pub slot_id: Option<SlotId>,
    pub recorded_at: DateTime<Utc>,
}

/// Terminal record for a completed readiness interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessOutcome {
    pub decision: ReadinessDecision,
    pub review_notes: Option<String>,
    pub slot_id: Option<SlotId>,
    pub recorded_at: DateTime<Utc>,
}

/// Unified view over either pipeline's terminal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InterviewOutcome {
    Hiring(HiringOutcome),
    Readiness(ReadinessOutcome),
}

impl InterviewOutcome {
    pub fn summary(&self) -> String {
        match self {
            InterviewOutcome::Hiring(outcome) => {
                format!("interview complete: {}", outcome.recommendation.label())
            }
            InterviewOutcome::Readiness(outcome) => {
                format!("readiness decision: {}", outcome.decision.label())
            }
        }
    }
}

/// Application pipeline phase tracked by the surrounding portal. Completing
/// the interview advances the record into decisioning; what happens there is
/// outside this subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationPhase {
    Screening,
    Interviewing,
    Decision,
    Accepted,
    Rejected,
}

impl ApplicationPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Screening => "screening",
            Self::Interviewing => "interviewing",
            Self::Decision => "decision",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// A job application whose interview this subsystem schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub candidate_id: String,
    pub candidate_name: String,
    pub position: String,
    pub phase: ApplicationPhase,
    pub screening_complete: bool,
    pub outcome: Option<HiringOutcome>,
}

/// Certification gate status, advanced by the recorded readiness decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    Pending,
    Certified,
    OnHold,
    Failed,
    Waived,
}

impl GateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Certified => "certified",
            Self::OnHold => "on_hold",
            Self::Failed => "failed",
            Self::Waived => "waived",
        }
    }
}

/// One required training module on a readiness checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRequirement {
    pub name: String,
    pub completed: bool,
}

/// An instructor's certification readiness gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessGateRecord {
    pub id: GateId,
    pub instructor_id: String,
    pub instructor_name: String,
    pub certification: String,
    pub required_modules: Vec<ModuleRequirement>,
    pub status: GateStatus,
    pub outcome: Option<ReadinessOutcome>,
}

impl ReadinessGateRecord {
    pub fn incomplete_module_count(&self) -> usize {
        self.required_modules
            .iter()
            .filter(|module| !module.completed)
            .count()
    }
}

/// A link a renderer can place next to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryLink {
    pub label: String,
    pub href: String,
}

/// Capability: the record can own interview slots.
pub trait HasSlots {
    fn owner_ref(&self) -> OwnerRef;

    /// The portal user the interview is about (candidate or instructor).
    fn interviewee_id(&self) -> &str;

    /// Human-readable reasons scheduling is not yet allowed. Empty when the
    /// owner is ready to schedule.
    fn unmet_prerequisites(&self) -> Vec<String>;
}

/// Capability: the record can carry a terminal interview outcome.
pub trait HasOutcome {
    fn recorded_outcome(&self) -> Option<InterviewOutcome>;
}

/// Presentation surface shared by both pipelines so task derivation is
/// written once.
pub trait InterviewOwner: HasSlots + HasOutcome {
    fn headline(&self) -> String;
    fn subheadline(&self) -> String;
    fn detail(&self) -> String;
    fn secondary_links(&self) -> Vec<SecondaryLink>;
}

impl HasSlots for ApplicationRecord {
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::application(&self.id)
    }

    fn interviewee_id(&self) -> &str {
        &self.candidate_id
    }

    fn unmet_prerequisites(&self) -> Vec<String> {
        if self.screening_complete {
            Vec::new()
        } else {
            vec![format!(
                "screening for {} has not been completed",
                self.candidate_name
            )]
        }
    }
}

impl HasOutcome for ApplicationRecord {
    fn recorded_outcome(&self) -> Option<InterviewOutcome> {
        self.outcome.clone().map(InterviewOutcome::Hiring)
    }
}

impl InterviewOwner for ApplicationRecord {
    fn headline(&self) -> String {
        format!("Hiring interview: {}", self.candidate_name)
    }

    fn subheadline(&self) -> String {
        self.position.clone()
    }

    fn detail(&self) -> String {
        match &self.outcome {
            Some(outcome) => format!(
                "application {} ({})",
                self.phase.label(),
                outcome.recommendation.label()
            ),
            None => format!("application {}", self.phase.label()),
        }
    }

    fn secondary_links(&self) -> Vec<SecondaryLink> {
        vec![SecondaryLink {
            label: "View application".to_string(),
            href: format!("/applications/{}", self.id),
        }]
    }
}

impl HasSlots for ReadinessGateRecord {
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::gate(&self.id)
    }

    fn interviewee_id(&self) -> &str {
        &self.instructor_id
    }

    fn unmet_prerequisites(&self) -> Vec<String> {
        let incomplete = self.incomplete_module_count();
        if incomplete == 0 {
            Vec::new()
        } else {
            vec![format!(
                "{incomplete} of {} required modules incomplete",
                self.required_modules.len()
            )]
        }
    }
}

impl HasOutcome for ReadinessGateRecord {
    fn recorded_outcome(&self) -> Option<InterviewOutcome> {
        self.outcome.clone().map(InterviewOutcome::Readiness)
    }
}

impl InterviewOwner for ReadinessGateRecord {
    fn headline(&self) -> String {
        format!("Readiness interview: {}", self.instructor_name)
    }

    fn subheadline(&self) -> String {
        self.certification.clone()
    }

    fn detail(&self) -> String {
        format!(
            "gate {} ({} of {} modules complete)",
            self.status.label(),
            self.required_modules.len() - self.incomplete_module_count(),
            self.required_modules.len()
        )
    }

    fn secondary_links(&self) -> Vec<SecondaryLink> {
        vec![
            SecondaryLink {
                label: "View readiness checklist".to_string(),
                href: format!("/instructors/{}/readiness/{}", self.instructor_id, self.id),
            },
            SecondaryLink {
                label: "View instructor profile".to_string(),
                href: format!("/instructors/{}", self.instructor_id),
            },
        ]
    }
}
