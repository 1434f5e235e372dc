use super::domain::{ApplicationId, GateId, RequestId, SlotId};
use super::store::StoreError;

/// Field-level problems caught before anything touches storage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("between 1 and 3 slot times are required, got {found}")]
    SlotCountOutOfRange { found: usize },
    #[error("between 1 and 3 preferred windows are required, got {found}")]
    WindowCountOutOfRange { found: usize },
    #[error("duration must be between 15 and 180 minutes, got {minutes}")]
    DurationOutOfRange { minutes: i64 },
    #[error("could not parse '{raw}' as an RFC 3339 timestamp")]
    UnparseableTimestamp { raw: String },
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },
    #[error("gate {gate} does not belong to instructor {instructor}")]
    GateOwnerMismatch { gate: GateId, instructor: String },
}

/// Lookup failures for the identifiers the command surface accepts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotFoundError {
    #[error("application {0} not found")]
    Application(ApplicationId),
    #[error("readiness gate {0} not found")]
    Gate(GateId),
    #[error("no readiness gate exists for instructor {0}")]
    GateForInstructor(String),
    #[error("interview slot {0} not found")]
    Slot(SlotId),
    #[error("availability request {0} not found")]
    Request(RequestId),
}

/// Error surface of every scheduling command.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error("scheduling conflict: {0}")]
    Conflict(String),
    #[error("not permitted: {0}")]
    Authorization(String),
    #[error("invalid state: {0}")]
    State(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for ScheduleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlotNotFound(id) => Self::NotFound(NotFoundError::Slot(id)),
            StoreError::RequestNotFound(id) => Self::NotFound(NotFoundError::Request(id)),
            StoreError::EmptySlotBatch => {
                Self::Validation(ValidationError::SlotCountOutOfRange { found: 0 })
            }
            StoreError::Unavailable(message) => Self::Unavailable(message),
            conflict => Self::Conflict(conflict.to_string()),
        }
    }
}
