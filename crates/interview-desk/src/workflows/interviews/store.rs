use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{
    ActorRole, ApplicationId, ApplicationRecord, AvailabilityRequest, GateId, InterviewSlot,
    NewSlot, OwnerRef, ReadinessGateRecord, RequestId, RequestStatus, SlotId, SlotStatus,
};

/// Error enumeration for slot and request storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("interview slot {0} not found")]
    SlotNotFound(SlotId),
    #[error("availability request {0} not found")]
    RequestNotFound(RequestId),
    #[error("slot {slot_id} is {found}, expected {expected}")]
    SlotTransitionConflict {
        slot_id: SlotId,
        expected: SlotStatus,
        found: SlotStatus,
    },
    #[error("{0} already has a confirmed or completed interview slot")]
    OwnerAlreadyBooked(OwnerRef),
    #[error("availability request {request_id} is already {status}")]
    RequestAlreadyResolved {
        request_id: RequestId,
        status: RequestStatus,
    },
    #[error("at least one slot is required")]
    EmptySlotBatch,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence contract for interview slots and availability requests.
///
/// `transition_slot` is a guarded compare-and-set: the slot must currently be
/// in `from`, and a transition into `Confirmed` additionally requires that no
/// sibling of the same owner is already booked. Confirming supersedes every
/// remaining proposed sibling inside the same guarded operation, so
/// concurrent confirmations of siblings resolve to exactly one winner.
pub trait SlotStore: Send + Sync {
    /// Create 1..=3 proposed slots for an owner, all or nothing.
    fn create_slots(
        &self,
        owner: OwnerRef,
        slots: Vec<NewSlot>,
    ) -> Result<Vec<InterviewSlot>, StoreError>;

    fn get_slot(&self, id: &SlotId) -> Result<Option<InterviewSlot>, StoreError>;

    fn slots_for_owner(&self, owner: &OwnerRef) -> Result<Vec<InterviewSlot>, StoreError>;

    fn transition_slot(
        &self,
        id: &SlotId,
        from: SlotStatus,
        to: SlotStatus,
    ) -> Result<InterviewSlot, StoreError>;

    fn insert_request(
        &self,
        owner: OwnerRef,
        preferred_windows: Vec<DateTime<Utc>>,
        note: Option<String>,
        submitted_by: ActorRole,
    ) -> Result<AvailabilityRequest, StoreError>;

    fn get_request(&self, id: &RequestId) -> Result<Option<AvailabilityRequest>, StoreError>;

    fn requests_for_owner(&self, owner: &OwnerRef)
        -> Result<Vec<AvailabilityRequest>, StoreError>;

    /// Accept a pending request: flip it to accepted and create exactly one
    /// confirmed slot for its owner, inside one guarded operation. Refused
    /// when the request is already resolved or the owner is already booked.
    fn accept_request(
        &self,
        id: &RequestId,
        slot: NewSlot,
    ) -> Result<(InterviewSlot, AvailabilityRequest), StoreError>;

    fn decline_request(&self, id: &RequestId) -> Result<AvailabilityRequest, StoreError>;
}

/// Storage abstraction over the owner records the portal maintains.
pub trait OwnerRepository: Send + Sync {
    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<ApplicationRecord>, StoreError>;
    fn update_application(&self, record: ApplicationRecord) -> Result<(), StoreError>;
    fn list_applications(&self) -> Result<Vec<ApplicationRecord>, StoreError>;

    fn fetch_gate(&self, id: &GateId) -> Result<Option<ReadinessGateRecord>, StoreError>;
    fn gate_for_instructor(
        &self,
        instructor_id: &str,
    ) -> Result<Option<ReadinessGateRecord>, StoreError>;
    fn update_gate(&self, record: ReadinessGateRecord) -> Result<(), StoreError>;
    fn list_gates(&self) -> Result<Vec<ReadinessGateRecord>, StoreError>;
}

#[derive(Debug, Default)]
struct SlotTables {
    slots: BTreeMap<String, InterviewSlot>,
    requests: BTreeMap<String, AvailabilityRequest>,
}

/// In-memory slot store. A single mutex around both tables makes every
/// read-modify-write one atomic guard, which is the concurrency primitive
/// the confirmation race relies on.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    tables: Mutex<SlotTables>,
    slot_seq: AtomicU64,
    request_seq: AtomicU64,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, SlotTables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("slot store mutex poisoned".to_string()))
    }

    fn next_slot_id(&self) -> SlotId {
        let id = self.slot_seq.fetch_add(1, Ordering::Relaxed) + 1;
        SlotId(format!("slot-{id:06}"))
    }

    fn next_request_id(&self) -> RequestId {
        let id = self.request_seq.fetch_add(1, Ordering::Relaxed) + 1;
        RequestId(format!("req-{id:06}"))
    }

    fn owner_booked(tables: &SlotTables, owner: &OwnerRef) -> bool {
        tables
            .slots
            .values()
            .any(|slot| &slot.owner == owner && slot.status.is_booked())
    }
}

impl SlotStore for MemorySlotStore {
    fn create_slots(
        &self,
        owner: OwnerRef,
        slots: Vec<NewSlot>,
    ) -> Result<Vec<InterviewSlot>, StoreError> {
        if slots.is_empty() {
            return Err(StoreError::EmptySlotBatch);
        }

        let mut tables = self.tables()?;
        let created: Vec<InterviewSlot> = slots
            .into_iter()
            .map(|spec| InterviewSlot {
                id: self.next_slot_id(),
                owner: owner.clone(),
                scheduled_at: spec.scheduled_at,
                duration_minutes: spec.duration_minutes,
                meeting_link: spec.meeting_link,
                status: SlotStatus::Proposed,
                proposed_by: spec.proposed_by,
            })
            .collect();

        for slot in &created {
            tables.slots.insert(slot.id.0.clone(), slot.clone());
        }

        Ok(created)
    }

    fn get_slot(&self, id: &SlotId) -> Result<Option<InterviewSlot>, StoreError> {
        let tables = self.tables()?;
        Ok(tables.slots.get(&id.0).cloned())
    }

    fn slots_for_owner(&self, owner: &OwnerRef) -> Result<Vec<InterviewSlot>, StoreError> {
        let tables = self.tables()?;
        let mut slots: Vec<InterviewSlot> = tables
            .slots
            .values()
            .filter(|slot| &slot.owner == owner)
            .cloned()
            .collect();
        slots.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        Ok(slots)
    }

    fn transition_slot(
        &self,
        id: &SlotId,
        from: SlotStatus,
        to: SlotStatus,
    ) -> Result<InterviewSlot, StoreError> {
        let mut tables = self.tables()?;

        let current = tables
            .slots
            .get(&id.0)
            .ok_or_else(|| StoreError::SlotNotFound(id.clone()))?
            .clone();

        if current.status != from {
            return Err(StoreError::SlotTransitionConflict {
                slot_id: id.clone(),
                expected: from,
                found: current.status,
            });
        }

        if to == SlotStatus::Confirmed {
            let sibling_booked = tables
                .slots
                .values()
                .any(|slot| slot.owner == current.owner && slot.id != current.id && slot.status.is_booked());
            if sibling_booked {
                return Err(StoreError::OwnerAlreadyBooked(current.owner));
            }

            let sibling_ids: Vec<String> = tables
                .slots
                .values()
                .filter(|slot| {
                    slot.owner == current.owner
                        && slot.id != current.id
                        && slot.status == SlotStatus::Proposed
                })
                .map(|slot| slot.id.0.clone())
                .collect();
            for sibling_id in sibling_ids {
                if let Some(sibling) = tables.slots.get_mut(&sibling_id) {
                    sibling.status = SlotStatus::Superseded;
                }
            }
        }

        let slot = tables
            .slots
            .get_mut(&id.0)
            .ok_or_else(|| StoreError::SlotNotFound(id.clone()))?;
        slot.status = to;
        Ok(slot.clone())
    }

    fn insert_request(
        &self,
        owner: OwnerRef,
        preferred_windows: Vec<DateTime<Utc>>,
        note: Option<String>,
        submitted_by: ActorRole,
    ) -> Result<AvailabilityRequest, StoreError> {
        let mut tables = self.tables()?;
        let request = AvailabilityRequest {
            id: self.next_request_id(),
            owner,
            preferred_windows,
            note,
            status: RequestStatus::Pending,
            submitted_by,
        };
        tables.requests.insert(request.id.0.clone(), request.clone());
        Ok(request)
    }

    fn get_request(&self, id: &RequestId) -> Result<Option<AvailabilityRequest>, StoreError> {
        let tables = self.tables()?;
        Ok(tables.requests.get(&id.0).cloned())
    }

    fn requests_for_owner(
        &self,
        owner: &OwnerRef,
    ) -> Result<Vec<AvailabilityRequest>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .requests
            .values()
            .filter(|request| &request.owner == owner)
            .cloned()
            .collect())
    }

    fn accept_request(
        &self,
        id: &RequestId,
        slot: NewSlot,
    ) -> Result<(InterviewSlot, AvailabilityRequest), StoreError> {
        let mut tables = self.tables()?;

        let request = tables
            .requests
            .get(&id.0)
            .ok_or_else(|| StoreError::RequestNotFound(id.clone()))?
            .clone();

        if request.status != RequestStatus::Pending {
            return Err(StoreError::RequestAlreadyResolved {
                request_id: id.clone(),
                status: request.status,
            });
        }

        if Self::owner_booked(&tables, &request.owner) {
            return Err(StoreError::OwnerAlreadyBooked(request.owner));
        }

        let confirmed = InterviewSlot {
            id: self.next_slot_id(),
            owner: request.owner.clone(),
            scheduled_at: slot.scheduled_at,
            duration_minutes: slot.duration_minutes,
            meeting_link: slot.meeting_link,
            status: SlotStatus::Confirmed,
            proposed_by: slot.proposed_by,
        };
        tables
            .slots
            .insert(confirmed.id.0.clone(), confirmed.clone());

        let stored = tables
            .requests
            .get_mut(&id.0)
            .ok_or_else(|| StoreError::RequestNotFound(id.clone()))?;
        stored.status = RequestStatus::Accepted;
        let accepted = stored.clone();

        Ok((confirmed, accepted))
    }

    fn decline_request(&self, id: &RequestId) -> Result<AvailabilityRequest, StoreError> {
        let mut tables = self.tables()?;

        let request = tables
            .requests
            .get_mut(&id.0)
            .ok_or_else(|| StoreError::RequestNotFound(id.clone()))?;

        if request.status != RequestStatus::Pending {
            return Err(StoreError::RequestAlreadyResolved {
                request_id: id.clone(),
                status: request.status,
            });
        }

        request.status = RequestStatus::Declined;
        Ok(request.clone())
    }
}
