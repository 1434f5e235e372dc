use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::workflows::interviews::domain::{
    ApplicationId, ApplicationPhase, ApplicationRecord, GateId, GateStatus, ModuleRequirement,
    ReadinessGateRecord, SlotSpec,
};
use crate::workflows::interviews::router::interview_router;
use crate::workflows::interviews::service::InterviewDeskService;
use crate::workflows::interviews::store::{MemorySlotStore, OwnerRepository, StoreError};

pub(super) const CANDIDATE_ID: &str = "cand-0007";
pub(super) const INSTRUCTOR_ID: &str = "inst-0004";

pub(super) fn application() -> ApplicationRecord {
    ApplicationRecord {
        id: ApplicationId("app-1001".to_string()),
        candidate_id: CANDIDATE_ID.to_string(),
        candidate_name: "Dana Whitfield".to_string(),
        position: "Course Facilitator".to_string(),
        phase: ApplicationPhase::Interviewing,
        screening_complete: true,
        outcome: None,
    }
}

pub(super) fn unscreened_application() -> ApplicationRecord {
    ApplicationRecord {
        id: ApplicationId("app-1002".to_string()),
        candidate_id: "cand-0008".to_string(),
        candidate_name: "Theo Marsh".to_string(),
        position: "Program Coordinator".to_string(),
        phase: ApplicationPhase::Screening,
        screening_complete: false,
        outcome: None,
    }
}

pub(super) fn gate() -> ReadinessGateRecord {
    ReadinessGateRecord {
        id: GateId("gate-2001".to_string()),
        instructor_id: INSTRUCTOR_ID.to_string(),
        instructor_name: "Priya Raman".to_string(),
        certification: "Advanced Facilitation".to_string(),
        required_modules: (1..=5)
            .map(|n| ModuleRequirement {
                name: format!("Module {n}"),
                completed: true,
            })
            .collect(),
        status: GateStatus::Pending,
        outcome: None,
    }
}

pub(super) fn blocked_gate() -> ReadinessGateRecord {
    let mut gate = gate();
    gate.id = GateId("gate-2002".to_string());
    gate.instructor_id = "inst-0005".to_string();
    gate.instructor_name = "Miguel Santos".to_string();
    for module in gate.required_modules.iter_mut().take(3) {
        module.completed = false;
    }
    gate
}

pub(super) fn as_of() -> DateTime<Utc> {
    ts("2026-03-08T12:00:00Z")
}

pub(super) fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("valid fixture timestamp")
        .with_timezone(&Utc)
}

pub(super) fn slot_specs(times: &[&str]) -> Vec<SlotSpec> {
    times
        .iter()
        .map(|time| SlotSpec {
            scheduled_at: (*time).to_string(),
            duration_minutes: 60,
            meeting_link: Some("https://meet.example.com/interview".to_string()),
        })
        .collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryOwners {
    applications: Arc<Mutex<HashMap<String, ApplicationRecord>>>,
    gates: Arc<Mutex<HashMap<String, ReadinessGateRecord>>>,
}

impl MemoryOwners {
    pub(super) fn seed_application(&self, record: ApplicationRecord) {
        self.applications
            .lock()
            .expect("owner mutex poisoned")
            .insert(record.id.0.clone(), record);
    }

    pub(super) fn seed_gate(&self, record: ReadinessGateRecord) {
        self.gates
            .lock()
            .expect("owner mutex poisoned")
            .insert(record.id.0.clone(), record);
    }
}

impl OwnerRepository for MemoryOwners {
    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        let guard = self.applications.lock().expect("owner mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn update_application(&self, record: ApplicationRecord) -> Result<(), StoreError> {
        let mut guard = self.applications.lock().expect("owner mutex poisoned");
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn list_applications(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        let guard = self.applications.lock().expect("owner mutex poisoned");
        let mut records: Vec<ApplicationRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
    }

    fn fetch_gate(&self, id: &GateId) -> Result<Option<ReadinessGateRecord>, StoreError> {
        let guard = self.gates.lock().expect("owner mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn gate_for_instructor(
        &self,
        instructor_id: &str,
    ) -> Result<Option<ReadinessGateRecord>, StoreError> {
        let guard = self.gates.lock().expect("owner mutex poisoned");
        Ok(guard
            .values()
            .find(|gate| gate.instructor_id == instructor_id)
            .cloned())
    }

    fn update_gate(&self, record: ReadinessGateRecord) -> Result<(), StoreError> {
        let mut guard = self.gates.lock().expect("owner mutex poisoned");
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn list_gates(&self) -> Result<Vec<ReadinessGateRecord>, StoreError> {
        let guard = self.gates.lock().expect("owner mutex poisoned");
        let mut records: Vec<ReadinessGateRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
    }
}

pub(super) type Desk = InterviewDeskService<MemorySlotStore, MemoryOwners>;

pub(super) fn build_desk() -> (Arc<Desk>, Arc<MemorySlotStore>, Arc<MemoryOwners>) {
    let store = Arc::new(MemorySlotStore::new());
    let owners = Arc::new(MemoryOwners::default());
    owners.seed_application(application());
    owners.seed_gate(gate());
    let desk = Arc::new(InterviewDeskService::new(store.clone(), owners.clone()));
    (desk, store, owners)
}

pub(super) fn desk_router() -> (axum::Router, Arc<Desk>) {
    let (desk, _, _) = build_desk();
    (interview_router(desk.clone()), desk)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
