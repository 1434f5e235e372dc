use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

use interview_desk::workflows::interviews::{
    ApplicationId, ApplicationPhase, ApplicationRecord, GateId, GateStatus, ModuleRequirement,
    OwnerRepository, ReadinessGateRecord, StoreError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory owner directory backing the service until the portal's record
/// store is wired in.
#[derive(Default, Clone)]
pub(crate) struct InMemoryOwnerRepository {
    applications: Arc<Mutex<HashMap<String, ApplicationRecord>>>,
    gates: Arc<Mutex<HashMap<String, ReadinessGateRecord>>>,
}

impl InMemoryOwnerRepository {
    pub(crate) fn insert_application(&self, record: ApplicationRecord) {
        self.applications
            .lock()
            .expect("owner mutex poisoned")
            .insert(record.id.0.clone(), record);
    }

    pub(crate) fn insert_gate(&self, record: ReadinessGateRecord) {
        self.gates
            .lock()
            .expect("owner mutex poisoned")
            .insert(record.id.0.clone(), record);
    }
}

impl OwnerRepository for InMemoryOwnerRepository {
    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        let guard = self.applications.lock().expect("owner mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn update_application(&self, record: ApplicationRecord) -> Result<(), StoreError> {
        let mut guard = self.applications.lock().expect("owner mutex poisoned");
        if guard.contains_key(&record.id.0) {
            guard.insert(record.id.0.clone(), record);
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "application {} is not registered",
                record.id
            )))
        }
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
        if guard.contains_key(&record.id.0) {
            guard.insert(record.id.0.clone(), record);
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "gate {} is not registered",
                record.id
            )))
        }
    }

    fn list_gates(&self) -> Result<Vec<ReadinessGateRecord>, StoreError> {
        let guard = self.gates.lock().expect("owner mutex poisoned");
        let mut records: Vec<ReadinessGateRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
    }
}

/// Seed a handful of owners so a fresh in-memory service has something to
/// schedule against.
pub(crate) fn seed_demo_owners(repository: &InMemoryOwnerRepository) {
    repository.insert_application(ApplicationRecord {
        id: ApplicationId("app-1001".to_string()),
        candidate_id: "cand-0007".to_string(),
        candidate_name: "Dana Whitfield".to_string(),
        position: "Course Facilitator".to_string(),
        phase: ApplicationPhase::Interviewing,
        screening_complete: true,
        outcome: None,
    });
    repository.insert_application(ApplicationRecord {
        id: ApplicationId("app-1002".to_string()),
        candidate_id: "cand-0011".to_string(),
        candidate_name: "Theo Marsh".to_string(),
        position: "Program Coordinator".to_string(),
        phase: ApplicationPhase::Screening,
        screening_complete: false,
        outcome: None,
    });
    repository.insert_gate(ReadinessGateRecord {
        id: GateId("gate-2001".to_string()),
        instructor_id: "inst-0004".to_string(),
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
    });
    repository.insert_gate(ReadinessGateRecord {
        id: GateId("gate-2002".to_string()),
        instructor_id: "inst-0005".to_string(),
        instructor_name: "Miguel Santos".to_string(),
        certification: "Assessment Design".to_string(),
        required_modules: (1..=5)
            .map(|n| ModuleRequirement {
                name: format!("Module {n}"),
                completed: n > 3,
            })
            .collect(),
        status: GateStatus::Pending,
        outcome: None,
    });
}

pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}
