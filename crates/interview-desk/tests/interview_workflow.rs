//! Integration specifications for the interview scheduling workflow.
//!
//! Scenarios run end to end through the public service facade and HTTP
//! router, covering both pipelines: hiring interviews for applications and
//! readiness interviews for instructor certification gates.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Utc};

    use interview_desk::workflows::interviews::{
        ApplicationId, ApplicationPhase, ApplicationRecord, GateId, GateStatus,
        InterviewDeskService, MemorySlotStore, ModuleRequirement, OwnerRepository,
        ReadinessGateRecord, SlotSpec, StoreError,
    };

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
                meeting_link: None,
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
                .expect("lock")
                .insert(record.id.0.clone(), record);
        }

        pub(super) fn seed_gate(&self, record: ReadinessGateRecord) {
            self.gates
                .lock()
                .expect("lock")
                .insert(record.id.0.clone(), record);
        }
    }

    impl OwnerRepository for MemoryOwners {
        fn fetch_application(
            &self,
            id: &ApplicationId,
        ) -> Result<Option<ApplicationRecord>, StoreError> {
            Ok(self.applications.lock().expect("lock").get(&id.0).cloned())
        }

        fn update_application(&self, record: ApplicationRecord) -> Result<(), StoreError> {
            self.applications
                .lock()
                .expect("lock")
                .insert(record.id.0.clone(), record);
            Ok(())
        }

        fn list_applications(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
            Ok(self
                .applications
                .lock()
                .expect("lock")
                .values()
                .cloned()
                .collect())
        }

        fn fetch_gate(&self, id: &GateId) -> Result<Option<ReadinessGateRecord>, StoreError> {
            Ok(self.gates.lock().expect("lock").get(&id.0).cloned())
        }

        fn gate_for_instructor(
            &self,
            instructor_id: &str,
        ) -> Result<Option<ReadinessGateRecord>, StoreError> {
            Ok(self
                .gates
                .lock()
                .expect("lock")
                .values()
                .find(|gate| gate.instructor_id == instructor_id)
                .cloned())
        }

        fn update_gate(&self, record: ReadinessGateRecord) -> Result<(), StoreError> {
            self.gates
                .lock()
                .expect("lock")
                .insert(record.id.0.clone(), record);
            Ok(())
        }

        fn list_gates(&self) -> Result<Vec<ReadinessGateRecord>, StoreError> {
            Ok(self.gates.lock().expect("lock").values().cloned().collect())
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
}

mod scheduling {
    use super::common::*;
    use interview_desk::workflows::interviews::{
        ActorRole, HasSlots, PrimaryAction, ScheduleError, SlotStatus, SlotStore, TaskStage,
    };

    #[test]
    fn posting_then_confirming_schedules_the_interview() {
        let (desk, store, _) = build_desk();

        let task = desk
            .post_application_interview_slots_bulk(
                &application().id,
                slot_specs(&[
                    "2026-03-09T09:00:00Z",
                    "2026-03-09T11:00:00Z",
                    "2026-03-09T13:00:00Z",
                ]),
                ActorRole::Reviewer,
            )
            .expect("posting succeeds");
        assert_eq!(task.stage, TaskStage::NeedsAction);

        let slots = store
            .slots_for_owner(&application().owner_ref())
            .expect("list succeeds");
        assert_eq!(slots.len(), 3);
        assert!(slots.iter().all(|slot| slot.status == SlotStatus::Proposed));

        let middle = slots
            .iter()
            .find(|slot| slot.scheduled_at == ts("2026-03-09T11:00:00Z"))
            .expect("middle slot present");
        let task = desk
            .confirm_interview_slot(&middle.id, ActorRole::Reviewer)
            .expect("confirmation succeeds");
        assert_eq!(task.stage, TaskStage::Scheduled);

        let refreshed = store
            .slots_for_owner(&application().owner_ref())
            .expect("list succeeds");
        assert_eq!(
            refreshed
                .iter()
                .filter(|slot| slot.status == SlotStatus::Confirmed)
                .count(),
            1
        );
        assert_eq!(
            refreshed
                .iter()
                .filter(|slot| slot.status == SlotStatus::Superseded)
                .count(),
            2
        );
    }

    #[test]
    fn concurrent_confirmations_of_siblings_resolve_to_one_winner() {
        let (desk, store, _) = build_desk();

        desk.post_application_interview_slots_bulk(
            &application().id,
            slot_specs(&["2026-03-09T09:00:00Z", "2026-03-09T11:00:00Z"]),
            ActorRole::Reviewer,
        )
        .expect("posting succeeds");

        let slots = store
            .slots_for_owner(&application().owner_ref())
            .expect("list succeeds");
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(2));

        let handles: Vec<_> = slots
            .iter()
            .map(|slot| {
                let desk = desk.clone();
                let barrier = barrier.clone();
                let slot_id = slot.id.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    desk.confirm_interview_slot(&slot_id, ActorRole::Reviewer)
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread completes"))
            .collect();

        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
        assert!(results.iter().any(|result| matches!(
            result,
            Err(ScheduleError::Conflict(_))
        )));

        let refreshed = store
            .slots_for_owner(&application().owner_ref())
            .expect("list succeeds");
        assert_eq!(
            refreshed
                .iter()
                .filter(|slot| slot.status.is_booked())
                .count(),
            1
        );
    }

    #[test]
    fn the_feed_orders_actionable_work_first() {
        let (desk, _, owners) = build_desk();
        owners.seed_gate(blocked_gate());

        let tasks = desk
            .list_interview_tasks(ActorRole::Reviewer, "", ts("2026-03-08T12:00:00Z"))
            .expect("listing succeeds");

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].stage, TaskStage::NeedsAction);
        assert_eq!(tasks.last().expect("non-empty").stage, TaskStage::Blocked);
        assert!(tasks
            .iter()
            .all(|task| !matches!(task.primary_action, PrimaryAction::CompleteHiringInterview { .. })));
    }
}

mod completion {
    use super::common::*;
    use interview_desk::workflows::interviews::{
        ActorRole, ApplicationPhase, GateStatus, HasSlots, OwnerRepository, ReadinessDecision,
        Recommendation, ScheduleError, SlotStatus, SlotStore, TaskStage,
    };

    #[test]
    fn recording_a_recommendation_closes_the_application_interview() {
        let (desk, store, owners) = build_desk();

        desk.post_application_interview_slots_bulk(
            &application().id,
            slot_specs(&["2026-03-09T09:00:00Z"]),
            ActorRole::Reviewer,
        )
        .expect("posting succeeds");
        let slot = store
            .slots_for_owner(&application().owner_ref())
            .expect("list succeeds")
            .remove(0);
        desk.confirm_interview_slot(&slot.id, ActorRole::Reviewer)
            .expect("confirmation succeeds");

        let task = desk
            .complete_application_interview_and_note(
                &application().id,
                &slot.id,
                Recommendation::Yes,
                "Ready for a senior cohort.".to_string(),
                None,
                None,
                ActorRole::Reviewer,
            )
            .expect("completion succeeds");
        assert_eq!(task.stage, TaskStage::Completed);

        let stored = owners
            .fetch_application(&application().id)
            .expect("fetch succeeds")
            .expect("record present");
        assert_eq!(stored.phase, ApplicationPhase::Decision);
        assert!(stored.outcome.is_some());

        let completed_slot = store
            .get_slot(&slot.id)
            .expect("fetch succeeds")
            .expect("slot present");
        assert_eq!(completed_slot.status, SlotStatus::Completed);

        match desk.post_application_interview_slots_bulk(
            &application().id,
            slot_specs(&["2026-03-20T09:00:00Z"]),
            ActorRole::Reviewer,
        ) {
            Err(ScheduleError::State(_)) => {}
            other => panic!("expected state error, got {other:?}"),
        }
    }

    #[test]
    fn waive_is_admin_only_and_leaves_the_gate_untouched_on_refusal() {
        let (desk, _, owners) = build_desk();
        owners.seed_gate(blocked_gate());

        match desk.complete_instructor_interview_and_set_outcome(
            &blocked_gate().id,
            None,
            ReadinessDecision::Waive,
            None,
            ActorRole::Instructor,
        ) {
            Err(ScheduleError::Authorization(_)) => {}
            other => panic!("expected authorization error, got {other:?}"),
        }

        let untouched = owners
            .fetch_gate(&blocked_gate().id)
            .expect("fetch succeeds")
            .expect("record present");
        assert_eq!(untouched.status, GateStatus::Pending);
        assert!(untouched.outcome.is_none());

        desk.complete_instructor_interview_and_set_outcome(
            &blocked_gate().id,
            None,
            ReadinessDecision::Waive,
            Some("Waived by the certification board.".to_string()),
            ActorRole::Admin,
        )
        .expect("admin waive succeeds");

        let waived = owners
            .fetch_gate(&blocked_gate().id)
            .expect("fetch succeeds")
            .expect("record present");
        assert_eq!(waived.status, GateStatus::Waived);
    }
}

mod availability {
    use super::common::*;
    use interview_desk::workflows::interviews::{
        ActorRole, HasSlots, RequestStatus, ScheduleError, SlotStatus, SlotStore, TaskStage,
    };

    #[test]
    fn a_preferred_window_becomes_the_confirmed_slot() {
        let (desk, store, _) = build_desk();

        desk.submit_interview_availability_request(
            INSTRUCTOR_ID,
            vec![
                "2026-03-10T15:00:00Z".to_string(),
                "2026-03-12T10:00:00Z".to_string(),
            ],
            Some("Prefer mid-morning".to_string()),
            ActorRole::Instructor,
        )
        .expect("submission succeeds");

        let request = store
            .requests_for_owner(&gate().owner_ref())
            .expect("list succeeds")
            .remove(0);

        let task = desk
            .accept_interview_availability_request(
                &request.id,
                "2026-03-12T10:00:00Z",
                45,
                None,
                ActorRole::Reviewer,
            )
            .expect("accept succeeds");
        assert_eq!(task.stage, TaskStage::Scheduled);

        let slots = store
            .slots_for_owner(&gate().owner_ref())
            .expect("list succeeds");
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].status, SlotStatus::Confirmed);
        assert_eq!(slots[0].scheduled_at, ts("2026-03-12T10:00:00Z"));
        assert_eq!(slots[0].duration_minutes, 45);

        let accepted = store
            .get_request(&request.id)
            .expect("fetch succeeds")
            .expect("request present");
        assert_eq!(accepted.status, RequestStatus::Accepted);

        match desk.accept_interview_availability_request(
            &request.id,
            "2026-03-13T10:00:00Z",
            45,
            None,
            ActorRole::Reviewer,
        ) {
            Err(ScheduleError::Conflict(_)) => {}
            other => panic!("expected conflict, got {other:?}"),
        }
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use interview_desk::workflows::interviews::{interview_router, ActorRole};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn read_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 64)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn post_json(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn the_full_hiring_flow_runs_over_http() {
        let (desk, _, _) = build_desk();
        let router = interview_router(desk);

        let posted = router
            .clone()
            .oneshot(post_json(
                "/api/v1/applications/app-1001/interview/slots",
                json!({
                    "actor_role": "reviewer",
                    "slots": [
                        { "scheduled_at": "2026-03-09T09:00:00Z", "duration_minutes": 60 },
                        { "scheduled_at": "2026-03-09T11:00:00Z", "duration_minutes": 60 },
                        { "scheduled_at": "2026-03-09T13:00:00Z", "duration_minutes": 60 }
                    ]
                }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(posted.status(), StatusCode::OK);
        let payload = read_json(posted).await;
        let slot_id = payload
            .get("primary_action")
            .and_then(|action| action.get("slot_id"))
            .and_then(Value::as_str)
            .expect("confirmable slot offered")
            .to_string();

        let confirmed = router
            .clone()
            .oneshot(post_json(
                &format!("/api/v1/interview/slots/{slot_id}/confirm"),
                json!({ "actor_role": "reviewer" }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(confirmed.status(), StatusCode::OK);
        let payload = read_json(confirmed).await;
        assert_eq!(payload.get("stage"), Some(&json!("scheduled")));

        let completed = router
            .clone()
            .oneshot(post_json(
                "/api/v1/applications/app-1001/interview/complete",
                json!({
                    "actor_role": "reviewer",
                    "slot_id": slot_id,
                    "recommendation": "yes",
                    "content": "Hire for the fall cohort.",
                    "strengths": "Clear communicator"
                }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(completed.status(), StatusCode::OK);
        let payload = read_json(completed).await;
        assert_eq!(payload.get("stage"), Some(&json!("completed")));

        let feed = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!(
                        "/api/v1/interview/tasks?role=candidate&user_id={CANDIDATE_ID}"
                    ))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(feed.status(), StatusCode::OK);
        let payload = read_json(feed).await;
        let tasks = payload.as_array().expect("array payload");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].get("stage"), Some(&json!("completed")));
    }

    #[tokio::test]
    async fn conflicting_confirmations_surface_as_http_conflict() {
        let (desk, _, _) = build_desk();
        let router = interview_router(desk.clone());

        desk.post_application_interview_slots_bulk(
            &application().id,
            slot_specs(&["2026-03-09T09:00:00Z", "2026-03-09T11:00:00Z"]),
            ActorRole::Reviewer,
        )
        .expect("posting succeeds");

        let first = router
            .clone()
            .oneshot(post_json(
                "/api/v1/interview/slots/slot-000001/confirm",
                json!({ "actor_role": "reviewer" }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(first.status(), StatusCode::OK);

        let second = router
            .oneshot(post_json(
                "/api/v1/interview/slots/slot-000002/confirm",
                json!({ "actor_role": "reviewer" }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }
}
