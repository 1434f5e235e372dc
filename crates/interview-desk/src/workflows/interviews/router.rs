use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ActorRole, ApplicationId, GateId, ReadinessDecision, Recommendation, RequestId, SlotId,
    SlotSpec,
};
use super::error::ScheduleError;
use super::service::InterviewDeskService;
use super::store::{OwnerRepository, SlotStore};

impl IntoResponse for ScheduleError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScheduleError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScheduleError::NotFound(_) => StatusCode::NOT_FOUND,
            ScheduleError::Conflict(_) | ScheduleError::State(_) => StatusCode::CONFLICT,
            ScheduleError::Authorization(_) => StatusCode::FORBIDDEN,
            ScheduleError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = axum::Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ActorPayload {
    pub actor_role: ActorRole,
}

#[derive(Debug, Deserialize)]
pub struct PostSlotsPayload {
    pub actor_role: ActorRole,
    pub slots: Vec<SlotSpec>,
}

#[derive(Debug, Deserialize)]
pub struct PostGateSlotsPayload {
    pub actor_role: ActorRole,
    pub instructor_id: String,
    pub slots: Vec<SlotSpec>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteApplicationPayload {
    pub actor_role: ActorRole,
    pub slot_id: String,
    pub recommendation: Recommendation,
    pub content: String,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub concerns: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StructuredNotePayload {
    pub actor_role: ActorRole,
    pub recommendation: Recommendation,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAvailabilityPayload {
    pub actor_role: ActorRole,
    pub preferred_windows: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AcceptAvailabilityPayload {
    pub actor_role: ActorRole,
    pub scheduled_at: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub meeting_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteGatePayload {
    pub actor_role: ActorRole,
    #[serde(default)]
    pub slot_id: Option<String>,
    pub outcome: ReadinessDecision,
    #[serde(default)]
    pub review_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TaskFeedQuery {
    pub role: ActorRole,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Router builder exposing the scheduling command surface and the task feed.
pub fn interview_router<S, O>(service: Arc<InterviewDeskService<S, O>>) -> Router
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications/:application_id/interview/slots",
            post(post_application_slots_handler::<S, O>),
        )
        .route(
            "/api/v1/applications/:application_id/interview/complete",
            post(complete_application_handler::<S, O>),
        )
        .route(
            "/api/v1/applications/:application_id/interview/note",
            post(structured_note_handler::<S, O>),
        )
        .route(
            "/api/v1/interview/slots/:slot_id/confirm",
            post(confirm_slot_handler::<S, O>),
        )
        .route(
            "/api/v1/interview/slots/:slot_id/cancel",
            post(cancel_slot_handler::<S, O>),
        )
        .route(
            "/api/v1/instructors/:instructor_id/interview/availability",
            post(submit_availability_handler::<S, O>),
        )
        .route(
            "/api/v1/interview/availability/:request_id/accept",
            post(accept_availability_handler::<S, O>),
        )
        .route(
            "/api/v1/interview/availability/:request_id/decline",
            post(decline_availability_handler::<S, O>),
        )
        .route(
            "/api/v1/gates/:gate_id/interview/slots",
            post(post_gate_slots_handler::<S, O>),
        )
        .route(
            "/api/v1/gates/:gate_id/interview/complete",
            post(complete_gate_handler::<S, O>),
        )
        .route("/api/v1/interview/tasks", get(list_tasks_handler::<S, O>))
        .with_state(service)
}

pub(crate) async fn post_application_slots_handler<S, O>(
    State(service): State<Arc<InterviewDeskService<S, O>>>,
    Path(application_id): Path<String>,
    axum::Json(payload): axum::Json<PostSlotsPayload>,
) -> Response
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    match service.post_application_interview_slots_bulk(
        &ApplicationId(application_id),
        payload.slots,
        payload.actor_role,
    ) {
        Ok(task) => (StatusCode::OK, axum::Json(task)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn complete_application_handler<S, O>(
    State(service): State<Arc<InterviewDeskService<S, O>>>,
    Path(application_id): Path<String>,
    axum::Json(payload): axum::Json<CompleteApplicationPayload>,
) -> Response
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    match service.complete_application_interview_and_note(
        &ApplicationId(application_id),
        &SlotId(payload.slot_id),
        payload.recommendation,
        payload.content,
        payload.strengths,
        payload.concerns,
        payload.actor_role,
    ) {
        Ok(task) => (StatusCode::OK, axum::Json(task)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn structured_note_handler<S, O>(
    State(service): State<Arc<InterviewDeskService<S, O>>>,
    Path(application_id): Path<String>,
    axum::Json(payload): axum::Json<StructuredNotePayload>,
) -> Response
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    match service.save_structured_interview_note(
        &ApplicationId(application_id),
        payload.recommendation,
        payload.content,
        payload.actor_role,
    ) {
        Ok(task) => (StatusCode::OK, axum::Json(task)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn confirm_slot_handler<S, O>(
    State(service): State<Arc<InterviewDeskService<S, O>>>,
    Path(slot_id): Path<String>,
    axum::Json(payload): axum::Json<ActorPayload>,
) -> Response
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    match service.confirm_interview_slot(&SlotId(slot_id), payload.actor_role) {
        Ok(task) => (StatusCode::OK, axum::Json(task)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn cancel_slot_handler<S, O>(
    State(service): State<Arc<InterviewDeskService<S, O>>>,
    Path(slot_id): Path<String>,
    axum::Json(payload): axum::Json<ActorPayload>,
) -> Response
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    match service.cancel_interview_slot(&SlotId(slot_id), payload.actor_role) {
        Ok(task) => (StatusCode::OK, axum::Json(task)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn submit_availability_handler<S, O>(
    State(service): State<Arc<InterviewDeskService<S, O>>>,
    Path(instructor_id): Path<String>,
    axum::Json(payload): axum::Json<SubmitAvailabilityPayload>,
) -> Response
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    match service.submit_interview_availability_request(
        &instructor_id,
        payload.preferred_windows,
        payload.note,
        payload.actor_role,
    ) {
        Ok(task) => (StatusCode::OK, axum::Json(task)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn accept_availability_handler<S, O>(
    State(service): State<Arc<InterviewDeskService<S, O>>>,
    Path(request_id): Path<String>,
    axum::Json(payload): axum::Json<AcceptAvailabilityPayload>,
) -> Response
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    match service.accept_interview_availability_request(
        &RequestId(request_id),
        &payload.scheduled_at,
        payload.duration_minutes,
        payload.meeting_link,
        payload.actor_role,
    ) {
        Ok(task) => (StatusCode::OK, axum::Json(task)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn decline_availability_handler<S, O>(
    State(service): State<Arc<InterviewDeskService<S, O>>>,
    Path(request_id): Path<String>,
    axum::Json(payload): axum::Json<ActorPayload>,
) -> Response
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    match service.decline_interview_availability_request(&RequestId(request_id), payload.actor_role)
    {
        Ok(task) => (StatusCode::OK, axum::Json(task)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn post_gate_slots_handler<S, O>(
    State(service): State<Arc<InterviewDeskService<S, O>>>,
    Path(gate_id): Path<String>,
    axum::Json(payload): axum::Json<PostGateSlotsPayload>,
) -> Response
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    match service.post_instructor_interview_slots_bulk(
        &payload.instructor_id,
        &GateId(gate_id),
        payload.slots,
        payload.actor_role,
    ) {
        Ok(task) => (StatusCode::OK, axum::Json(task)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn complete_gate_handler<S, O>(
    State(service): State<Arc<InterviewDeskService<S, O>>>,
    Path(gate_id): Path<String>,
    axum::Json(payload): axum::Json<CompleteGatePayload>,
) -> Response
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    let slot_id = payload.slot_id.map(SlotId);
    match service.complete_instructor_interview_and_set_outcome(
        &GateId(gate_id),
        slot_id.as_ref(),
        payload.outcome,
        payload.review_notes,
        payload.actor_role,
    ) {
        Ok(task) => (StatusCode::OK, axum::Json(task)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_tasks_handler<S, O>(
    State(service): State<Arc<InterviewDeskService<S, O>>>,
    Query(query): Query<TaskFeedQuery>,
) -> Response
where
    S: SlotStore + 'static,
    O: OwnerRepository + 'static,
{
    let user_id = query.user_id.unwrap_or_default();
    match service.list_interview_tasks(query.role, &user_id, Utc::now()) {
        Ok(tasks) => (StatusCode::OK, axum::Json(tasks)).into_response(),
        Err(err) => err.into_response(),
    }
}
