use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use clap::Args;

use crate::infra::{seed_demo_owners, InMemoryOwnerRepository};
use interview_desk::error::AppError;
use interview_desk::workflows::interviews::{
    ActorRole, ApplicationId, GateId, InterviewDeskService, InterviewTask, MemorySlotStore,
    OwnerKind, OwnerRef, ReadinessDecision, Recommendation, RequestStatus, ScheduleError, SlotId,
    SlotSpec, SlotStatus, SlotStore,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference time for the walkthrough (RFC 3339). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) as_of: Option<DateTime<Utc>>,
    /// Print each task feed as JSON instead of summary lines.
    #[arg(long)]
    pub(crate) json: bool,
}

type DemoDesk = InterviewDeskService<MemorySlotStore, InMemoryOwnerRepository>;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { as_of, json } = args;
    let as_of = as_of.unwrap_or_else(Utc::now);

    let store = Arc::new(MemorySlotStore::new());
    let owners = Arc::new(InMemoryOwnerRepository::default());
    seed_demo_owners(&owners);
    let desk = Arc::new(DemoDesk::new(store.clone(), owners));

    println!(
        "Interview desk demo (as of {})",
        as_of.format("%Y-%m-%d %H:%M UTC")
    );
    print_feed(&desk, "Initial reviewer feed", json, as_of)?;

    // Hiring pipeline: post three candidate times, the familiar +2h/+4h
    // spread around a reviewer-picked anchor.
    let application_id = ApplicationId("app-1001".to_string());
    let anchor = as_of + Duration::days(1);
    let specs = [anchor, anchor + Duration::hours(2), anchor + Duration::hours(4)]
        .iter()
        .map(|time| SlotSpec {
            scheduled_at: time.to_rfc3339(),
            duration_minutes: 60,
            meeting_link: Some("https://meet.example.com/interview".to_string()),
        })
        .collect();
    desk.post_application_interview_slots_bulk(&application_id, specs, ActorRole::Reviewer)?;
    println!("\nPosted three candidate times for {application_id}");

    let app_owner = OwnerRef {
        kind: OwnerKind::Application,
        id: application_id.0.clone(),
    };
    let middle = slot_at(&store, &app_owner, 1)?;
    desk.confirm_interview_slot(&middle, ActorRole::Reviewer)?;
    println!("Confirmed {middle}; its siblings are superseded");

    desk.complete_application_interview_and_note(
        &application_id,
        &middle,
        Recommendation::Yes,
        "Strong classroom presence; recommend advancing.".to_string(),
        Some("Curriculum design depth".to_string()),
        None,
        ActorRole::Reviewer,
    )?;
    println!("Recorded the hiring recommendation; the application moves to decisioning");

    // Readiness pipeline: the instructor proposes windows, a reviewer books
    // one, and the interview is decided.
    let gate_id = GateId("gate-2001".to_string());
    let windows = vec![
        (as_of + Duration::days(2)).to_rfc3339(),
        (as_of + Duration::days(4)).to_rfc3339(),
    ];
    desk.submit_interview_availability_request(
        "inst-0004",
        windows.clone(),
        Some("Mid-morning works best".to_string()),
        ActorRole::Instructor,
    )?;
    println!(
        "\nInstructor inst-0004 proposed {} preferred windows",
        windows.len()
    );

    let gate_owner = OwnerRef {
        kind: OwnerKind::ReadinessGate,
        id: gate_id.0.clone(),
    };
    let request = store
        .requests_for_owner(&gate_owner)
        .map_err(ScheduleError::from)?
        .into_iter()
        .find(|request| request.status == RequestStatus::Pending)
        .ok_or_else(|| ScheduleError::Unavailable("demo request missing".to_string()))?;
    desk.accept_interview_availability_request(
        &request.id,
        &windows[1],
        45,
        Some("https://meet.example.com/readiness".to_string()),
        ActorRole::Reviewer,
    )?;
    println!("Reviewer accepted window #2 at 45 minutes");

    let confirmed = slot_with_status(&store, &gate_owner, SlotStatus::Confirmed)?;
    desk.complete_instructor_interview_and_set_outcome(
        &gate_id,
        Some(&confirmed),
        ReadinessDecision::Pass,
        Some("Confident practicum walkthrough.".to_string()),
        ActorRole::Reviewer,
    )?;
    println!("Readiness interview decided: pass; the gate is certified");

    // The second gate is still blocked on modules; an admin waives it.
    desk.complete_instructor_interview_and_set_outcome(
        &GateId("gate-2002".to_string()),
        None,
        ReadinessDecision::Waive,
        Some("Grandfathered under the prior rubric.".to_string()),
        ActorRole::Admin,
    )?;
    println!("Admin waived the readiness interview for gate-2002");

    print_feed(&desk, "\nFinal reviewer feed", json, as_of)?;
    Ok(())
}

fn print_feed(
    desk: &Arc<DemoDesk>,
    label: &str,
    json: bool,
    as_of: DateTime<Utc>,
) -> Result<(), AppError> {
    let tasks = desk.list_interview_tasks(ActorRole::Reviewer, "", as_of)?;
    println!("{label}:");
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&tasks).unwrap_or_default()
        );
        return Ok(());
    }
    for task in &tasks {
        print_task(task);
    }
    Ok(())
}

fn print_task(task: &InterviewTask) {
    println!(
        "- [{}] {} | {} (next: {})",
        task.stage.label(),
        task.title,
        task.subtitle,
        task.primary_action.kind()
    );
    for blocker in &task.blockers {
        println!("    blocked: {blocker}");
    }
}

fn slot_at(store: &Arc<MemorySlotStore>, owner: &OwnerRef, index: usize) -> Result<SlotId, AppError> {
    let slots = store.slots_for_owner(owner).map_err(ScheduleError::from)?;
    slots.get(index).map(|slot| slot.id.clone()).ok_or_else(|| {
        AppError::Schedule(ScheduleError::Unavailable(format!(
            "demo slot {index} missing for {owner}"
        )))
    })
}

fn slot_with_status(
    store: &Arc<MemorySlotStore>,
    owner: &OwnerRef,
    status: SlotStatus,
) -> Result<SlotId, AppError> {
    let slots = store.slots_for_owner(owner).map_err(ScheduleError::from)?;
    slots
        .iter()
        .find(|slot| slot.status == status)
        .map(|slot| slot.id.clone())
        .ok_or_else(|| {
            AppError::Schedule(ScheduleError::Unavailable(format!(
                "no {status} slot for {owner}"
            )))
        })
}
