//! Coordinator scenarios over the in-memory store

use std::sync::Arc;

use gather_common::{JoinCodeConfig, JwtService};
use gather_core::{EventRole, MemberRole, Snowflake, SnowflakeGenerator};
use gather_db::{MemoryStore, Repositories};
use gather_service::dto::{
    CreateEventRequest, CreateTaskRequest, EventResponse, LeaveResponse, RemoveVolunteerRequest,
    TaskResponse, VolunteerLeaveRequest,
};
use gather_service::{
    DelegateService, EventService, ServiceContext, ServiceContextBuilder, TaskService, VolunteerService,
};
use serde_json::json;

const ORGANIZER: &str = "organizer@example.com";
const DELEGATE: &str = "delegate@example.com";
const V1: &str = "v1@example.com";
const V2: &str = "v2@example.com";

fn context() -> ServiceContext {
    ServiceContextBuilder::new()
        .repositories(Repositories::memory(Arc::new(MemoryStore::new())))
        .jwt_service(Arc::new(JwtService::new("test-secret", 3600)))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .join_codes(JoinCodeConfig::default())
        .build()
        .unwrap()
}

fn id(raw: &str) -> Snowflake {
    Snowflake::parse(raw).unwrap()
}

async fn create_event(ctx: &ServiceContext, name: &str) -> EventResponse {
    let request: CreateEventRequest = serde_json::from_value(json!({ "name": name })).unwrap();
    EventService::new(ctx).create_event(ORGANIZER, request).await.unwrap()
}

async fn create_task(ctx: &ServiceContext, event: &EventResponse, name: &str) -> TaskResponse {
    let request: CreateTaskRequest = serde_json::from_value(json!({ "name": name })).unwrap();
    TaskService::new(ctx)
        .create_task(id(&event.id), ORGANIZER, request)
        .await
        .unwrap()
}

/// Event with "Acme" attached, two volunteers and one task
struct Acme {
    event: EventResponse,
    code: String,
    task: TaskResponse,
}

async fn acme(ctx: &ServiceContext) -> Acme {
    let event = create_event(ctx, "River Cleanup").await;
    let org = DelegateService::new(ctx)
        .register(DELEGATE, "Acme", Some(&event.id))
        .await
        .unwrap();
    let code = org.delegate_org_code.unwrap();

    let volunteers = VolunteerService::new(ctx);
    volunteers.join_organization(V1, &code).await.unwrap();
    volunteers.join_organization(V2, &code).await.unwrap();

    let task = create_task(ctx, &event, "Setup").await;
    Acme { event, code, task }
}

#[tokio::test]
async fn test_acme_assign_then_volunteer_leaves() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let event_id = id(&acme.event.id);
    let task_id = id(&acme.task.id);
    let tasks = TaskService::new(&ctx);

    let assigned = tasks.assign_delegate(event_id, task_id, ORGANIZER, DELEGATE).await.unwrap();
    assert_eq!(assigned.volunteer_count, 2);
    assert_eq!(assigned.assigned_delegate.as_deref(), Some(DELEGATE));
    assert_eq!(assigned.organization.as_deref(), Some("Acme"));
    assert_eq!(assigned.delegate_org_code.as_deref(), Some(acme.code.as_str()));

    let left = VolunteerService::new(&ctx)
        .leave(V1, VolunteerLeaveRequest::default())
        .await
        .unwrap();
    assert_eq!(left.memberships_removed, 1);
    assert_eq!(left.assignments_removed, 1);

    let listed = tasks.list_tasks(event_id, ORGANIZER).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].volunteer_count, 1);

    let remaining = tasks.task_volunteers(event_id, task_id, ORGANIZER).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_email, V2);
    assert_eq!(remaining[0].assigned_by, ORGANIZER);
    assert!(!remaining[0].self_joined);

    assert!(ctx.membership_repo().find(event_id, V1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_assign_delegate_twice_keeps_count() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let tasks = TaskService::new(&ctx);
    let (event_id, task_id) = (id(&acme.event.id), id(&acme.task.id));

    tasks.assign_delegate(event_id, task_id, ORGANIZER, DELEGATE).await.unwrap();
    let again = tasks.assign_delegate(event_id, task_id, ORGANIZER, DELEGATE).await.unwrap();
    assert_eq!(again.volunteer_count, 2);
    assert_eq!(ctx.assignment_repo().find_by_task(task_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_assign_delegate_requires_organizer_and_delegate() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let tasks = TaskService::new(&ctx);
    let (event_id, task_id) = (id(&acme.event.id), id(&acme.task.id));

    let err = tasks.assign_delegate(event_id, task_id, DELEGATE, DELEGATE).await.unwrap_err();
    assert_eq!(err.status_code(), 403);

    let err = tasks.assign_delegate(event_id, task_id, ORGANIZER, V1).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_unassign_keeps_assignments() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let tasks = TaskService::new(&ctx);
    let (event_id, task_id) = (id(&acme.event.id), id(&acme.task.id));

    tasks.assign_delegate(event_id, task_id, ORGANIZER, DELEGATE).await.unwrap();
    let cleared = tasks.unassign_delegate(event_id, task_id, ORGANIZER).await.unwrap();
    assert!(cleared.assigned_delegate.is_none());
    assert!(cleared.delegate_org_code.is_none());
    assert_eq!(cleared.volunteer_count, 2);
}

#[tokio::test]
async fn test_join_task_twice_is_one_assignment() {
    let ctx = context();
    let event = create_event(&ctx, "Food Drive").await;
    let task = create_task(&ctx, &event, "Sorting").await;
    let tasks = TaskService::new(&ctx);

    let first = tasks.join_task("walkin@example.com", &task.join_code.to_lowercase()).await.unwrap();
    let second = tasks.join_task("walkin@example.com", &task.join_code).await.unwrap();
    assert_eq!(first.volunteer_count, 1);
    assert_eq!(second.volunteer_count, 1);

    // Joining a task makes the caller a volunteer of the event
    let row = ctx
        .membership_repo()
        .find(id(&event.id), "walkin@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.role, MemberRole::Volunteer);

    let left = tasks.leave_task("walkin@example.com", &task.id).await.unwrap();
    assert_eq!(left.assignments_removed, 1);
    let err = tasks.leave_task("walkin@example.com", &task.id).await.unwrap_err();
    assert_eq!(err.status_code(), 404);

    // Leaving a task keeps the membership
    assert!(ctx
        .membership_repo()
        .find(id(&event.id), "walkin@example.com")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_delegate_cannot_join_task_or_volunteer() {
    let ctx = context();
    let acme = acme(&ctx).await;

    let err = TaskService::new(&ctx)
        .join_task(DELEGATE, &acme.task.join_code)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);

    let err = TaskService::new(&ctx)
        .join_task(ORGANIZER, &acme.task.join_code)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);

    let err = VolunteerService::new(&ctx)
        .join_organization(DELEGATE, &acme.code)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn test_register_twice_keeps_code_and_moves_event() {
    let ctx = context();
    let first_event = create_event(&ctx, "Spring Fair").await;
    let second_event = create_event(&ctx, "Autumn Fair").await;
    let delegates = DelegateService::new(&ctx);

    let first = delegates
        .register(DELEGATE, "Beta", Some(&first_event.id))
        .await
        .unwrap();
    let second = delegates
        .register(DELEGATE, "beta", Some(&second_event.id))
        .await
        .unwrap();

    assert_eq!(first.delegate_org_code, second.delegate_org_code);
    assert_eq!(second.event_id.as_deref(), Some(second_event.id.as_str()));
    assert_eq!(second.organization.as_deref(), Some("Beta"));

    // Re-registering with no event leaves the linkage alone
    let third = delegates.register(DELEGATE, "BETA", None).await.unwrap();
    assert_eq!(third.event_id, second.event_id);
}

#[tokio::test]
async fn test_register_by_event_code_and_name_collision() {
    let ctx = context();
    let event = create_event(&ctx, "Marathon").await;
    let delegates = DelegateService::new(&ctx);
    let delegate_code = event.delegate_join_code.clone().unwrap();

    let org = delegates
        .register(DELEGATE, "Gamma", Some(&delegate_code))
        .await
        .unwrap();
    assert_eq!(org.event_id.as_deref(), Some(event.id.as_str()));
    // The event's delegate code becomes the organization's code when free
    assert_eq!(org.delegate_org_code.as_deref(), Some(delegate_code.as_str()));

    // Another user registering the same name takes the organization over
    let taken = delegates.register("other@example.com", "GAMMA", None).await.unwrap();
    assert_eq!(taken.delegate_org_code, org.delegate_org_code);
    assert_eq!(taken.event_id.as_deref(), Some(event.id.as_str()));
    let row = ctx
        .membership_repo()
        .find_delegate_by_organization("gamma")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.user_email, "other@example.com");
    assert!(ctx.membership_repo().find(id(&event.id), DELEGATE).await.unwrap().is_none());

    let standalone = delegates.register("other@example.com", "Delta", None).await.unwrap();
    assert!(standalone.event_id.is_none());
    let code = standalone.delegate_org_code.unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[tokio::test]
async fn test_register_existing_name_hands_over_volunteers() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let autumn = create_event(&ctx, "Autumn Fair").await;
    let delegates = DelegateService::new(&ctx);
    const SUCCESSOR: &str = "successor@example.com";

    let err = delegates.register(V1, "ACME", Some(&autumn.id)).await.unwrap_err();
    assert_eq!(err.status_code(), 409);
    assert_eq!(err.error_code(), "ROLE_CONFLICT");

    let org = delegates.register(SUCCESSOR, "acme", Some(&autumn.id)).await.unwrap();
    assert_eq!(org.delegate_org_code.as_deref(), Some(acme.code.as_str()));
    assert_eq!(org.event_id.as_deref(), Some(autumn.id.as_str()));
    assert_eq!(org.organization.as_deref(), Some("Acme"));

    let autumn_id = id(&autumn.id);
    for volunteer in [V1, V2] {
        let row = ctx.membership_repo().find(autumn_id, volunteer).await.unwrap().unwrap();
        assert_eq!(row.delegate_email.as_deref(), Some(SUCCESSOR));
    }
    assert!(ctx.membership_repo().find(id(&acme.event.id), V1).await.unwrap().is_none());

    // The previous delegate no longer owns it
    let err = delegates.leave(DELEGATE, Some(&acme.code)).await.unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_attach_absorbs_volunteer_who_joined_while_detached() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let event_id = id(&acme.event.id);
    let task_id = id(&acme.task.id);
    let delegates = DelegateService::new(&ctx);

    delegates.leave(DELEGATE, None).await.unwrap();
    let joined = TaskService::new(&ctx).join_task(V1, &acme.task.join_code).await.unwrap();
    assert_eq!(joined.volunteer_count, 1);

    let attached = delegates.attach(DELEGATE, &acme.event.id, &acme.code).await.unwrap();
    assert_eq!(attached.event_id.as_deref(), Some(acme.event.id.as_str()));

    let rows = ctx.membership_repo().find_by_user(V1).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_id, Some(event_id));
    assert_eq!(rows[0].delegate_org_code.as_ref().map(ToString::to_string), Some(acme.code.clone()));

    let assignments = ctx.assignment_repo().find_by_task(task_id).await.unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].user_email, V1);

    // Attaching again changes nothing
    delegates.attach(DELEGATE, &acme.event.id, &acme.code).await.unwrap();
    assert_eq!(ctx.membership_repo().find_by_event(event_id).await.unwrap().len(), 3);
    assert_eq!(ctx.assignment_repo().count_by_task(task_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_remove_volunteer_and_assign_delegate_in_either_order() {
    let remove_v1 = || RemoveVolunteerRequest {
        volunteer_email: V1.to_string(),
        delegate_org_code: None,
    };

    // Removal first: the assignment only covers who is left
    let ctx = context();
    let acme = acme(&ctx).await;
    let (event_id, task_id) = (id(&acme.event.id), id(&acme.task.id));
    DelegateService::new(&ctx).remove_volunteer(DELEGATE, remove_v1()).await.unwrap();
    let task = TaskService::new(&ctx)
        .assign_delegate(event_id, task_id, ORGANIZER, DELEGATE)
        .await
        .unwrap();
    assert_eq!(task.volunteer_count, 1);
    let assigned = ctx.assignment_repo().find_by_task(task_id).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].user_email, V2);

    // Assignment first: removal takes the volunteer's assignment with it
    let ctx = context();
    let acme = self::acme(&ctx).await;
    let (event_id, task_id) = (id(&acme.event.id), id(&acme.task.id));
    let tasks = TaskService::new(&ctx);
    tasks.assign_delegate(event_id, task_id, ORGANIZER, DELEGATE).await.unwrap();
    let removed = DelegateService::new(&ctx).remove_volunteer(DELEGATE, remove_v1()).await.unwrap();
    assert_eq!(removed.assignments_removed, 1);
    let assigned = ctx.assignment_repo().find_by_task(task_id).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].user_email, V2);

    // Re-assigning does not bring the removed volunteer back
    let task = tasks.assign_delegate(event_id, task_id, ORGANIZER, DELEGATE).await.unwrap();
    assert_eq!(task.volunteer_count, 1);
}

#[tokio::test]
async fn test_leave_then_attach_restores_linkage() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let event_id = id(&acme.event.id);
    let delegates = DelegateService::new(&ctx);

    TaskService::new(&ctx)
        .assign_delegate(event_id, id(&acme.task.id), ORGANIZER, DELEGATE)
        .await
        .unwrap();

    let left = delegates.leave(DELEGATE, None).await.unwrap();
    assert_eq!(left.memberships_detached, 3);
    assert_eq!(left.assignments_removed, 2);
    assert!(ctx.membership_repo().find(event_id, V1).await.unwrap().is_none());

    // Leaving again is a no-op for a detached organization
    let again = delegates.leave(DELEGATE, None).await.unwrap();
    assert_eq!(again, LeaveResponse::default());

    let attached = delegates.attach(DELEGATE, &acme.event.id, &acme.code).await.unwrap();
    assert_eq!(attached.event_id.as_deref(), Some(acme.event.id.as_str()));

    for volunteer in [V1, V2] {
        let row = ctx.membership_repo().find(event_id, volunteer).await.unwrap().unwrap();
        assert_eq!(row.delegate_org_code.as_ref().map(ToString::to_string), Some(acme.code.clone()));
        assert_eq!(row.delegate_email.as_deref(), Some(DELEGATE));
        assert_eq!(row.organization.as_deref(), Some("Acme"));
    }
}

#[tokio::test]
async fn test_attach_checks_ownership() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let other = create_event(&ctx, "Other").await;

    let err = DelegateService::new(&ctx)
        .attach(V1, &other.id, &acme.code)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let err = DelegateService::new(&ctx)
        .attach(DELEGATE, "999999999999", &acme.code)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_short_and_long_codes_are_rejected() {
    let ctx = context();
    let acme = acme(&ctx).await;

    for code in ["ABC12", "ABC1234"] {
        let err = DelegateService::new(&ctx).join_event(V1, code).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CODE");
        assert_eq!(err.status_code(), 400);

        let err = VolunteerService::new(&ctx).join_organization(V1, code).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CODE");

        let err = TaskService::new(&ctx).join_task(V1, code).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CODE");

        let err = DelegateService::new(&ctx)
            .attach(DELEGATE, &acme.event.id, code)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CODE");
    }
}

#[tokio::test]
async fn test_join_event_roles() {
    let ctx = context();
    let request: CreateEventRequest =
        serde_json::from_value(json!({ "name": "Gala", "volunteer_code": true })).unwrap();
    let event = EventService::new(&ctx).create_event(ORGANIZER, request).await.unwrap();
    let delegate_code = event.delegate_join_code.clone().unwrap();
    let volunteer_code = event.volunteer_join_code.clone().unwrap();
    assert_ne!(delegate_code, volunteer_code);

    let delegates = DelegateService::new(&ctx);
    let joined = delegates.join_event(DELEGATE, &delegate_code).await.unwrap();
    assert_eq!(joined.membership.role, MemberRole::Delegate);
    assert!(joined.event.delegate_join_code.is_none());

    // Idempotent for the same role
    delegates.join_event(DELEGATE, &delegate_code).await.unwrap();

    let joined = delegates.join_event(V1, &volunteer_code).await.unwrap();
    assert_eq!(joined.membership.role, MemberRole::Volunteer);

    let err = delegates.join_event(V1, &delegate_code).await.unwrap_err();
    assert_eq!(err.error_code(), "ROLE_CONFLICT");
    let err = delegates.join_event(DELEGATE, &volunteer_code).await.unwrap_err();
    assert_eq!(err.error_code(), "ROLE_CONFLICT");
    let err = delegates.join_event(ORGANIZER, &delegate_code).await.unwrap_err();
    assert_eq!(err.error_code(), "ROLE_CONFLICT");

    let err = delegates.join_event(V1, "ZZZZZZ").await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_bare_delegate_registers_into_event() {
    let ctx = context();
    let event = create_event(&ctx, "Harvest").await;
    let delegates = DelegateService::new(&ctx);
    let code = event.delegate_join_code.clone().unwrap();

    delegates.join_event(DELEGATE, &code).await.unwrap();
    let org = delegates.register(DELEGATE, "Epsilon", Some(&event.id)).await.unwrap();
    assert_eq!(org.event_id.as_deref(), Some(event.id.as_str()));

    let rows = ctx.membership_repo().find_by_user(DELEGATE).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].organization.as_deref(), Some("Epsilon"));

    // A volunteer of the event cannot register into it
    VolunteerService::new(&ctx)
        .join_organization(V2, org.delegate_org_code.as_deref().unwrap())
        .await
        .unwrap();
    let err = delegates.register(V2, "Zeta", Some(&event.id)).await.unwrap_err();
    assert_eq!(err.error_code(), "ROLE_CONFLICT");
}

#[tokio::test]
async fn test_remove_volunteer_checks_ownership() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let event_id = id(&acme.event.id);
    let delegates = DelegateService::new(&ctx);

    let remove = |email: &str| RemoveVolunteerRequest {
        volunteer_email: email.to_string(),
        delegate_org_code: None,
    };

    let err = delegates.remove_volunteer(V1, remove(V2)).await.unwrap_err();
    assert_eq!(err.status_code(), 403);

    let err = delegates
        .remove_volunteer(DELEGATE, remove("stranger@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);

    TaskService::new(&ctx)
        .assign_delegate(event_id, id(&acme.task.id), ORGANIZER, DELEGATE)
        .await
        .unwrap();

    let removed = delegates.remove_volunteer(DELEGATE, remove("V2@Example.com")).await.unwrap();
    assert_eq!(removed.memberships_removed, 1);
    assert_eq!(removed.assignments_removed, 1);
    assert!(ctx.membership_repo().find(event_id, V2).await.unwrap().is_none());
}

#[tokio::test]
async fn test_organizer_removes_delegate() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let event_id = id(&acme.event.id);
    let delegates = DelegateService::new(&ctx);

    let err = delegates.remove_delegate(event_id, V1, DELEGATE).await.unwrap_err();
    assert_eq!(err.status_code(), 403);

    let removed = delegates.remove_delegate(event_id, ORGANIZER, DELEGATE).await.unwrap();
    assert_eq!(removed.memberships_detached, 3);

    let members = EventService::new(&ctx).list_members(event_id, ORGANIZER).await.unwrap();
    assert!(members.delegates.is_empty());
    assert!(members.volunteers.is_empty());

    // The organization survives with its code
    let profile = delegates.profile(DELEGATE).await.unwrap();
    assert_eq!(profile.organizations.len(), 1);
    assert_eq!(profile.organizations[0].delegate_org_code.as_deref(), Some(acme.code.as_str()));
    assert!(profile.organizations[0].event.is_none());
    assert_eq!(profile.organizations[0].volunteers.len(), 2);
}

#[tokio::test]
async fn test_profiles_and_listings() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let event_id = id(&acme.event.id);

    TaskService::new(&ctx)
        .assign_delegate(event_id, id(&acme.task.id), ORGANIZER, DELEGATE)
        .await
        .unwrap();

    let profile = VolunteerService::new(&ctx).profile(V1).await.unwrap();
    assert_eq!(profile.memberships.len(), 1);
    assert_eq!(
        profile.memberships[0].event.as_ref().map(|e| e.name.as_str()),
        Some("River Cleanup")
    );
    assert_eq!(profile.tasks.len(), 1);
    assert_eq!(profile.tasks[0].task_name, "Setup");

    let delegate_profile = DelegateService::new(&ctx).profile(DELEGATE).await.unwrap();
    assert_eq!(delegate_profile.organizations[0].volunteers.len(), 2);

    let events = EventService::new(&ctx);
    assert_eq!(events.list_events(ORGANIZER, EventRole::Organizer).await.unwrap().len(), 1);
    let as_delegate = events.list_events(DELEGATE, EventRole::Delegate).await.unwrap();
    assert_eq!(as_delegate.len(), 1);
    assert!(as_delegate[0].delegate_join_code.is_none());
    assert_eq!(events.list_events(V1, EventRole::Volunteer).await.unwrap().len(), 1);
    assert!(events.list_events(V1, EventRole::Delegate).await.unwrap().is_empty());

    let seen = events.get_event(event_id, V1).await.unwrap();
    assert!(seen.delegate_join_code.is_none());
    let err = events.get_event(event_id, "stranger@example.com").await.unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_volunteer_relinks_to_another_organization() {
    let ctx = context();
    let acme = acme(&ctx).await;
    let event_id = id(&acme.event.id);

    let other = DelegateService::new(&ctx)
        .register("second@example.com", "Omega", Some(&acme.event.id))
        .await
        .unwrap();
    let other_code = other.delegate_org_code.unwrap();
    assert_ne!(other_code, acme.code);

    let row = VolunteerService::new(&ctx).join_organization(V1, &other_code).await.unwrap();
    assert_eq!(row.delegate_org_code.as_deref(), Some(other_code.as_str()));
    assert_eq!(row.delegate_email.as_deref(), Some("second@example.com"));

    let rows = ctx.membership_repo().find_by_user(V1).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_id, Some(event_id));
}
