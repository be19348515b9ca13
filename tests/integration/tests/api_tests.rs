//! API integration tests
//!
//! Each test spawns its own server over a fresh in-memory store.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_error, assert_json, assert_status, fixtures::*, TestServer};
use reqwest::StatusCode;

async fn create_event(server: &TestServer, name: &str) -> Event {
    let response = server
        .post_as("/events", ORGANIZER, &CreateEventRequest::named(name))
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn create_task(server: &TestServer, event: &Event, name: &str) -> Task {
    let response = server
        .post_as(
            &format!("/events/{}/tasks", event.id),
            ORGANIZER,
            &CreateTaskRequest::named(name),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn register(server: &TestServer, organization: &str, event: &Event) -> DelegateOrg {
    let body = RegisterDelegateRequest {
        organization: organization.to_string(),
    };
    let response = server
        .post_as(&format!("/delegate/register?event_id={}", event.id), DELEGATE, &body)
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health and auth
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get_raw("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_raw("/health/ready").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.post_anonymous("/tasks/join/ABC123").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_foreign_token_is_unauthorized() {
    let server = TestServer::start().await.expect("Failed to start server");
    let other = TestServer::start_with_config(
        gather_common::AppConfig::from_lookup(|key| match key {
            "API_PORT" => Some("0".to_string()),
            "DATABASE_URL" => Some("memory://".to_string()),
            "JWT_SECRET" => Some("some-other-secret".to_string()),
            _ => None,
        })
        .unwrap(),
    )
    .await
    .unwrap();

    let token = other.token(ORGANIZER).unwrap();
    let response = server
        .client
        .get(format!("{}/api/v1/volunteer/profile", server.base_url()))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Coordinator flow
// ============================================================================

#[tokio::test]
async fn test_assign_delegate_then_volunteer_leaves() {
    let server = TestServer::start().await.expect("Failed to start server");

    let event = create_event(&server, "River Cleanup").await;
    assert_eq!(event.name, "River Cleanup");
    assert_eq!(event.created_by, ORGANIZER);
    assert_eq!(event.delegate_join_code.as_deref().map(str::len), Some(6));

    let org = register(&server, "Acme", &event).await;
    assert_eq!(org.event_id.as_deref(), Some(event.id.as_str()));
    assert_eq!(org.organization.as_deref(), Some("Acme"));
    let code = org.delegate_org_code.unwrap();

    for volunteer in [VOLUNTEER_ONE, VOLUNTEER_TWO] {
        let response = server
            .post_empty_as(&format!("/delegate/join/{code}"), volunteer)
            .await
            .unwrap();
        let membership: Membership = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(membership.role, "volunteer");
        assert_eq!(membership.delegate_org_code.as_deref(), Some(code.as_str()));
    }

    let task = create_task(&server, &event, "Setup").await;
    assert_eq!(task.event_id, event.id);
    assert_eq!(task.volunteer_count, 0);

    let task_path = format!("/events/{}/tasks/{}", event.id, task.id);
    let body = AssignDelegateRequest {
        assigned_delegate: DELEGATE.to_string(),
    };
    let response = server
        .patch_as(&format!("{task_path}/assign"), ORGANIZER, &body)
        .await
        .unwrap();
    let assigned: Task = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(assigned.volunteer_count, 2);
    assert_eq!(assigned.assigned_delegate.as_deref(), Some(DELEGATE));
    assert_eq!(assigned.organization.as_deref(), Some("Acme"));

    let response = server
        .get_as(&format!("{task_path}/volunteers"), ORGANIZER)
        .await
        .unwrap();
    let volunteers: Vec<Assignment> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(volunteers.len(), 2);
    assert!(volunteers.iter().all(|a| a.assigned_by == ORGANIZER && !a.self_joined));
    assert!(volunteers.iter().all(|a| a.task_id == task.id));

    let response = server.post_empty_as("/volunteer/leave", VOLUNTEER_ONE).await.unwrap();
    let left: Leave = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(left.memberships_removed, 1);
    assert_eq!(left.assignments_removed, 1);

    let response = server
        .get_as(&format!("/events/{}/tasks", event.id), ORGANIZER)
        .await
        .unwrap();
    let tasks: Vec<Task> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].volunteer_count, 1);

    let response = server
        .get_as(&format!("/events/{}/members", event.id), ORGANIZER)
        .await
        .unwrap();
    let members: EventMembers = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(members.delegates.len(), 1);
    assert_eq!(members.volunteers.len(), 1);
    assert_eq!(members.volunteers[0].user_email, VOLUNTEER_TWO);
    assert_eq!(members.volunteers[0].delegate_email.as_deref(), Some(DELEGATE));
}

#[tokio::test]
async fn test_join_and_leave_task_by_code() {
    let server = TestServer::start().await.expect("Failed to start server");
    let event = create_event(&server, "Food Drive").await;
    let task = create_task(&server, &event, "Sorting").await;

    let path = format!("/tasks/join/{}", task.join_code.to_lowercase());
    let response = server.post_empty_as(&path, VOLUNTEER_ONE).await.unwrap();
    let joined: Task = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(joined.volunteer_count, 1);

    // Redeeming again is a no-op
    let response = server.post_empty_as(&path, VOLUNTEER_ONE).await.unwrap();
    let joined: Task = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(joined.volunteer_count, 1);

    let response = server.get_as("/volunteer/profile", VOLUNTEER_ONE).await.unwrap();
    let profile: VolunteerProfile = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.email, VOLUNTEER_ONE);
    assert_eq!(profile.tasks.len(), 1);
    assert_eq!(profile.tasks[0].task_name, "Sorting");

    let body = LeaveTaskRequest {
        task_id: task.id.clone(),
    };
    let response = server.post_as("/tasks/leave", VOLUNTEER_ONE, &body).await.unwrap();
    let left: Leave = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(left.assignments_removed, 1);

    let response = server.post_as("/tasks/leave", VOLUNTEER_ONE, &body).await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_ASSIGNMENT");
}

#[tokio::test]
async fn test_delegate_joins_event_by_code() {
    let server = TestServer::start().await.expect("Failed to start server");
    let event = create_event(&server, "Marathon").await;
    let code = event.delegate_join_code.clone().unwrap();

    let response = server
        .post_empty_as(&format!("/event/join/{code}"), DELEGATE)
        .await
        .unwrap();
    let joined: JoinEvent = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(joined.event.id, event.id);
    assert!(joined.event.delegate_join_code.is_none());
    assert!(joined.event.volunteer_join_code.is_none());
    assert_eq!(joined.membership.role, "delegate");
    assert!(joined.membership.organization.is_none());
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn test_malformed_and_unknown_codes() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.post_empty_as("/tasks/join/ABC12", VOLUNTEER_ONE).await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_CODE");

    let response = server
        .post_empty_as("/delegate/join/ABCDEFG", VOLUNTEER_ONE)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_CODE");

    let response = server.post_empty_as("/event/join/ZZZZZZ", DELEGATE).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_organizer_cannot_join_own_task() {
    let server = TestServer::start().await.expect("Failed to start server");
    let event = create_event(&server, "Park Day").await;
    let task = create_task(&server, &event, "Planting").await;

    let response = server
        .post_empty_as(&format!("/tasks/join/{}", task.join_code), ORGANIZER)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ROLE_CONFLICT");
}

#[tokio::test]
async fn test_only_organizer_creates_tasks() {
    let server = TestServer::start().await.expect("Failed to start server");
    let event = create_event(&server, "Book Fair").await;

    let response = server
        .post_as(
            &format!("/events/{}/tasks", event.id),
            DELEGATE,
            &CreateTaskRequest::named("Shelving"),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_EVENT_ORGANIZER");

    let response = server
        .post_as("/events/not-a-number/tasks", ORGANIZER, &CreateTaskRequest::named("Shelving"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_blank_event_name_is_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post_as("/events", ORGANIZER, &CreateEventRequest::named("   "))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");
    assert!(!body.error.message.is_empty());
}
