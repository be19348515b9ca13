//! Request bodies and response shapes used by the integration tests

use serde::{Deserialize, Serialize};

pub const ORGANIZER: &str = "organizer@example.com";
pub const DELEGATE: &str = "delegate@example.com";
pub const VOLUNTEER_ONE: &str = "v1@example.com";
pub const VOLUNTEER_TWO: &str = "v2@example.com";

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateEventRequest {
    pub name: String,
}

impl CreateEventRequest {
    pub fn named(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateTaskRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_volunteers: Option<i32>,
}

impl CreateTaskRequest {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            max_volunteers: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterDelegateRequest {
    pub organization: String,
}

#[derive(Debug, Serialize)]
pub struct AssignDelegateRequest {
    pub assigned_delegate: String,
}

#[derive(Debug, Serialize)]
pub struct LeaveTaskRequest {
    pub task_id: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub delegate_join_code: Option<String>,
    pub volunteer_join_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Membership {
    pub event_id: Option<String>,
    pub user_email: String,
    pub role: String,
    pub organization: Option<String>,
    pub delegate_org_code: Option<String>,
    pub delegate_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JoinEvent {
    pub event: Event,
    pub membership: Membership,
}

#[derive(Debug, Deserialize)]
pub struct EventMembers {
    pub delegates: Vec<Membership>,
    pub volunteers: Vec<Membership>,
}

#[derive(Debug, Deserialize)]
pub struct DelegateOrg {
    pub event_id: Option<String>,
    pub organization: Option<String>,
    pub delegate_org_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Task {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub assigned_delegate: Option<String>,
    pub organization: Option<String>,
    pub join_code: String,
    pub volunteer_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct Assignment {
    pub task_id: String,
    pub user_email: String,
    pub assigned_by: String,
    pub self_joined: bool,
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Leave {
    pub memberships_removed: u64,
    pub memberships_detached: u64,
    pub assignments_removed: u64,
}

#[derive(Debug, Deserialize)]
pub struct VolunteerTask {
    pub task_id: String,
    pub task_name: String,
}

#[derive(Debug, Deserialize)]
pub struct VolunteerProfile {
    pub email: String,
    pub tasks: Vec<VolunteerTask>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}
