//! Request DTOs for API endpoints
//!
//! All body DTOs implement `Deserialize` and `Validate` for input validation.
//! Join codes arrive as plain strings and are normalized by the services, so
//! a malformed code is reported as `INVALID_CODE` rather than a body error.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use gather_core::{EventRole, GeoPoint};

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// ============================================================================
// Event Requests
// ============================================================================

/// Create event request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(
        length(min = 1, max = 200, message = "Event name must be 1-200 characters"),
        custom(function = "validate_not_blank", message = "Event name must not be blank")
    )]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// GeoJSON point
    pub location: Option<GeoPoint>,

    #[validate(length(max = 200, message = "Location name must be at most 200 characters"))]
    pub location_name: Option<String>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    /// Also mint a legacy volunteer join code
    #[serde(default)]
    pub volunteer_code: bool,
}

/// Update event request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(
        length(min = 1, max = 200, message = "Event name must be 1-200 characters"),
        custom(function = "validate_not_blank", message = "Event name must not be blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub location: Option<GeoPoint>,

    #[validate(length(max = 200, message = "Location name must be at most 200 characters"))]
    pub location_name: Option<String>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// `GET /events?role=...`
#[derive(Debug, Clone, Deserialize)]
pub struct ListEventsQuery {
    #[serde(default = "default_list_role")]
    pub role: EventRole,
}

fn default_list_role() -> EventRole {
    EventRole::Organizer
}

// ============================================================================
// Task Requests
// ============================================================================

/// Create task request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(
        length(min = 1, max = 200, message = "Task name must be 1-200 characters"),
        custom(function = "validate_not_blank", message = "Task name must not be blank")
    )]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub location: Option<GeoPoint>,

    #[validate(length(max = 200, message = "Location name must be at most 200 characters"))]
    pub location_name: Option<String>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    /// Staffing hint; not enforced on join
    #[validate(range(min = 1, max = 10000, message = "max_volunteers must be 1-10000"))]
    pub max_volunteers: Option<i32>,
}

/// Update task request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(
        length(min = 1, max = 200, message = "Task name must be 1-200 characters"),
        custom(function = "validate_not_blank", message = "Task name must not be blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub location: Option<GeoPoint>,

    #[validate(length(max = 200, message = "Location name must be at most 200 characters"))]
    pub location_name: Option<String>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    #[validate(range(min = 1, max = 10000, message = "max_volunteers must be 1-10000"))]
    pub max_volunteers: Option<i32>,
}

/// Assign a delegate of the event to a task
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignDelegateRequest {
    #[validate(email(message = "Invalid delegate email"))]
    pub assigned_delegate: String,
}

/// Leave a single task
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LeaveTaskRequest {
    /// Task ID (Snowflake as string)
    #[validate(length(min = 1, message = "task_id is required"))]
    pub task_id: String,
}

// ============================================================================
// Delegate Requests
// ============================================================================

/// Register (or re-register) an organization
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterDelegateRequest {
    #[validate(
        length(min = 1, max = 100, message = "Organization must be 1-100 characters"),
        custom(function = "validate_not_blank", message = "Organization must not be blank")
    )]
    pub organization: String,
}

/// `POST /delegate/register?event_id=...`; accepts an event ID or delegate join code
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterDelegateQuery {
    pub event_id: Option<String>,
}

/// Delegate removes a volunteer from their organization
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RemoveVolunteerRequest {
    #[validate(email(message = "Invalid volunteer email"))]
    pub volunteer_email: String,

    /// Required when the caller delegates more than one organization
    pub delegate_org_code: Option<String>,
}

/// Delegate detaches their organization from its event
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DelegateLeaveRequest {
    /// Limit to one organization; all of the caller's organizations otherwise
    pub delegate_org_code: Option<String>,
}

/// Organizer removes a delegate and their organization from an event
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RemoveDelegateRequest {
    #[validate(email(message = "Invalid delegate email"))]
    pub delegate_email: String,
}

// ============================================================================
// Volunteer Requests
// ============================================================================

/// Volunteer leaves; the filters narrow which memberships are left
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct VolunteerLeaveRequest {
    pub delegate_org_code: Option<String>,
    pub event_id: Option<String>,
}
