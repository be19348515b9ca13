//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gather_core::{GeoPoint, MemberRole};

// ============================================================================
// Event Responses
// ============================================================================

/// Event as seen by a caller. Join codes are only present for the organizer.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate_join_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer_join_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    /// Strip the join codes for callers who are not the organizer
    pub fn without_codes(mut self) -> Self {
        self.delegate_join_code = None;
        self.volunteer_join_code = None;
        self
    }
}

/// Result of redeeming an event code
#[derive(Debug, Clone, Serialize)]
pub struct JoinEventResponse {
    pub event: EventResponse,
    pub membership: MembershipResponse,
}

/// Delegates and volunteers of an event
#[derive(Debug, Clone, Serialize)]
pub struct EventMembersResponse {
    pub event_id: String,
    pub delegates: Vec<MembershipResponse>,
    pub volunteers: Vec<MembershipResponse>,
}

// ============================================================================
// Membership Responses
// ============================================================================

/// One membership row
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub id: String,
    pub event_id: Option<String>,
    pub user_email: String,
    pub role: MemberRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate_org_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// An organization and the event it is attached to
#[derive(Debug, Clone, Serialize)]
pub struct DelegateOrgResponse {
    pub event_id: Option<String>,
    pub organization: Option<String>,
    pub delegate_org_code: Option<String>,
}

/// Rows removed by a leave or remove operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeaveResponse {
    pub memberships_removed: u64,
    pub memberships_detached: u64,
    pub assignments_removed: u64,
}

impl LeaveResponse {
    pub fn merge(self, other: Self) -> Self {
        Self {
            memberships_removed: self.memberships_removed + other.memberships_removed,
            memberships_detached: self.memberships_detached + other.memberships_detached,
            assignments_removed: self.assignments_removed + other.assignments_removed,
        }
    }
}

// ============================================================================
// Task Responses
// ============================================================================

/// Task with its live volunteer count
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub event_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub created_by: String,
    pub assigned_delegate: Option<String>,
    pub delegate_org_code: Option<String>,
    pub organization: Option<String>,
    pub join_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_volunteers: Option<i32>,
    pub volunteer_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A volunteer assigned to a task
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResponse {
    pub task_id: String,
    pub event_id: String,
    pub user_email: String,
    pub assigned_by: String,
    pub self_joined: bool,
    pub assigned_at: DateTime<Utc>,
}

// ============================================================================
// Profile Responses
// ============================================================================

/// Event fields shown inside profiles
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

/// One delegate row of the caller with its volunteers
#[derive(Debug, Clone, Serialize)]
pub struct DelegateOrganizationProfile {
    pub organization: Option<String>,
    pub delegate_org_code: Option<String>,
    pub event: Option<EventSummary>,
    pub volunteers: Vec<MembershipResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DelegateProfileResponse {
    pub email: String,
    pub organizations: Vec<DelegateOrganizationProfile>,
}

/// One volunteer row of the caller with its event
#[derive(Debug, Clone, Serialize)]
pub struct VolunteerMembershipProfile {
    pub membership: MembershipResponse,
    pub event: Option<EventSummary>,
}

/// A task the caller is assigned to
#[derive(Debug, Clone, Serialize)]
pub struct VolunteerTaskProfile {
    pub task_id: String,
    pub task_name: String,
    pub event_id: String,
    pub assigned_by: String,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolunteerProfileResponse {
    pub email: String,
    pub memberships: Vec<VolunteerMembershipProfile>,
    pub tasks: Vec<VolunteerTaskProfile>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub store: String,
}

impl ReadinessResponse {
    pub fn ready(store_healthy: bool) -> Self {
        Self {
            status: if store_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                store: if store_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
