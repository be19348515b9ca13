//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use gather_core::entities::{Assignment, Event, Membership, Task};
use gather_core::{JoinCode, Location, Snowflake};

use super::responses::{
    AssignmentResponse, DelegateOrgResponse, EventResponse, EventSummary, MembershipResponse,
    TaskResponse, VolunteerTaskProfile,
};

fn split_location(location: Option<&Location>) -> (Option<gather_core::GeoPoint>, Option<String>) {
    match location {
        Some(location) => (Some(location.point), location.name.clone()),
        None => (None, None),
    }
}

fn code_string(code: Option<&JoinCode>) -> Option<String> {
    code.map(ToString::to_string)
}

// ============================================================================
// Event Mappers
// ============================================================================

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        let (location, location_name) = split_location(event.location.as_ref());
        Self {
            id: event.id.to_string(),
            name: event.name.clone(),
            description: event.description.clone(),
            location,
            location_name,
            start_date: event.window.map(|w| w.start),
            end_date: event.window.map(|w| w.end),
            created_by: event.created_by.clone(),
            delegate_join_code: Some(event.delegate_join_code.to_string()),
            volunteer_join_code: code_string(event.volunteer_join_code.as_ref()),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self::from(&event)
    }
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            name: event.name.clone(),
            start_date: event.window.map(|w| w.start),
            end_date: event.window.map(|w| w.end),
        }
    }
}

// ============================================================================
// Membership Mappers
// ============================================================================

impl From<&Membership> for MembershipResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            id: membership.id.to_string(),
            event_id: membership.event_id.map(|id| id.to_string()),
            user_email: membership.user_email.clone(),
            role: membership.role,
            organization: membership.organization.clone(),
            delegate_org_code: code_string(membership.delegate_org_code.as_ref()),
            delegate_email: membership.delegate_email.clone(),
            notes: membership.notes.clone(),
            joined_at: membership.joined_at,
        }
    }
}

impl From<Membership> for MembershipResponse {
    fn from(membership: Membership) -> Self {
        Self::from(&membership)
    }
}

impl From<&Membership> for DelegateOrgResponse {
    fn from(delegate: &Membership) -> Self {
        Self {
            event_id: delegate.event_id.map(|id| id.to_string()),
            organization: delegate.organization.clone(),
            delegate_org_code: code_string(delegate.delegate_org_code.as_ref()),
        }
    }
}

impl From<Membership> for DelegateOrgResponse {
    fn from(delegate: Membership) -> Self {
        Self::from(&delegate)
    }
}

// ============================================================================
// Task Mappers
// ============================================================================

/// Task with its live assignment count
#[derive(Debug, Clone)]
pub struct TaskWithCount {
    pub task: Task,
    pub volunteer_count: i64,
}

impl From<TaskWithCount> for TaskResponse {
    fn from(data: TaskWithCount) -> Self {
        let task = data.task;
        let (location, location_name) = split_location(task.location.as_ref());
        let delegate = task.assigned_delegate.as_ref();
        Self {
            id: task.id.to_string(),
            event_id: task.event_id.to_string(),
            name: task.name.clone(),
            description: task.description.clone(),
            location,
            location_name,
            start_date: task.window.map(|w| w.start),
            end_date: task.window.map(|w| w.end),
            created_by: task.created_by.clone(),
            assigned_delegate: delegate.map(|d| d.delegate_email.clone()),
            delegate_org_code: delegate.and_then(|d| code_string(d.delegate_org_code.as_ref())),
            organization: delegate.and_then(|d| d.organization.clone()),
            join_code: task.join_code.to_string(),
            max_volunteers: task.max_volunteers,
            volunteer_count: data.volunteer_count,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl From<&Assignment> for AssignmentResponse {
    fn from(assignment: &Assignment) -> Self {
        Self {
            task_id: assignment.task_id.to_string(),
            event_id: assignment.event_id.to_string(),
            user_email: assignment.user_email.clone(),
            assigned_by: assignment.assigned_by.clone(),
            self_joined: assignment.is_self_joined(),
            assigned_at: assignment.assigned_at,
        }
    }
}

/// Assignment joined with the task it points at
#[derive(Debug, Clone)]
pub struct AssignmentWithTask<'a> {
    pub assignment: &'a Assignment,
    pub task_name: Option<&'a str>,
}

impl From<AssignmentWithTask<'_>> for VolunteerTaskProfile {
    fn from(data: AssignmentWithTask<'_>) -> Self {
        Self {
            task_id: data.assignment.task_id.to_string(),
            task_name: data.task_name.unwrap_or_default().to_string(),
            event_id: data.assignment.event_id.to_string(),
            assigned_by: data.assignment.assigned_by.clone(),
            assigned_at: data.assignment.assigned_at,
        }
    }
}

/// Look up the event a row points at in a prefetched list
pub fn event_summary_for(events: &[Event], event_id: Option<Snowflake>) -> Option<EventSummary> {
    let event_id = event_id?;
    events
        .iter()
        .find(|event| event.id == event_id)
        .map(EventSummary::from)
}
