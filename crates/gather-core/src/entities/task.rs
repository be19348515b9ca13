//! Task entity - a unit of work within an event

use chrono::{DateTime, Utc};

use crate::entities::Membership;
use crate::value_objects::{JoinCode, Location, Snowflake, TimeWindow};

/// Delegate details copied onto a task when the delegate is assigned.
/// Later changes to the delegate row do not flow back into the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateSnapshot {
    pub delegate_email: String,
    pub delegate_org_code: Option<JoinCode>,
    pub organization: Option<String>,
}

impl DelegateSnapshot {
    pub fn of(delegate: &Membership) -> Self {
        Self {
            delegate_email: delegate.user_email.clone(),
            delegate_org_code: delegate.delegate_org_code.clone(),
            organization: delegate.organization.clone(),
        }
    }
}

/// Task entity
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Snowflake,
    pub event_id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub window: Option<TimeWindow>,
    pub created_by: String,
    pub assigned_delegate: Option<DelegateSnapshot>,
    pub join_code: JoinCode,
    /// Advisory only; joins are not rejected when it is exceeded
    pub max_volunteers: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: Snowflake,
        event_id: Snowflake,
        name: String,
        created_by: String,
        join_code: JoinCode,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            event_id,
            name,
            description: None,
            location: None,
            window: None,
            created_by,
            assigned_delegate: None,
            join_code,
            max_volunteers: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn assign_delegate(&mut self, delegate: &Membership) {
        self.assigned_delegate = Some(DelegateSnapshot::of(delegate));
        self.updated_at = Utc::now();
    }

    pub fn clear_delegate(&mut self) {
        self.assigned_delegate = None;
        self.updated_at = Utc::now();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
