//! Task entity <-> model mapper

use chrono::{DateTime, Utc};
use sqlx::types::Json;

use gather_core::entities::{DelegateSnapshot, Task};
use gather_core::error::DomainError;
use gather_core::value_objects::{Location, Snowflake};

use super::{stored_code, stored_optional_code, window_from_columns, window_to_columns};
use crate::models::TaskModel;

impl TryFrom<TaskModel> for Task {
    type Error = DomainError;

    fn try_from(model: TaskModel) -> Result<Self, Self::Error> {
        let assigned_delegate = match model.assigned_delegate_email {
            Some(delegate_email) => Some(DelegateSnapshot {
                delegate_email,
                delegate_org_code: stored_optional_code(
                    "assigned_delegate_org_code",
                    model.assigned_delegate_org_code.as_deref(),
                )?,
                organization: model.assigned_organization,
            }),
            None => None,
        };

        Ok(Task {
            id: Snowflake::new(model.id),
            event_id: Snowflake::new(model.event_id),
            name: model.name,
            description: model.description,
            location: model.location.map(|Json(location)| location),
            window: window_from_columns(model.starts_at, model.ends_at),
            created_by: model.created_by,
            assigned_delegate,
            join_code: stored_code("join_code", &model.join_code)?,
            max_volunteers: model.max_volunteers,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Task values flattened for binding
pub struct TaskColumns<'a> {
    pub id: i64,
    pub event_id: i64,
    pub location: Option<Json<&'a Location>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub assigned_delegate_email: Option<&'a str>,
    pub assigned_delegate_org_code: Option<&'a str>,
    pub assigned_organization: Option<&'a str>,
}

impl<'a> TaskColumns<'a> {
    pub fn new(task: &'a Task) -> Self {
        let (starts_at, ends_at) = window_to_columns(task.window.as_ref());
        let snapshot = task.assigned_delegate.as_ref();
        Self {
            id: task.id.into_inner(),
            event_id: task.event_id.into_inner(),
            location: task.location.as_ref().map(Json),
            starts_at,
            ends_at,
            assigned_delegate_email: snapshot.map(|s| s.delegate_email.as_str()),
            assigned_delegate_org_code: snapshot
                .and_then(|s| s.delegate_org_code.as_ref())
                .map(|c| c.as_str()),
            assigned_organization: snapshot.and_then(|s| s.organization.as_deref()),
        }
    }
}
