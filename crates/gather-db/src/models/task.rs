//! Task database model

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use gather_core::value_objects::Location;

/// Database model for event_tasks table
#[derive(Debug, Clone, FromRow)]
pub struct TaskModel {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<Json<Location>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub assigned_delegate_email: Option<String>,
    pub assigned_delegate_org_code: Option<String>,
    pub assigned_organization: Option<String>,
    pub join_code: String,
    pub max_volunteers: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
