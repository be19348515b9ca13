//! Assignment database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for task_assignments table
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentModel {
    pub id: i64,
    pub event_id: i64,
    pub task_id: i64,
    pub user_email: String,
    pub assigned_by: String,
    pub assigned_at: DateTime<Utc>,
}

/// Per-task assignment count
#[derive(Debug, Clone, Copy, FromRow)]
pub struct TaskCountModel {
    pub task_id: i64,
    pub count: i64,
}
