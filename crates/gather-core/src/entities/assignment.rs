//! Assignment entity - one row of `task_assignments`

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A volunteer's assignment to a task; at most one per (task, volunteer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: Snowflake,
    pub event_id: Snowflake,
    pub task_id: Snowflake,
    pub user_email: String,
    /// Who created the assignment: the volunteer on self-join, the organizer on propagation
    pub assigned_by: String,
    pub assigned_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(
        id: Snowflake,
        event_id: Snowflake,
        task_id: Snowflake,
        user_email: String,
        assigned_by: String,
    ) -> Self {
        Self {
            id,
            event_id,
            task_id,
            user_email,
            assigned_by,
            assigned_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_self_joined(&self) -> bool {
        self.user_email == self.assigned_by
    }
}
