//! Assignment entity <-> model mapper

use gather_core::entities::Assignment;
use gather_core::value_objects::Snowflake;

use crate::models::AssignmentModel;

impl From<AssignmentModel> for Assignment {
    fn from(model: AssignmentModel) -> Self {
        Assignment {
            id: Snowflake::new(model.id),
            event_id: Snowflake::new(model.event_id),
            task_id: Snowflake::new(model.task_id),
            user_email: model.user_email,
            assigned_by: model.assigned_by,
            assigned_at: model.assigned_at,
        }
    }
}
