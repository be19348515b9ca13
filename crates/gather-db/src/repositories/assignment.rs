//! PostgreSQL implementation of AssignmentRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use gather_core::entities::Assignment;
use gather_core::traits::{AssignmentRepository, RepoResult};
use gather_core::value_objects::Snowflake;

use crate::models::{AssignmentModel, TaskCountModel};

use super::error::map_db_error;

/// PostgreSQL implementation of AssignmentRepository
#[derive(Clone)]
pub struct PgAssignmentRepository {
    pool: PgPool,
}

impl PgAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentRepository for PgAssignmentRepository {
    #[instrument(skip(self))]
    async fn find(&self, task_id: Snowflake, user_email: &str) -> RepoResult<Option<Assignment>> {
        let result = sqlx::query_as::<_, AssignmentModel>(
            r#"
            SELECT id, event_id, task_id, user_email, assigned_by, assigned_at
            FROM task_assignments
            WHERE task_id = $1 AND user_email = $2
            "#,
        )
        .bind(task_id.into_inner())
        .bind(user_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Assignment::from))
    }

    #[instrument(skip(self))]
    async fn find_by_task(&self, task_id: Snowflake) -> RepoResult<Vec<Assignment>> {
        let results = sqlx::query_as::<_, AssignmentModel>(
            r#"
            SELECT id, event_id, task_id, user_email, assigned_by, assigned_at
            FROM task_assignments
            WHERE task_id = $1
            ORDER BY assigned_at, id
            "#,
        )
        .bind(task_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Assignment::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_email: &str) -> RepoResult<Vec<Assignment>> {
        let results = sqlx::query_as::<_, AssignmentModel>(
            r#"
            SELECT id, event_id, task_id, user_email, assigned_by, assigned_at
            FROM task_assignments
            WHERE user_email = $1
            ORDER BY assigned_at, id
            "#,
        )
        .bind(user_email)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Assignment::from).collect())
    }

    #[instrument(skip(self, assignment), fields(task_id = %assignment.task_id, user = %assignment.user_email))]
    async fn insert_if_absent(&self, assignment: &Assignment) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO task_assignments (id, event_id, task_id, user_email, assigned_by, assigned_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (task_id, user_email) DO NOTHING
            "#,
        )
        .bind(assignment.id.into_inner())
        .bind(assignment.event_id.into_inner())
        .bind(assignment.task_id.into_inner())
        .bind(&assignment.user_email)
        .bind(&assignment.assigned_by)
        .bind(assignment.assigned_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn count_by_task(&self, task_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM task_assignments WHERE task_id = $1")
            .bind(task_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count_by_event(&self, event_id: Snowflake) -> RepoResult<HashMap<Snowflake, i64>> {
        let rows = sqlx::query_as::<_, TaskCountModel>(
            r#"
            SELECT task_id, COUNT(*) AS count
            FROM task_assignments
            WHERE event_id = $1
            GROUP BY task_id
            "#,
        )
        .bind(event_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| (Snowflake::new(row.task_id), row.count))
            .collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, task_id: Snowflake, user_email: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM task_assignments WHERE task_id = $1 AND user_email = $2")
            .bind(task_id.into_inner())
            .bind(user_email)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, user_emails), fields(users = user_emails.len()))]
    async fn delete_by_event_users(&self, event_id: Snowflake, user_emails: &[String]) -> RepoResult<u64> {
        if user_emails.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "DELETE FROM task_assignments WHERE event_id = $1 AND user_email = ANY($2)",
        )
        .bind(event_id.into_inner())
        .bind(user_emails)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
