//! PostgreSQL implementation of TaskRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use gather_core::entities::Task;
use gather_core::error::DomainError;
use gather_core::traits::{RepoResult, TaskRepository};
use gather_core::value_objects::{JoinCode, Snowflake};

use crate::mappers::TaskColumns;
use crate::models::TaskModel;

use super::error::{map_db_error, map_unique_violation};

const TASK_COLUMNS: &str = r#"
    id, event_id, name, description, location, starts_at, ends_at, created_by,
    assigned_delegate_email, assigned_delegate_org_code, assigned_organization,
    join_code, max_volunteers, created_at, updated_at
"#;

/// PostgreSQL implementation of TaskRepository
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_tasks(models: Vec<TaskModel>) -> RepoResult<Vec<Task>> {
    models.into_iter().map(Task::try_from).collect()
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Task>> {
        let result = sqlx::query_as::<_, TaskModel>(&format!(
            "SELECT {TASK_COLUMNS} FROM event_tasks WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Task::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &JoinCode) -> RepoResult<Option<Task>> {
        let result = sqlx::query_as::<_, TaskModel>(&format!(
            "SELECT {TASK_COLUMNS} FROM event_tasks WHERE join_code = $1"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Task::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_event(&self, event_id: Snowflake) -> RepoResult<Vec<Task>> {
        let results = sqlx::query_as::<_, TaskModel>(&format!(
            "SELECT {TASK_COLUMNS} FROM event_tasks WHERE event_id = $1 ORDER BY created_at, id"
        ))
        .bind(event_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_tasks(results)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Task>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, TaskModel>(&format!(
            "SELECT {TASK_COLUMNS} FROM event_tasks WHERE id = ANY($1) ORDER BY created_at, id"
        ))
        .bind(raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_tasks(results)
    }

    #[instrument(skip(self))]
    async fn code_exists(&self, code: &JoinCode) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM event_tasks WHERE join_code = $1)")
            .bind(code.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, task), fields(task_id = %task.id, event_id = %task.event_id))]
    async fn create(&self, task: &Task) -> RepoResult<()> {
        let cols = TaskColumns::new(task);
        sqlx::query(
            r#"
            INSERT INTO event_tasks (id, event_id, name, description, location, starts_at, ends_at,
                                     created_by, assigned_delegate_email, assigned_delegate_org_code,
                                     assigned_organization, join_code, max_volunteers,
                                     created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(cols.id)
        .bind(cols.event_id)
        .bind(&task.name)
        .bind(&task.description)
        .bind(cols.location)
        .bind(cols.starts_at)
        .bind(cols.ends_at)
        .bind(&task.created_by)
        .bind(cols.assigned_delegate_email)
        .bind(cols.assigned_delegate_org_code)
        .bind(cols.assigned_organization)
        .bind(task.join_code.as_str())
        .bind(task.max_volunteers)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::CodeConflict(task.join_code.to_string())))?;

        Ok(())
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn update(&self, task: &Task) -> RepoResult<()> {
        let cols = TaskColumns::new(task);
        let result = sqlx::query(
            r#"
            UPDATE event_tasks
            SET name = $2, description = $3, location = $4, starts_at = $5, ends_at = $6,
                assigned_delegate_email = $7, assigned_delegate_org_code = $8,
                assigned_organization = $9, max_volunteers = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(cols.id)
        .bind(&task.name)
        .bind(&task.description)
        .bind(cols.location)
        .bind(cols.starts_at)
        .bind(cols.ends_at)
        .bind(cols.assigned_delegate_email)
        .bind(cols.assigned_delegate_org_code)
        .bind(cols.assigned_organization)
        .bind(task.max_volunteers)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TaskNotFound(task.id));
        }

        Ok(())
    }
}
