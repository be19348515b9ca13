//! PostgreSQL implementation of EventRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use gather_core::entities::Event;
use gather_core::error::DomainError;
use gather_core::traits::{EventRepository, RepoResult};
use gather_core::value_objects::{JoinCode, Snowflake};

use crate::mappers::EventColumns;
use crate::models::EventModel;

use super::error::{map_db_error, map_unique_violation};

const EVENT_COLUMNS: &str = r#"
    id, name, description, location, starts_at, ends_at, created_by,
    delegate_join_code, volunteer_join_code, created_at, updated_at
"#;

/// PostgreSQL implementation of EventRepository
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_events(models: Vec<EventModel>) -> RepoResult<Vec<Event>> {
    models.into_iter().map(Event::try_from).collect()
}

#[async_trait]
impl EventRepository for PgEventRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Event>> {
        let result = sqlx::query_as::<_, EventModel>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Event::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &JoinCode) -> RepoResult<Option<Event>> {
        let result = sqlx::query_as::<_, EventModel>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE delegate_join_code = $1 OR volunteer_join_code = $1"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Event::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_creator(&self, email: &str) -> RepoResult<Vec<Event>> {
        let results = sqlx::query_as::<_, EventModel>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE lower(created_by) = lower($1) ORDER BY created_at DESC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_events(results)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, EventModel>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ANY($1) ORDER BY created_at DESC"
        ))
        .bind(raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_events(results)
    }

    #[instrument(skip(self))]
    async fn code_exists(&self, code: &JoinCode) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM event_codes WHERE code = $1)")
            .bind(code.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn create(&self, event: &Event) -> RepoResult<()> {
        let cols = EventColumns::new(event);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO events (id, name, description, location, starts_at, ends_at, created_by,
                                delegate_join_code, volunteer_join_code, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(cols.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(cols.location)
        .bind(cols.starts_at)
        .bind(cols.ends_at)
        .bind(&event.created_by)
        .bind(cols.delegate_join_code)
        .bind(cols.volunteer_join_code)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // Claim every code; a collision with either column of another event aborts the insert
        for code in std::iter::once(cols.delegate_join_code).chain(cols.volunteer_join_code) {
            sqlx::query("INSERT INTO event_codes (code, event_id) VALUES ($1, $2)")
                .bind(code)
                .bind(cols.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_unique_violation(e, || DomainError::CodeConflict(code.to_string())))?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update(&self, event: &Event) -> RepoResult<()> {
        let cols = EventColumns::new(event);
        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = $2, description = $3, location = $4, starts_at = $5, ends_at = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(cols.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(cols.location)
        .bind(cols.starts_at)
        .bind(cols.ends_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(event.id.to_string()));
        }

        Ok(())
    }
}
