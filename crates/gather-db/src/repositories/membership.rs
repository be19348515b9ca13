//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use gather_core::entities::Membership;
use gather_core::error::DomainError;
use gather_core::traits::{MembershipRepository, RepoResult};
use gather_core::value_objects::{JoinCode, Snowflake};

use crate::models::MembershipModel;

use super::error::{map_db_error, map_unique_violation_by_constraint};

const MEMBERSHIP_COLUMNS: &str = r#"
    id, event_id, user_email, role, organization, delegate_org_code, delegate_email,
    notes, joined_at, updated_at
"#;

/// Conflict target matching the unique index that keys this row
fn conflict_target(membership: &Membership) -> &'static str {
    if membership.event_id.is_some() {
        "(event_id, user_email) WHERE event_id IS NOT NULL"
    } else {
        "(user_email, delegate_org_code) WHERE event_id IS NULL"
    }
}

/// Translate a unique violation on `event_volunteers` into the matching domain conflict
fn membership_conflict(membership: &Membership, constraint: Option<&str>) -> DomainError {
    match constraint {
        Some("event_volunteers_delegate_code_key") => DomainError::CodeConflict(
            membership
                .delegate_org_code
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        Some("event_volunteers_delegate_org_key") => DomainError::OrganizationExists,
        _ => DomainError::DuplicateMembership(membership.user_email.clone()),
    }
}

fn into_memberships(models: Vec<MembershipModel>) -> RepoResult<Vec<Membership>> {
    models.into_iter().map(Membership::try_from).collect()
}

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        predicate: &str,
        binds: &[&str],
    ) -> RepoResult<Option<Membership>> {
        let sql = format!("SELECT {MEMBERSHIP_COLUMNS} FROM event_volunteers WHERE {predicate}");
        let mut query = sqlx::query_as::<_, MembershipModel>(&sql);
        for value in binds {
            query = query.bind(*value);
        }
        let result = query
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Membership::try_from).transpose()
    }

    /// Insert with an `ON CONFLICT` clause; returns the row when one was written
    async fn insert_on_conflict(
        &self,
        membership: &Membership,
        on_conflict: &str,
    ) -> RepoResult<Option<Membership>> {
        let sql = format!(
            r#"
            INSERT INTO event_volunteers (id, event_id, user_email, role, organization,
                                          delegate_org_code, delegate_email, notes,
                                          joined_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            {on_conflict}
            RETURNING {MEMBERSHIP_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, MembershipModel>(&sql)
            .bind(membership.id.into_inner())
            .bind(membership.event_id.map(Snowflake::into_inner))
            .bind(&membership.user_email)
            .bind(membership.role.as_str())
            .bind(&membership.organization)
            .bind(membership.delegate_org_code.as_ref().map(JoinCode::as_str))
            .bind(&membership.delegate_email)
            .bind(&membership.notes)
            .bind(membership.joined_at)
            .bind(membership.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation_by_constraint(e, |c| membership_conflict(membership, c)))?;

        result.map(Membership::try_from).transpose()
    }

    /// Re-read the row occupying the key of `membership`
    async fn find_same_key(&self, membership: &Membership) -> RepoResult<Option<Membership>> {
        match (membership.event_id, &membership.delegate_org_code) {
            (Some(event_id), _) => self.find(event_id, &membership.user_email).await,
            (None, Some(code)) => self.find_detached(&membership.user_email, code).await,
            (None, None) => Ok(None),
        }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find(&self, event_id: Snowflake, user_email: &str) -> RepoResult<Option<Membership>> {
        let result = sqlx::query_as::<_, MembershipModel>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM event_volunteers WHERE event_id = $1 AND user_email = $2"
        ))
        .bind(event_id.into_inner())
        .bind(user_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Membership::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_detached(&self, user_email: &str, code: &JoinCode) -> RepoResult<Option<Membership>> {
        self.fetch_one_where(
            "event_id IS NULL AND user_email = $1 AND delegate_org_code = $2",
            &[user_email, code.as_str()],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_delegate_by_code(&self, code: &JoinCode) -> RepoResult<Option<Membership>> {
        self.fetch_one_where(
            "role = 'delegate' AND delegate_org_code = $1",
            &[code.as_str()],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_delegate_by_organization(&self, organization: &str) -> RepoResult<Option<Membership>> {
        self.fetch_one_where(
            "role = 'delegate' AND lower(organization) = lower($1)",
            &[organization.trim()],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_email: &str) -> RepoResult<Vec<Membership>> {
        let results = sqlx::query_as::<_, MembershipModel>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM event_volunteers WHERE user_email = $1 ORDER BY joined_at, id"
        ))
        .bind(user_email)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_memberships(results)
    }

    #[instrument(skip(self))]
    async fn find_by_event(&self, event_id: Snowflake) -> RepoResult<Vec<Membership>> {
        let results = sqlx::query_as::<_, MembershipModel>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM event_volunteers WHERE event_id = $1 ORDER BY joined_at, id"
        ))
        .bind(event_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_memberships(results)
    }

    #[instrument(skip(self))]
    async fn find_by_org_code(&self, code: &JoinCode) -> RepoResult<Vec<Membership>> {
        // Delegate first, then volunteers in join order
        let results = sqlx::query_as::<_, MembershipModel>(&format!(
            r#"
            SELECT {MEMBERSHIP_COLUMNS} FROM event_volunteers
            WHERE delegate_org_code = $1
            ORDER BY (role = 'delegate') DESC, joined_at, id
            "#
        ))
        .bind(code.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_memberships(results)
    }

    #[instrument(skip(self))]
    async fn code_exists(&self, code: &JoinCode) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM event_volunteers WHERE delegate_org_code = $1)",
        )
        .bind(code.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, membership), fields(user = %membership.user_email, role = %membership.role))]
    async fn create(&self, membership: &Membership) -> RepoResult<()> {
        self.insert_on_conflict(membership, "").await?;
        Ok(())
    }

    #[instrument(skip(self, membership), fields(id = %membership.id))]
    async fn update(&self, membership: &Membership) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE event_volunteers
            SET event_id = $2, user_email = $3, role = $4, organization = $5,
                delegate_org_code = $6, delegate_email = $7, notes = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(membership.id.into_inner())
        .bind(membership.event_id.map(Snowflake::into_inner))
        .bind(&membership.user_email)
        .bind(membership.role.as_str())
        .bind(&membership.organization)
        .bind(membership.delegate_org_code.as_ref().map(JoinCode::as_str))
        .bind(&membership.delegate_email)
        .bind(&membership.notes)
        .bind(membership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation_by_constraint(e, |c| membership_conflict(membership, c)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MembershipNotFound(membership.user_email.clone()));
        }

        Ok(())
    }

    #[instrument(skip(self, membership), fields(user = %membership.user_email))]
    async fn insert_if_absent(&self, membership: &Membership) -> RepoResult<Membership> {
        let on_conflict = format!("ON CONFLICT {} DO NOTHING", conflict_target(membership));
        if let Some(inserted) = self.insert_on_conflict(membership, &on_conflict).await? {
            return Ok(inserted);
        }

        self.find_same_key(membership)
            .await?
            .ok_or_else(|| DomainError::InternalError("conflicting membership vanished".to_string()))
    }

    #[instrument(skip(self, membership), fields(user = %membership.user_email))]
    async fn upsert(&self, membership: &Membership) -> RepoResult<Membership> {
        let on_conflict = format!(
            r#"
            ON CONFLICT {} DO UPDATE
            SET organization = EXCLUDED.organization,
                delegate_org_code = EXCLUDED.delegate_org_code,
                delegate_email = EXCLUDED.delegate_email,
                updated_at = EXCLUDED.updated_at
            WHERE event_volunteers.role = 'volunteer'
            "#,
            conflict_target(membership)
        );

        // No row back means the key is held by a delegate row, which is never relinked
        self.insert_on_conflict(membership, &on_conflict)
            .await?
            .ok_or_else(|| DomainError::RoleConflict(format!("{} is a delegate here", membership.user_email)))
    }

    #[instrument(skip(self))]
    async fn set_event_for_org(&self, code: &JoinCode, event_id: Option<Snowflake>) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        if let Some(target) = event_id {
            let absorbed = sqlx::query(
                r#"
                DELETE FROM event_volunteers AS plain
                USING event_volunteers AS org
                WHERE org.delegate_org_code = $1
                  AND org.role = 'volunteer'
                  AND plain.event_id = $2
                  AND plain.role = 'volunteer'
                  AND plain.user_email = org.user_email
                  AND plain.delegate_org_code IS DISTINCT FROM $1
                "#,
            )
            .bind(code.as_str())
            .bind(target.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if absorbed.rows_affected() > 0 {
                debug!(code = %code, rows = absorbed.rows_affected(), "Absorbed plain volunteer rows");
            }
        }

        let result = sqlx::query(
            "UPDATE event_volunteers SET event_id = $2, updated_at = NOW() WHERE delegate_org_code = $1",
        )
        .bind(code.as_str())
        .bind(event_id.map(Snowflake::into_inner))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation_by_constraint(e, |_| {
                DomainError::DuplicateMembership(format!(
                    "a member of organization {code} already belongs to the event"
                ))
            })
        })?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn transfer_org(&self, code: &JoinCode, delegate_email: &str) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE event_volunteers
            SET user_email = CASE WHEN role = 'delegate' THEN $2 ELSE user_email END,
                delegate_email = CASE WHEN role = 'volunteer' THEN $2 ELSE delegate_email END,
                updated_at = NOW()
            WHERE delegate_org_code = $1
            "#,
        )
        .bind(code.as_str())
        .bind(delegate_email)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation_by_constraint(e, |_| {
                DomainError::DuplicateMembership(format!("{delegate_email} already belongs to the event"))
            })
        })?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM event_volunteers WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
