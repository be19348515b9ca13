//! Access checks and identifier resolution
//!
//! Every mutating operation resolves its event, task or organization through
//! here so that unknown identifiers and missing roles are reported the same
//! way everywhere.

use gather_core::entities::{Event, Membership, Task};
use gather_core::{DomainError, JoinCode, Snowflake};
use tracing::{instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Parse a client-supplied ID
pub fn parse_id(raw: &str, field: &str) -> ServiceResult<Snowflake> {
    Snowflake::parse(raw).map_err(|_| ServiceError::validation(format!("{field} is not a valid ID")))
}

/// Reference to an event as clients send it: its ID or its delegate join code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRef {
    Id(Snowflake),
    Code(JoinCode),
}

impl EventRef {
    /// Six-character input is a join code; anything else must be a numeric ID
    pub fn parse(raw: &str) -> ServiceResult<Self> {
        let trimmed = raw.trim();
        if trimmed.len() == JoinCode::LENGTH {
            return Ok(Self::Code(JoinCode::parse(trimmed)?));
        }
        parse_id(trimmed, "event_id").map(Self::Id)
    }
}

/// Access checks over the context's repositories
pub struct AccessService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn event(&self, event_id: Snowflake) -> ServiceResult<Event> {
        self.ctx
            .event_repo()
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| DomainError::EventNotFound(event_id.to_string()).into())
    }

    #[instrument(skip(self))]
    pub async fn resolve_event(&self, event_ref: &EventRef) -> ServiceResult<Event> {
        match event_ref {
            EventRef::Id(id) => self.event(*id).await,
            EventRef::Code(code) => self
                .ctx
                .event_repo()
                .find_by_code(code)
                .await?
                .ok_or_else(|| DomainError::EventNotFound(code.to_string()).into()),
        }
    }

    /// The event, provided `email` created it
    #[instrument(skip(self))]
    pub async fn require_organizer(&self, event_id: Snowflake, email: &str) -> ServiceResult<Event> {
        let event = self.event(event_id).await?;
        if !event.is_organizer(email) {
            warn!(event_id = %event_id, user = %email, "Organizer check failed");
            return Err(DomainError::NotEventOrganizer.into());
        }
        Ok(event)
    }

    /// The event and whether `email` organizes it; members may read, others may not
    #[instrument(skip(self))]
    pub async fn require_participant(&self, event_id: Snowflake, email: &str) -> ServiceResult<(Event, bool)> {
        let event = self.event(event_id).await?;
        if event.is_organizer(email) {
            return Ok((event, true));
        }
        if self.ctx.membership_repo().find(event_id, email).await?.is_some() {
            return Ok((event, false));
        }
        Err(ServiceError::permission_denied("not a participant of this event"))
    }

    /// A task that belongs to the given event
    #[instrument(skip(self))]
    pub async fn task_in_event(&self, event_id: Snowflake, task_id: Snowflake) -> ServiceResult<Task> {
        self.ctx
            .task_repo()
            .find_by_id(task_id)
            .await?
            .filter(|task| task.event_id == event_id)
            .ok_or_else(|| DomainError::TaskNotFound(task_id).into())
    }

    /// Organizations (delegate rows with a code) owned by `email`
    #[instrument(skip(self))]
    pub async fn owned_organizations(&self, email: &str) -> ServiceResult<Vec<Membership>> {
        let rows = self.ctx.membership_repo().find_by_user(email).await?;
        Ok(rows.into_iter().filter(Membership::owns_organization).collect())
    }

    /// The organization `email` delegates, picked by code when they have several
    #[instrument(skip(self))]
    pub async fn owned_organization(&self, email: &str, code: Option<&JoinCode>) -> ServiceResult<Membership> {
        let owned = self.owned_organizations(email).await?;

        if let Some(code) = code {
            if let Some(row) = owned.into_iter().find(|row| row.in_organization(code)) {
                return Ok(row);
            }
            // Distinguish someone else's organization from an unknown code
            return match self.ctx.membership_repo().find_delegate_by_code(code).await? {
                Some(_) => Err(DomainError::NotOrganizationDelegate.into()),
                None => Err(DomainError::DelegateNotFound(code.to_string()).into()),
            };
        }

        match owned.len() {
            0 => Err(DomainError::NotOrganizationDelegate.into()),
            1 => Ok(owned.into_iter().next().ok_or(DomainError::NotOrganizationDelegate)?),
            _ => Err(ServiceError::validation(
                "delegate_org_code is required when you delegate several organizations",
            )),
        }
    }
}
