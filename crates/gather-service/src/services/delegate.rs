//! Delegate service
//!
//! Organizations are owned by a delegate row carrying a delegate-org code.
//! Attaching or detaching an organization moves the delegate row and every
//! volunteer row that shares the code in one repository call.

use gather_core::entities::{Event, Membership};
use gather_core::{DomainError, JoinCode, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{
    event_summary_for, DelegateOrgResponse, DelegateOrganizationProfile, DelegateProfileResponse,
    EventResponse, JoinEventResponse, LeaveResponse, MembershipResponse, RemoveVolunteerRequest,
};

use super::access::{AccessService, EventRef};
use super::codes::{CodeGenerator, CodeScope};
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Parse an optional client-supplied code
pub(crate) fn parse_optional_code(raw: Option<&str>) -> ServiceResult<Option<JoinCode>> {
    Ok(raw.map(JoinCode::parse).transpose()?)
}

/// Delegate service
pub struct DelegateService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DelegateService<'a> {
    /// Create a new DelegateService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn delegate_row(&self, code: &JoinCode) -> ServiceResult<Membership> {
        self.ctx
            .membership_repo()
            .find_delegate_by_code(code)
            .await?
            .ok_or_else(|| DomainError::DelegateNotFound(code.to_string()).into())
    }

    /// Clear the caller's place in `event` before an organization is moved in.
    ///
    /// A volunteer row is a role conflict. A delegate row without an
    /// organization is dropped so the organization's row takes its place.
    async fn prepare_slot(&self, event: &Event, email: &str, code: Option<&JoinCode>) -> ServiceResult<()> {
        if event.is_organizer(email) {
            warn!(event_id = %event.id, user = %email, "Organizer tried to delegate in own event");
            return Err(DomainError::RoleConflict("organizers cannot delegate in their own event".to_string()).into());
        }

        let Some(row) = self.ctx.membership_repo().find(event.id, email).await? else {
            return Ok(());
        };

        if row.is_volunteer() {
            warn!(event_id = %event.id, user = %email, "Volunteer tried to become delegate");
            return Err(DomainError::RoleConflict(format!("{email} is a volunteer of this event")).into());
        }
        match row.delegate_org_code.as_ref() {
            None => {
                self.ctx.membership_repo().delete(row.id).await?;
                Ok(())
            }
            Some(existing) if code == Some(existing) => Ok(()),
            Some(_) => Err(DomainError::DuplicateMembership(format!(
                "{email} already delegates another organization in this event"
            ))
            .into()),
        }
    }

    /// Detach an organization from its event and drop the event's assignments
    /// held by its delegate and volunteers. Detached organizations are left alone.
    pub(crate) async fn detach_org(&self, delegate: &Membership) -> ServiceResult<LeaveResponse> {
        let (Some(event_id), Some(code)) = (delegate.event_id, delegate.delegate_org_code.as_ref()) else {
            return Ok(LeaveResponse::default());
        };

        let emails: Vec<String> = self
            .ctx
            .membership_repo()
            .find_by_org_code(code)
            .await?
            .into_iter()
            .map(|row| row.user_email)
            .collect();

        let detached = self.ctx.membership_repo().set_event_for_org(code, None).await?;
        let removed = self.ctx.assignment_repo().delete_by_event_users(event_id, &emails).await?;

        info!(
            event_id = %event_id,
            code = %code,
            detached,
            assignments = removed,
            "Organization detached from event"
        );

        Ok(LeaveResponse {
            memberships_detached: detached,
            assignments_removed: removed,
            ..LeaveResponse::default()
        })
    }

    /// Delete one membership row and its assignments in the row's event
    pub(crate) async fn drop_row(&self, row: &Membership) -> ServiceResult<LeaveResponse> {
        let removed = u64::from(self.ctx.membership_repo().delete(row.id).await?);
        let assignments = match row.event_id {
            Some(event_id) => {
                self.ctx
                    .assignment_repo()
                    .delete_by_event_users(event_id, std::slice::from_ref(&row.user_email))
                    .await?
            }
            None => 0,
        };
        Ok(LeaveResponse {
            memberships_removed: removed,
            assignments_removed: assignments,
            ..LeaveResponse::default()
        })
    }

    /// Move an organization the caller owns into `event`
    async fn move_to_event(&self, delegate: &Membership, event: &Event) -> ServiceResult<Membership> {
        let code = delegate
            .delegate_org_code
            .as_ref()
            .ok_or(DomainError::NotOrganizationDelegate)?;

        if delegate.event_id == Some(event.id) {
            return Ok(delegate.clone());
        }

        self.prepare_slot(event, &delegate.user_email, Some(code)).await?;
        self.detach_org(delegate).await?;
        let moved = self.ctx.membership_repo().set_event_for_org(code, Some(event.id)).await?;

        info!(event_id = %event.id, code = %code, moved, "Organization attached to event");

        self.delegate_row(code).await
    }

    /// Hand an existing organization to `email`
    async fn take_over(&self, existing: &Membership, email: &str) -> ServiceResult<Membership> {
        let code = existing
            .delegate_org_code
            .as_ref()
            .ok_or(DomainError::NotOrganizationDelegate)?;

        let members = self.ctx.membership_repo().find_by_org_code(code).await?;
        if members.iter().any(|row| row.is_volunteer() && row.user_email == email) {
            warn!(code = %code, user = %email, "Volunteer tried to take over own organization");
            return Err(DomainError::RoleConflict(format!("{email} volunteers for this organization")).into());
        }
        if let Some(event_id) = existing.event_id {
            let event = AccessService::new(self.ctx).event(event_id).await?;
            self.prepare_slot(&event, email, Some(code)).await?;
        }

        let touched = self.ctx.membership_repo().transfer_org(code, email).await?;
        info!(
            code = %code,
            previous = %existing.user_email,
            user = %email,
            touched,
            "Organization handed to new delegate"
        );

        self.delegate_row(code).await
    }

    /// Register an organization. A name that is already registered keeps its
    /// row and code, and the caller becomes its delegate.
    /// With an event reference the organization ends up attached to that event.
    #[instrument(skip(self))]
    pub async fn register(
        &self,
        email: &str,
        organization: &str,
        event_ref: Option<&str>,
    ) -> ServiceResult<DelegateOrgResponse> {
        let event_ref = event_ref.map(EventRef::parse).transpose()?;
        let organization = organization.trim();

        let event = match event_ref {
            Some(event_ref) => Some(AccessService::new(self.ctx).resolve_event(&event_ref).await?),
            None => None,
        };

        if let Some(existing) = self
            .ctx
            .membership_repo()
            .find_delegate_by_organization(organization)
            .await?
        {
            let existing = if existing.user_email == email {
                existing
            } else {
                self.take_over(&existing, email).await?
            };
            let row = match event {
                Some(event) => self.move_to_event(&existing, &event).await?,
                None => existing,
            };
            return Ok(DelegateOrgResponse::from(row));
        }

        let code = match &event {
            Some(event) => {
                self.prepare_slot(event, email, None).await?;
                let fallback = &event.delegate_join_code;
                if self.ctx.membership_repo().code_exists(fallback).await? {
                    CodeGenerator::new(self.ctx).generate(CodeScope::DelegateOrgCode).await?
                } else {
                    fallback.clone()
                }
            }
            None => CodeGenerator::new(self.ctx).generate(CodeScope::DelegateOrgCode).await?,
        };

        let row = Membership::organization_delegate(
            self.ctx.generate_id(),
            email.to_string(),
            event.as_ref().map(|e| e.id),
            organization.to_string(),
            code,
        );
        self.ctx.membership_repo().create(&row).await?;

        info!(
            code = %row.delegate_org_code.as_ref().map(ToString::to_string).unwrap_or_default(),
            event_id = ?row.event_id,
            user = %email,
            "Organization registered"
        );

        Ok(DelegateOrgResponse::from(row))
    }

    /// Attach the caller's organization to an event given by ID or delegate join code
    #[instrument(skip(self))]
    pub async fn attach(&self, email: &str, raw_event: &str, raw_code: &str) -> ServiceResult<DelegateOrgResponse> {
        let event_ref = EventRef::parse(raw_event)?;
        let code = JoinCode::parse(raw_code)?;

        let event = AccessService::new(self.ctx).resolve_event(&event_ref).await?;
        let delegate = self.delegate_row(&code).await?;
        if delegate.user_email != email {
            warn!(code = %code, user = %email, "Attach by someone other than the delegate");
            return Err(DomainError::NotOrganizationDelegate.into());
        }

        let row = self.move_to_event(&delegate, &event).await?;
        Ok(DelegateOrgResponse::from(row))
    }

    /// Redeem an event code. The delegate join code makes the caller a
    /// delegate; the event's volunteer code makes them a volunteer.
    #[instrument(skip(self))]
    pub async fn join_event(&self, email: &str, raw_code: &str) -> ServiceResult<JoinEventResponse> {
        let code = JoinCode::parse(raw_code)?;
        let event = self
            .ctx
            .event_repo()
            .find_by_code(&code)
            .await?
            .ok_or_else(|| DomainError::JoinCodeNotFound(code.to_string()))?;

        if event.is_organizer(email) {
            warn!(event_id = %event.id, user = %email, "Organizer tried to join own event");
            return Err(DomainError::RoleConflict("organizers cannot join their own event".to_string()).into());
        }

        let as_delegate = event.delegate_join_code == code;
        let candidate = if as_delegate {
            Membership::event_delegate(self.ctx.generate_id(), email.to_string(), event.id)
        } else {
            Membership::volunteer(self.ctx.generate_id(), email.to_string(), Some(event.id))
        };

        let membership = self.ctx.membership_repo().insert_if_absent(&candidate).await?;
        if membership.role != candidate.role {
            warn!(event_id = %event.id, user = %email, role = %membership.role, "Event join with the other role");
            return Err(DomainError::RoleConflict(format!("{email} is already a {} of this event", membership.role)).into());
        }

        info!(event_id = %event.id, user = %email, role = %membership.role, "Joined event");

        Ok(JoinEventResponse {
            event: EventResponse::from(event).without_codes(),
            membership: MembershipResponse::from(membership),
        })
    }

    /// Remove a volunteer from an organization the caller delegates
    #[instrument(skip(self, request))]
    pub async fn remove_volunteer(&self, email: &str, request: RemoveVolunteerRequest) -> ServiceResult<LeaveResponse> {
        let code = parse_optional_code(request.delegate_org_code.as_deref())?;
        let volunteer = request.volunteer_email.trim().to_lowercase();

        let org = AccessService::new(self.ctx).owned_organization(email, code.as_ref()).await?;
        let org_code = org.delegate_org_code.as_ref().ok_or(DomainError::NotOrganizationDelegate)?;

        let row = self
            .ctx
            .membership_repo()
            .find_by_org_code(org_code)
            .await?
            .into_iter()
            .find(|row| row.is_volunteer() && row.user_email == volunteer)
            .ok_or_else(|| DomainError::MembershipNotFound(volunteer.clone()))?;

        let result = self.drop_row(&row).await?;

        info!(
            code = %org_code,
            event_id = ?row.event_id,
            user = %volunteer,
            assignments = result.assignments_removed,
            "Volunteer removed from organization"
        );

        Ok(result)
    }

    /// Detach the caller's organizations from their events. A delegate row
    /// without an organization is removed instead.
    #[instrument(skip(self))]
    pub async fn leave(&self, email: &str, raw_code: Option<&str>) -> ServiceResult<LeaveResponse> {
        let code = parse_optional_code(raw_code)?;
        let access = AccessService::new(self.ctx);

        if let Some(code) = code {
            let org = access.owned_organization(email, Some(&code)).await?;
            return self.detach_org(&org).await;
        }

        let rows: Vec<Membership> = self
            .ctx
            .membership_repo()
            .find_by_user(email)
            .await?
            .into_iter()
            .filter(Membership::is_delegate)
            .collect();
        if rows.is_empty() {
            return Err(DomainError::NotOrganizationDelegate.into());
        }

        let mut total = LeaveResponse::default();
        for row in &rows {
            let result = if row.owns_organization() {
                self.detach_org(row).await?
            } else {
                self.drop_row(row).await?
            };
            total = total.merge(result);
        }

        info!(user = %email, detached = total.memberships_detached, removed = total.memberships_removed, "Delegate left");

        Ok(total)
    }

    /// Organizer removes a delegate, detaching their organization from the event
    #[instrument(skip(self))]
    pub async fn remove_delegate(
        &self,
        event_id: Snowflake,
        organizer: &str,
        delegate_email: &str,
    ) -> ServiceResult<LeaveResponse> {
        AccessService::new(self.ctx).require_organizer(event_id, organizer).await?;

        let delegate_email = delegate_email.trim().to_lowercase();
        let row = self
            .ctx
            .membership_repo()
            .find(event_id, &delegate_email)
            .await?
            .filter(Membership::is_delegate)
            .ok_or_else(|| DomainError::DelegateNotFound(delegate_email.clone()))?;

        let result = if row.owns_organization() {
            self.detach_org(&row).await?
        } else {
            self.drop_row(&row).await?
        };

        info!(event_id = %event_id, user = %delegate_email, "Delegate removed from event");

        Ok(result)
    }

    /// The caller's organizations with their volunteers and event linkage
    #[instrument(skip(self))]
    pub async fn profile(&self, email: &str) -> ServiceResult<DelegateProfileResponse> {
        let rows: Vec<Membership> = self
            .ctx
            .membership_repo()
            .find_by_user(email)
            .await?
            .into_iter()
            .filter(Membership::is_delegate)
            .collect();

        let mut event_ids: Vec<Snowflake> = rows.iter().filter_map(|row| row.event_id).collect();
        event_ids.sort_unstable();
        event_ids.dedup();
        let events = self.ctx.event_repo().find_by_ids(&event_ids).await?;

        let mut organizations = Vec::with_capacity(rows.len());
        for row in &rows {
            let volunteers = match row.delegate_org_code.as_ref() {
                Some(code) => self
                    .ctx
                    .membership_repo()
                    .find_by_org_code(code)
                    .await?
                    .iter()
                    .filter(|member| member.is_volunteer())
                    .map(MembershipResponse::from)
                    .collect(),
                None => Vec::new(),
            };
            organizations.push(DelegateOrganizationProfile {
                organization: row.organization.clone(),
                delegate_org_code: row.delegate_org_code.as_ref().map(ToString::to_string),
                event: event_summary_for(&events, row.event_id),
                volunteers,
            });
        }

        Ok(DelegateProfileResponse {
            email: email.to_string(),
            organizations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_code() {
        assert_eq!(parse_optional_code(None).unwrap(), None);
        assert_eq!(
            parse_optional_code(Some("abc123")).unwrap(),
            Some(JoinCode::parse("ABC123").unwrap())
        );
        assert_eq!(parse_optional_code(Some("ABC12")).unwrap_err().status_code(), 400);
    }
}
