//! Volunteer service

use gather_core::entities::Membership;
use gather_core::{DomainError, JoinCode, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{
    event_summary_for, AssignmentWithTask, LeaveResponse, MembershipResponse, VolunteerLeaveRequest,
    VolunteerMembershipProfile, VolunteerProfileResponse, VolunteerTaskProfile,
};

use super::access::parse_id;
use super::context::ServiceContext;
use super::delegate::{parse_optional_code, DelegateService};
use super::error::ServiceResult;

/// Volunteer service
pub struct VolunteerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VolunteerService<'a> {
    /// Create a new VolunteerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Redeem a delegate-org code: become (or be relinked as) a volunteer of
    /// that organization, in whatever event it is attached to
    #[instrument(skip(self))]
    pub async fn join_organization(&self, email: &str, raw_code: &str) -> ServiceResult<MembershipResponse> {
        let code = JoinCode::parse(raw_code)?;
        let delegate = self
            .ctx
            .membership_repo()
            .find_delegate_by_code(&code)
            .await?
            .ok_or_else(|| DomainError::DelegateNotFound(code.to_string()))?;

        if delegate.user_email == email {
            return Err(DomainError::RoleConflict("delegates cannot volunteer for their own organization".to_string()).into());
        }
        if let Some(event_id) = delegate.event_id {
            let event = self.ctx.event_repo().find_by_id(event_id).await?;
            if event.is_some_and(|event| event.is_organizer(email)) {
                warn!(event_id = %event_id, user = %email, "Organizer tried to volunteer in own event");
                return Err(DomainError::RoleConflict("organizers cannot volunteer in their own event".to_string()).into());
            }
        }

        let candidate = Membership::org_volunteer(self.ctx.generate_id(), email.to_string(), &delegate);
        let row = match self.ctx.membership_repo().upsert(&candidate).await {
            Ok(row) => row,
            Err(err @ DomainError::RoleConflict(_)) => {
                warn!(code = %code, user = %email, "Delegate tried to join an organization as volunteer");
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };

        info!(code = %code, event_id = ?row.event_id, user = %email, "Volunteer joined organization");

        Ok(MembershipResponse::from(row))
    }

    /// Leave every volunteer membership matching the filters, together with
    /// the assignments held in those events
    #[instrument(skip(self, request))]
    pub async fn leave(&self, email: &str, request: VolunteerLeaveRequest) -> ServiceResult<LeaveResponse> {
        let code = parse_optional_code(request.delegate_org_code.as_deref())?;
        let event_id: Option<Snowflake> = request
            .event_id
            .as_deref()
            .map(|raw| parse_id(raw, "event_id"))
            .transpose()?;

        let rows: Vec<Membership> = self
            .ctx
            .membership_repo()
            .find_by_user(email)
            .await?
            .into_iter()
            .filter(Membership::is_volunteer)
            .filter(|row| code.as_ref().is_none_or(|code| row.in_organization(code)))
            .filter(|row| event_id.is_none_or(|id| row.event_id == Some(id)))
            .collect();

        if rows.is_empty() {
            return Err(DomainError::MembershipNotFound(email.to_string()).into());
        }

        let delegates = DelegateService::new(self.ctx);
        let mut total = LeaveResponse::default();
        for row in &rows {
            total = total.merge(delegates.drop_row(row).await?);
        }

        info!(
            user = %email,
            removed = total.memberships_removed,
            assignments = total.assignments_removed,
            "Volunteer left"
        );

        Ok(total)
    }

    /// The caller's volunteer memberships and task assignments
    #[instrument(skip(self))]
    pub async fn profile(&self, email: &str) -> ServiceResult<VolunteerProfileResponse> {
        let rows: Vec<Membership> = self
            .ctx
            .membership_repo()
            .find_by_user(email)
            .await?
            .into_iter()
            .filter(Membership::is_volunteer)
            .collect();
        let assignments = self.ctx.assignment_repo().find_by_user(email).await?;

        let mut event_ids: Vec<Snowflake> = rows
            .iter()
            .filter_map(|row| row.event_id)
            .chain(assignments.iter().map(|a| a.event_id))
            .collect();
        event_ids.sort_unstable();
        event_ids.dedup();
        let events = self.ctx.event_repo().find_by_ids(&event_ids).await?;

        let task_ids: Vec<Snowflake> = assignments.iter().map(|a| a.task_id).collect();
        let tasks = self.ctx.task_repo().find_by_ids(&task_ids).await?;

        let memberships = rows
            .iter()
            .map(|row| VolunteerMembershipProfile {
                membership: MembershipResponse::from(row),
                event: event_summary_for(&events, row.event_id),
            })
            .collect();

        let tasks = assignments
            .iter()
            .map(|assignment| {
                let task_name = tasks
                    .iter()
                    .find(|task| task.id == assignment.task_id)
                    .map(|task| task.name.as_str());
                VolunteerTaskProfile::from(AssignmentWithTask { assignment, task_name })
            })
            .collect();

        Ok(VolunteerProfileResponse {
            email: email.to_string(),
            memberships,
            tasks,
        })
    }
}
