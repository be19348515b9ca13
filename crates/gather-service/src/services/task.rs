//! Task service
//!
//! Handles task CRUD, delegate assignment with propagation to the delegate's
//! volunteers, and volunteers joining or leaving tasks by code.

use gather_core::entities::{Assignment, Membership, Task};
use gather_core::{DomainError, JoinCode, Snowflake};
use tracing::{debug, info, instrument, warn};

use crate::dto::{
    AssignmentResponse, CreateTaskRequest, LeaveResponse, TaskResponse, TaskWithCount, UpdateTaskRequest,
};

use super::access::{parse_id, AccessService};
use super::codes::{CodeGenerator, CodeScope};
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::event::{build_location, merge_location, merge_window};

/// Task service
pub struct TaskService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TaskService<'a> {
    /// Create a new TaskService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn with_count(&self, task: Task) -> ServiceResult<TaskResponse> {
        let volunteer_count = self.ctx.assignment_repo().count_by_task(task.id).await?;
        Ok(TaskResponse::from(TaskWithCount { task, volunteer_count }))
    }

    /// Create a task in an event the caller organizes
    #[instrument(skip(self, request))]
    pub async fn create_task(
        &self,
        event_id: Snowflake,
        organizer: &str,
        request: CreateTaskRequest,
    ) -> ServiceResult<TaskResponse> {
        AccessService::new(self.ctx).require_organizer(event_id, organizer).await?;

        let location = build_location(request.location, request.location_name)?;
        let window = merge_window(None, request.start_date, request.end_date)?;
        let code = CodeGenerator::new(self.ctx).generate(CodeScope::TaskCode).await?;

        let mut task = Task::new(
            self.ctx.generate_id(),
            event_id,
            request.name.trim().to_string(),
            organizer.to_string(),
            code,
        );
        task.description = request.description;
        task.location = location;
        task.window = window;
        task.max_volunteers = request.max_volunteers;

        self.ctx.task_repo().create(&task).await?;

        info!(event_id = %event_id, task_id = %task.id, code = %task.join_code, "Task created");

        Ok(TaskResponse::from(TaskWithCount { task, volunteer_count: 0 }))
    }

    /// Edit a task of an event the caller organizes
    #[instrument(skip(self, request))]
    pub async fn update_task(
        &self,
        event_id: Snowflake,
        task_id: Snowflake,
        organizer: &str,
        request: UpdateTaskRequest,
    ) -> ServiceResult<TaskResponse> {
        let access = AccessService::new(self.ctx);
        access.require_organizer(event_id, organizer).await?;
        let mut task = access.task_in_event(event_id, task_id).await?;

        if let Some(name) = request.name {
            task.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            task.description = Some(description);
        }
        if let Some(max) = request.max_volunteers {
            task.max_volunteers = Some(max);
        }
        task.location = merge_location(task.location.take(), request.location, request.location_name)?;
        task.window = merge_window(task.window, request.start_date, request.end_date)?;
        task.touch();

        self.ctx.task_repo().update(&task).await?;

        info!(event_id = %event_id, task_id = %task_id, "Task updated");

        self.with_count(task).await
    }

    /// Tasks of an event, oldest first, with live counts
    #[instrument(skip(self))]
    pub async fn list_tasks(&self, event_id: Snowflake, email: &str) -> ServiceResult<Vec<TaskResponse>> {
        AccessService::new(self.ctx).require_participant(event_id, email).await?;

        let tasks = self.ctx.task_repo().find_by_event(event_id).await?;
        let counts = self.ctx.assignment_repo().count_by_event(event_id).await?;

        Ok(tasks
            .into_iter()
            .map(|task| {
                let volunteer_count = counts.get(&task.id).copied().unwrap_or(0);
                TaskResponse::from(TaskWithCount { task, volunteer_count })
            })
            .collect())
    }

    /// Volunteers assigned to a task
    #[instrument(skip(self))]
    pub async fn task_volunteers(
        &self,
        event_id: Snowflake,
        task_id: Snowflake,
        email: &str,
    ) -> ServiceResult<Vec<AssignmentResponse>> {
        let access = AccessService::new(self.ctx);
        access.require_participant(event_id, email).await?;
        access.task_in_event(event_id, task_id).await?;

        let rows = self.ctx.assignment_repo().find_by_task(task_id).await?;
        Ok(rows.iter().map(AssignmentResponse::from).collect())
    }

    /// Assign a delegate of the event to a task and assign every volunteer of
    /// the delegate's organization in that event. Existing assignments stay.
    #[instrument(skip(self))]
    pub async fn assign_delegate(
        &self,
        event_id: Snowflake,
        task_id: Snowflake,
        organizer: &str,
        delegate_email: &str,
    ) -> ServiceResult<TaskResponse> {
        let access = AccessService::new(self.ctx);
        access.require_organizer(event_id, organizer).await?;
        let mut task = access.task_in_event(event_id, task_id).await?;

        let delegate_email = delegate_email.trim().to_lowercase();
        let delegate = self
            .ctx
            .membership_repo()
            .find(event_id, &delegate_email)
            .await?
            .filter(Membership::is_delegate)
            .ok_or_else(|| DomainError::DelegateNotFound(delegate_email.clone()))?;

        task.assign_delegate(&delegate);
        task.touch();
        self.ctx.task_repo().update(&task).await?;

        let propagated = self.propagate(&task, &delegate, organizer).await?;

        info!(
            event_id = %event_id,
            task_id = %task_id,
            user = %delegate.user_email,
            propagated,
            "Delegate assigned to task"
        );

        self.with_count(task).await
    }

    /// Give every volunteer of the delegate's organization in the task's event an assignment
    async fn propagate(&self, task: &Task, delegate: &Membership, assigned_by: &str) -> ServiceResult<u64> {
        let Some(code) = delegate.delegate_org_code.as_ref() else {
            debug!(task_id = %task.id, user = %delegate.user_email, "Delegate has no organization to propagate");
            return Ok(0);
        };

        let members = self.ctx.membership_repo().find_by_org_code(code).await?;
        let mut inserted = 0;
        for member in members {
            if !member.is_volunteer() {
                continue;
            }
            if member.event_id != Some(task.event_id) {
                warn!(task_id = %task.id, user = %member.user_email, "Skipping volunteer outside the task's event");
                continue;
            }
            let assignment = Assignment::new(
                self.ctx.generate_id(),
                task.event_id,
                task.id,
                member.user_email.clone(),
                assigned_by.to_string(),
            );
            if self.ctx.assignment_repo().insert_if_absent(&assignment).await? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Clear the delegate snapshot; assignments made through it stay
    #[instrument(skip(self))]
    pub async fn unassign_delegate(
        &self,
        event_id: Snowflake,
        task_id: Snowflake,
        organizer: &str,
    ) -> ServiceResult<TaskResponse> {
        let access = AccessService::new(self.ctx);
        access.require_organizer(event_id, organizer).await?;
        let mut task = access.task_in_event(event_id, task_id).await?;

        if task.assigned_delegate.is_some() {
            task.clear_delegate();
            task.touch();
            self.ctx.task_repo().update(&task).await?;
            info!(event_id = %event_id, task_id = %task_id, "Delegate unassigned from task");
        }

        self.with_count(task).await
    }

    /// Redeem a task code: become a volunteer of the task's event if needed,
    /// then hold exactly one assignment for the task
    #[instrument(skip(self))]
    pub async fn join_task(&self, email: &str, raw_code: &str) -> ServiceResult<TaskResponse> {
        let code = JoinCode::parse(raw_code)?;
        let task = self
            .ctx
            .task_repo()
            .find_by_code(&code)
            .await?
            .ok_or_else(|| DomainError::JoinCodeNotFound(code.to_string()))?;

        let event = AccessService::new(self.ctx).event(task.event_id).await?;
        if event.is_organizer(email) {
            return Err(DomainError::RoleConflict("organizers cannot join their own tasks".to_string()).into());
        }

        let candidate = Membership::volunteer(self.ctx.generate_id(), email.to_string(), Some(task.event_id));
        let membership = self.ctx.membership_repo().insert_if_absent(&candidate).await?;
        if membership.is_delegate() {
            warn!(event_id = %task.event_id, user = %email, "Delegate tried to join a task as volunteer");
            return Err(DomainError::RoleConflict(format!("{email} is a delegate of this event")).into());
        }

        let assignment = Assignment::new(
            self.ctx.generate_id(),
            task.event_id,
            task.id,
            email.to_string(),
            email.to_string(),
        );
        if self.ctx.assignment_repo().insert_if_absent(&assignment).await? {
            info!(event_id = %task.event_id, task_id = %task.id, user = %email, "Volunteer joined task");
        }

        self.with_count(task).await
    }

    /// Drop the caller's assignment to one task; membership is kept
    #[instrument(skip(self))]
    pub async fn leave_task(&self, email: &str, raw_task_id: &str) -> ServiceResult<LeaveResponse> {
        let task_id = parse_id(raw_task_id, "task_id")?;
        if self.ctx.task_repo().find_by_id(task_id).await?.is_none() {
            return Err(DomainError::TaskNotFound(task_id).into());
        }

        if !self.ctx.assignment_repo().delete(task_id, email).await? {
            return Err(DomainError::AssignmentNotFound.into());
        }

        info!(task_id = %task_id, user = %email, "Volunteer left task");

        Ok(LeaveResponse {
            assignments_removed: 1,
            ..LeaveResponse::default()
        })
    }
}
