//! Repository trait implementations for [`MemoryStore`]

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use gather_core::entities::{Assignment, Event, Membership, Task};
use gather_core::error::DomainError;
use gather_core::traits::{
    AssignmentRepository, EventRepository, MembershipRepository, RepoResult, StoreHealth,
    TaskRepository,
};
use gather_core::value_objects::{JoinCode, Snowflake};

use super::{check_membership_against, sorted_by_join, MemoryStore};

// ============================================================================
// Events
// ============================================================================

#[async_trait]
impl EventRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Event>> {
        Ok(self.tables.read().events.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &JoinCode) -> RepoResult<Option<Event>> {
        let tables = self.tables.read();
        Ok(tables
            .events
            .values()
            .find(|event| event.code_kind(code).is_some())
            .cloned())
    }

    async fn find_by_creator(&self, email: &str) -> RepoResult<Vec<Event>> {
        let tables = self.tables.read();
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|event| event.is_organizer(email))
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(events)
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Event>> {
        let tables = self.tables.read();
        Ok(ids
            .iter()
            .filter_map(|id| tables.events.get(id))
            .cloned()
            .collect())
    }

    async fn code_exists(&self, code: &JoinCode) -> RepoResult<bool> {
        Ok(self.tables.read().event_code_taken(code, None))
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn create(&self, event: &Event) -> RepoResult<()> {
        let mut tables = self.tables.write();

        let codes = std::iter::once(&event.delegate_join_code).chain(event.volunteer_join_code.as_ref());
        for code in codes {
            if tables.event_code_taken(code, None) {
                return Err(DomainError::CodeConflict(code.to_string()));
            }
        }
        if event.volunteer_join_code.as_ref() == Some(&event.delegate_join_code) {
            return Err(DomainError::CodeConflict(event.delegate_join_code.to_string()));
        }

        tables.events.insert(event.id, event.clone());
        Ok(())
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update(&self, event: &Event) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let stored = tables
            .events
            .get_mut(&event.id)
            .ok_or_else(|| DomainError::EventNotFound(event.id.to_string()))?;

        // Join codes are fixed at creation
        stored.name = event.name.clone();
        stored.description = event.description.clone();
        stored.location = event.location.clone();
        stored.window = event.window;
        stored.updated_at = event.updated_at;
        Ok(())
    }
}

// ============================================================================
// Memberships
// ============================================================================

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn find(&self, event_id: Snowflake, user_email: &str) -> RepoResult<Option<Membership>> {
        let tables = self.tables.read();
        Ok(tables
            .memberships
            .values()
            .find(|row| row.event_id == Some(event_id) && row.user_email == user_email)
            .cloned())
    }

    async fn find_detached(&self, user_email: &str, code: &JoinCode) -> RepoResult<Option<Membership>> {
        let tables = self.tables.read();
        Ok(tables
            .memberships
            .values()
            .find(|row| {
                row.event_id.is_none()
                    && row.user_email == user_email
                    && row.delegate_org_code.as_ref() == Some(code)
            })
            .cloned())
    }

    async fn find_delegate_by_code(&self, code: &JoinCode) -> RepoResult<Option<Membership>> {
        let tables = self.tables.read();
        Ok(tables
            .memberships
            .values()
            .find(|row| row.is_delegate() && row.delegate_org_code.as_ref() == Some(code))
            .cloned())
    }

    async fn find_delegate_by_organization(&self, organization: &str) -> RepoResult<Option<Membership>> {
        let wanted = organization.trim().to_lowercase();
        let tables = self.tables.read();
        Ok(tables
            .memberships
            .values()
            .find(|row| {
                row.is_delegate()
                    && row
                        .organization
                        .as_deref()
                        .is_some_and(|org| org.to_lowercase() == wanted)
            })
            .cloned())
    }

    async fn find_by_user(&self, user_email: &str) -> RepoResult<Vec<Membership>> {
        let tables = self.tables.read();
        let rows = tables
            .memberships
            .values()
            .filter(|row| row.user_email == user_email)
            .cloned()
            .collect();
        Ok(sorted_by_join(rows))
    }

    async fn find_by_event(&self, event_id: Snowflake) -> RepoResult<Vec<Membership>> {
        let tables = self.tables.read();
        let rows = tables
            .memberships
            .values()
            .filter(|row| row.event_id == Some(event_id))
            .cloned()
            .collect();
        Ok(sorted_by_join(rows))
    }

    async fn find_by_org_code(&self, code: &JoinCode) -> RepoResult<Vec<Membership>> {
        let tables = self.tables.read();
        let mut rows = sorted_by_join(
            tables
                .memberships
                .values()
                .filter(|row| row.delegate_org_code.as_ref() == Some(code))
                .cloned()
                .collect(),
        );
        // Stable sort keeps join order within each role
        rows.sort_by_key(|row| !row.is_delegate());
        Ok(rows)
    }

    async fn code_exists(&self, code: &JoinCode) -> RepoResult<bool> {
        let tables = self.tables.read();
        Ok(tables
            .memberships
            .values()
            .any(|row| row.delegate_org_code.as_ref() == Some(code)))
    }

    #[instrument(skip(self, membership), fields(user = %membership.user_email, role = %membership.role))]
    async fn create(&self, membership: &Membership) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if tables.memberships.contains_key(&membership.id) {
            return Err(DomainError::DuplicateMembership(membership.user_email.clone()));
        }
        tables.check_membership(membership)?;
        tables.memberships.insert(membership.id, membership.clone());
        Ok(())
    }

    #[instrument(skip(self, membership), fields(id = %membership.id))]
    async fn update(&self, membership: &Membership) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.memberships.contains_key(&membership.id) {
            return Err(DomainError::MembershipNotFound(membership.user_email.clone()));
        }
        tables.check_membership(membership)?;

        let mut stored = membership.clone();
        if let Some(previous) = tables.memberships.get(&membership.id) {
            stored.joined_at = previous.joined_at;
        }
        tables.memberships.insert(stored.id, stored);
        Ok(())
    }

    #[instrument(skip(self, membership), fields(user = %membership.user_email))]
    async fn insert_if_absent(&self, membership: &Membership) -> RepoResult<Membership> {
        let mut tables = self.tables.write();
        if let Some(existing) = tables.membership_by_key(membership) {
            return Ok(existing.clone());
        }
        tables.check_membership(membership)?;
        tables.memberships.insert(membership.id, membership.clone());
        Ok(membership.clone())
    }

    #[instrument(skip(self, membership), fields(user = %membership.user_email))]
    async fn upsert(&self, membership: &Membership) -> RepoResult<Membership> {
        let mut tables = self.tables.write();

        let Some(existing) = tables.membership_by_key(membership).cloned() else {
            tables.check_membership(membership)?;
            tables.memberships.insert(membership.id, membership.clone());
            return Ok(membership.clone());
        };

        if existing.is_delegate() {
            return Err(DomainError::RoleConflict(format!(
                "{} is a delegate here",
                membership.user_email
            )));
        }

        let mut relinked = existing;
        relinked.organization = membership.organization.clone();
        relinked.delegate_org_code = membership.delegate_org_code.clone();
        relinked.delegate_email = membership.delegate_email.clone();
        relinked.updated_at = membership.updated_at;

        tables.check_membership(&relinked)?;
        tables.memberships.insert(relinked.id, relinked.clone());
        Ok(relinked)
    }

    #[instrument(skip(self))]
    async fn set_event_for_org(&self, code: &JoinCode, event_id: Option<Snowflake>) -> RepoResult<u64> {
        let mut tables = self.tables.write();
        let now = Utc::now();

        let moved: Vec<Membership> = tables
            .memberships
            .values()
            .filter(|row| row.delegate_org_code.as_ref() == Some(code))
            .cloned()
            .map(|mut row| {
                row.event_id = event_id;
                row.updated_at = now;
                row
            })
            .collect();

        // Plain volunteer rows of the org's volunteers in the target event give
        // way to the organization's rows
        let absorbed: Vec<Snowflake> = match event_id {
            Some(target) => tables
                .memberships
                .values()
                .filter(|row| {
                    row.event_id == Some(target)
                        && row.is_volunteer()
                        && row.delegate_org_code.as_ref() != Some(code)
                        && moved.iter().any(|m| m.is_volunteer() && m.user_email == row.user_email)
                })
                .map(|row| row.id)
                .collect(),
            None => Vec::new(),
        };

        // Validate the whole batch against the post-update table before committing
        let untouched: Vec<&Membership> = tables
            .memberships
            .values()
            .filter(|row| row.delegate_org_code.as_ref() != Some(code) && !absorbed.contains(&row.id))
            .collect();
        for row in &moved {
            let others = untouched.iter().copied().chain(moved.iter());
            check_membership_against(others, row).map_err(|_| {
                DomainError::DuplicateMembership(format!(
                    "a member of organization {code} already belongs to the event"
                ))
            })?;
        }

        let touched = moved.len() as u64;
        for id in &absorbed {
            tables.memberships.remove(id);
        }
        for row in moved {
            tables.memberships.insert(row.id, row);
        }
        Ok(touched)
    }

    #[instrument(skip(self))]
    async fn transfer_org(&self, code: &JoinCode, delegate_email: &str) -> RepoResult<u64> {
        let mut tables = self.tables.write();
        let now = Utc::now();

        let changed: Vec<Membership> = tables
            .memberships
            .values()
            .filter(|row| row.in_organization(code))
            .cloned()
            .map(|mut row| {
                if row.is_delegate() {
                    row.user_email = delegate_email.to_string();
                } else {
                    row.delegate_email = Some(delegate_email.to_string());
                }
                row.updated_at = now;
                row
            })
            .collect();

        for row in changed.iter().filter(|row| row.is_delegate()) {
            tables.check_membership(row)?;
        }

        let touched = changed.len() as u64;
        for row in changed {
            tables.memberships.insert(row.id, row);
        }
        Ok(touched)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        Ok(self.tables.write().memberships.remove(&id).is_some())
    }
}

// ============================================================================
// Tasks
// ============================================================================

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Task>> {
        Ok(self.tables.read().tasks.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &JoinCode) -> RepoResult<Option<Task>> {
        let tables = self.tables.read();
        Ok(tables.tasks.values().find(|task| &task.join_code == code).cloned())
    }

    async fn find_by_event(&self, event_id: Snowflake) -> RepoResult<Vec<Task>> {
        let tables = self.tables.read();
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|task| task.event_id == event_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Task>> {
        let tables = self.tables.read();
        let mut tasks: Vec<Task> = ids
            .iter()
            .filter_map(|id| tables.tasks.get(id))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        tasks.dedup_by_key(|task| task.id);
        Ok(tasks)
    }

    async fn code_exists(&self, code: &JoinCode) -> RepoResult<bool> {
        let tables = self.tables.read();
        Ok(tables.tasks.values().any(|task| &task.join_code == code))
    }

    #[instrument(skip(self, task), fields(task_id = %task.id, event_id = %task.event_id))]
    async fn create(&self, task: &Task) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if tables.tasks.values().any(|other| other.join_code == task.join_code) {
            return Err(DomainError::CodeConflict(task.join_code.to_string()));
        }
        tables.tasks.insert(task.id, task.clone());
        Ok(())
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn update(&self, task: &Task) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let stored = tables
            .tasks
            .get_mut(&task.id)
            .ok_or(DomainError::TaskNotFound(task.id))?;

        stored.name = task.name.clone();
        stored.description = task.description.clone();
        stored.location = task.location.clone();
        stored.window = task.window;
        stored.assigned_delegate = task.assigned_delegate.clone();
        stored.max_volunteers = task.max_volunteers;
        stored.updated_at = task.updated_at;
        Ok(())
    }
}

// ============================================================================
// Assignments
// ============================================================================

#[async_trait]
impl AssignmentRepository for MemoryStore {
    async fn find(&self, task_id: Snowflake, user_email: &str) -> RepoResult<Option<Assignment>> {
        let tables = self.tables.read();
        Ok(tables
            .assignments
            .values()
            .find(|row| row.task_id == task_id && row.user_email == user_email)
            .cloned())
    }

    async fn find_by_task(&self, task_id: Snowflake) -> RepoResult<Vec<Assignment>> {
        let tables = self.tables.read();
        let mut rows: Vec<Assignment> = tables
            .assignments
            .values()
            .filter(|row| row.task_id == task_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find_by_user(&self, user_email: &str) -> RepoResult<Vec<Assignment>> {
        let tables = self.tables.read();
        let mut rows: Vec<Assignment> = tables
            .assignments
            .values()
            .filter(|row| row.user_email == user_email)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    #[instrument(skip(self, assignment), fields(task_id = %assignment.task_id, user = %assignment.user_email))]
    async fn insert_if_absent(&self, assignment: &Assignment) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let exists = tables
            .assignments
            .values()
            .any(|row| row.task_id == assignment.task_id && row.user_email == assignment.user_email);
        if exists {
            return Ok(false);
        }
        tables.assignments.insert(assignment.id, assignment.clone());
        Ok(true)
    }

    async fn count_by_task(&self, task_id: Snowflake) -> RepoResult<i64> {
        let tables = self.tables.read();
        let count = tables
            .assignments
            .values()
            .filter(|row| row.task_id == task_id)
            .count();
        Ok(count as i64)
    }

    async fn count_by_event(&self, event_id: Snowflake) -> RepoResult<HashMap<Snowflake, i64>> {
        let tables = self.tables.read();
        let mut counts = HashMap::new();
        for row in tables.assignments.values().filter(|row| row.event_id == event_id) {
            *counts.entry(row.task_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    #[instrument(skip(self))]
    async fn delete(&self, task_id: Snowflake, user_email: &str) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.assignments.len();
        tables
            .assignments
            .retain(|_, row| !(row.task_id == task_id && row.user_email == user_email));
        Ok(tables.assignments.len() < before)
    }

    #[instrument(skip(self, user_emails), fields(users = user_emails.len()))]
    async fn delete_by_event_users(&self, event_id: Snowflake, user_emails: &[String]) -> RepoResult<u64> {
        let mut tables = self.tables.write();
        let before = tables.assignments.len();
        tables.assignments.retain(|_, row| {
            !(row.event_id == event_id && user_emails.iter().any(|email| *email == row.user_email))
        });
        Ok((before - tables.assignments.len()) as u64)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
