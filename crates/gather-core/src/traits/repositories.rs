//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Implementations must enforce the unique
//! constraints documented on each trait at write time and report violations
//! as conflict-class [`DomainError`]s.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::{Assignment, Event, Membership, Task};
use crate::error::DomainError;
use crate::value_objects::{JoinCode, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Event Repository
// ============================================================================

/// Unique: every code appears at most once across both code fields of all events
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Find event by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Event>>;

    /// Find the event whose delegate or volunteer join code matches
    async fn find_by_code(&self, code: &JoinCode) -> RepoResult<Option<Event>>;

    /// Events created by the organizer
    async fn find_by_creator(&self, email: &str) -> RepoResult<Vec<Event>>;

    /// Bulk lookup; missing IDs are skipped
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Event>>;

    /// Check both code fields
    async fn code_exists(&self, code: &JoinCode) -> RepoResult<bool>;

    async fn create(&self, event: &Event) -> RepoResult<()>;

    async fn update(&self, event: &Event) -> RepoResult<()>;
}

// ============================================================================
// Membership Repository
// ============================================================================

/// Unique:
/// - one row per (event, user) while the event is set
/// - one detached row per (user, org code)
/// - one delegate per org code
/// - one delegate per organization name (case-insensitive)
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// The caller's row in an event
    async fn find(&self, event_id: Snowflake, user_email: &str) -> RepoResult<Option<Membership>>;

    /// The caller's row under an organization while that organization has no event
    async fn find_detached(&self, user_email: &str, code: &JoinCode) -> RepoResult<Option<Membership>>;

    /// The delegate row owning an org code
    async fn find_delegate_by_code(&self, code: &JoinCode) -> RepoResult<Option<Membership>>;

    /// The delegate row of an organization, matched case-insensitively
    async fn find_delegate_by_organization(&self, organization: &str) -> RepoResult<Option<Membership>>;

    /// Every row of a user, across events
    async fn find_by_user(&self, user_email: &str) -> RepoResult<Vec<Membership>>;

    /// Every row of an event
    async fn find_by_event(&self, event_id: Snowflake) -> RepoResult<Vec<Membership>>;

    /// The delegate row and every volunteer row sharing the org code
    async fn find_by_org_code(&self, code: &JoinCode) -> RepoResult<Vec<Membership>>;

    /// Whether any row carries this org code
    async fn code_exists(&self, code: &JoinCode) -> RepoResult<bool>;

    async fn create(&self, membership: &Membership) -> RepoResult<()>;

    /// Overwrite every mutable field of the row with the same ID
    async fn update(&self, membership: &Membership) -> RepoResult<()>;

    /// Insert unless a row already exists for the same (event, user) or, for a
    /// detached row, the same (user, org code). Returns the stored row, which
    /// is the pre-existing one when nothing was inserted.
    async fn insert_if_absent(&self, membership: &Membership) -> RepoResult<Membership>;

    /// Atomic insert-or-relink on the same key as [`Self::insert_if_absent`].
    /// An existing volunteer row keeps its ID and join time and takes the
    /// organization linkage of `membership`; an existing delegate row is left
    /// untouched and reported as `RoleConflict`.
    async fn upsert(&self, membership: &Membership) -> RepoResult<Membership>;

    /// Set `event_id` on every row sharing the org code. Returns rows moved.
    ///
    /// When moving into an event, a volunteer row there held by one of the
    /// organization's volunteers under another or no organization is deleted
    /// and the organization's row takes its place.
    async fn set_event_for_org(&self, code: &JoinCode, event_id: Option<Snowflake>) -> RepoResult<u64>;

    /// Hand an organization to another user: the delegate row's user and every
    /// volunteer's `delegate_email` become `delegate_email`. Returns rows touched.
    async fn transfer_org(&self, code: &JoinCode, delegate_email: &str) -> RepoResult<u64>;

    /// Delete by ID. Returns whether a row was removed.
    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Task Repository
// ============================================================================

/// Unique: task join code
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Task>>;

    async fn find_by_code(&self, code: &JoinCode) -> RepoResult<Option<Task>>;

    /// Tasks of an event, oldest first
    async fn find_by_event(&self, event_id: Snowflake) -> RepoResult<Vec<Task>>;

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Task>>;

    async fn code_exists(&self, code: &JoinCode) -> RepoResult<bool>;

    async fn create(&self, task: &Task) -> RepoResult<()>;

    async fn update(&self, task: &Task) -> RepoResult<()>;
}

// ============================================================================
// Assignment Repository
// ============================================================================

/// Unique: (task, volunteer)
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn find(&self, task_id: Snowflake, user_email: &str) -> RepoResult<Option<Assignment>>;

    async fn find_by_task(&self, task_id: Snowflake) -> RepoResult<Vec<Assignment>>;

    async fn find_by_user(&self, user_email: &str) -> RepoResult<Vec<Assignment>>;

    /// Insert unless (task, volunteer) already exists. Returns whether a row was inserted.
    async fn insert_if_absent(&self, assignment: &Assignment) -> RepoResult<bool>;

    /// Live count of assignment rows for a task
    async fn count_by_task(&self, task_id: Snowflake) -> RepoResult<i64>;

    /// Live counts for every task of an event that has at least one assignment
    async fn count_by_event(&self, event_id: Snowflake) -> RepoResult<HashMap<Snowflake, i64>>;

    /// Remove one (task, volunteer) row. Returns whether a row was removed.
    async fn delete(&self, task_id: Snowflake, user_email: &str) -> RepoResult<bool>;

    /// Remove every assignment in the event held by any of the given users
    async fn delete_by_event_users(&self, event_id: Snowflake, user_emails: &[String]) -> RepoResult<u64>;
}

// ============================================================================
// Store health
// ============================================================================

#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Round-trip to the backing store
    async fn ping(&self) -> RepoResult<()>;
}
