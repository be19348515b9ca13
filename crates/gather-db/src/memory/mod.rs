//! In-process document store
//!
//! Implements every repository trait over plain maps behind a single
//! `parking_lot::RwLock`. Each trait method takes the lock once, so every call
//! is atomic, and writes enforce the same unique constraints as the PostgreSQL
//! schema. Selected with `DATABASE_URL=memory://`; also backs service tests.

mod repositories;

use std::collections::BTreeMap;

use parking_lot::RwLock;

use gather_core::entities::{Assignment, Event, Membership, Task};
use gather_core::error::DomainError;
use gather_core::value_objects::{JoinCode, Snowflake};

#[derive(Debug, Default)]
struct Tables {
    events: BTreeMap<Snowflake, Event>,
    memberships: BTreeMap<Snowflake, Membership>,
    tasks: BTreeMap<Snowflake, Task>,
    assignments: BTreeMap<Snowflake, Assignment>,
}

/// In-memory implementation of the repository traits
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn event_code_taken(&self, code: &JoinCode, except: Option<Snowflake>) -> bool {
        self.events
            .values()
            .filter(|event| Some(event.id) != except)
            .any(|event| event.code_kind(code).is_some())
    }

    /// Row occupying the unique key of `membership`, other than itself
    fn membership_by_key(&self, membership: &Membership) -> Option<&Membership> {
        self.memberships
            .values()
            .filter(|row| row.id != membership.id)
            .find(|row| same_key(row, membership))
    }

    /// Reject `candidate` if it would violate a unique constraint against any other row
    fn check_membership(&self, candidate: &Membership) -> Result<(), DomainError> {
        check_membership_against(self.memberships.values(), candidate)
    }
}

/// (event, user) while attached; (user, org code) while detached
fn same_key(a: &Membership, b: &Membership) -> bool {
    match (a.event_id, b.event_id) {
        (Some(x), Some(y)) => x == y && a.user_email == b.user_email,
        (None, None) => {
            a.delegate_org_code.is_some()
                && a.delegate_org_code == b.delegate_org_code
                && a.user_email == b.user_email
        }
        _ => false,
    }
}

fn check_membership_against<'a>(
    rows: impl Iterator<Item = &'a Membership>,
    candidate: &Membership,
) -> Result<(), DomainError> {
    for row in rows.filter(|row| row.id != candidate.id) {
        if same_key(row, candidate) {
            return Err(DomainError::DuplicateMembership(candidate.user_email.clone()));
        }
        if !(row.is_delegate() && candidate.is_delegate()) {
            continue;
        }
        if let (Some(a), Some(b)) = (&row.delegate_org_code, &candidate.delegate_org_code) {
            if a == b {
                return Err(DomainError::CodeConflict(b.to_string()));
            }
        }
        if let (Some(a), Some(b)) = (&row.organization, &candidate.organization) {
            if a.to_lowercase() == b.to_lowercase() {
                return Err(DomainError::OrganizationExists);
            }
        }
    }
    Ok(())
}

fn sorted_by_join(mut rows: Vec<Membership>) -> Vec<Membership> {
    rows.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then(a.id.cmp(&b.id)));
    rows
}
