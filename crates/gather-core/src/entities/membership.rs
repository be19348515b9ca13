//! Membership entity - one row of `event_volunteers`
//!
//! A row ties a user to an event as delegate or volunteer. Delegates may own an
//! organization identified by a delegate-org code; every volunteer redeemed
//! through that code carries the same organization name and code plus a
//! back-reference to the delegate. A delegate row may exist with no event.

use chrono::{DateTime, Utc};

use crate::value_objects::{JoinCode, MemberRole, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub id: Snowflake,
    pub event_id: Option<Snowflake>,
    pub user_email: String,
    pub role: MemberRole,
    pub organization: Option<String>,
    pub delegate_org_code: Option<JoinCode>,
    /// For volunteers: the delegate who owns their organization
    pub delegate_email: Option<String>,
    pub notes: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    /// Delegate row owning an organization
    pub fn organization_delegate(
        id: Snowflake,
        user_email: String,
        event_id: Option<Snowflake>,
        organization: String,
        code: JoinCode,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            event_id,
            user_email,
            role: MemberRole::Delegate,
            organization: Some(organization),
            delegate_org_code: Some(code),
            delegate_email: None,
            notes: None,
            joined_at: now,
            updated_at: now,
        }
    }

    /// Delegate row created by redeeming an event's delegate join code,
    /// before any organization is registered
    pub fn event_delegate(id: Snowflake, user_email: String, event_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            event_id: Some(event_id),
            user_email,
            role: MemberRole::Delegate,
            organization: None,
            delegate_org_code: None,
            delegate_email: None,
            notes: None,
            joined_at: now,
            updated_at: now,
        }
    }

    /// Volunteer row with no organization
    pub fn volunteer(id: Snowflake, user_email: String, event_id: Option<Snowflake>) -> Self {
        let now = Utc::now();
        Self {
            id,
            event_id,
            user_email,
            role: MemberRole::Volunteer,
            organization: None,
            delegate_org_code: None,
            delegate_email: None,
            notes: None,
            joined_at: now,
            updated_at: now,
        }
    }

    /// Volunteer row under the organization owned by `delegate`
    pub fn org_volunteer(id: Snowflake, user_email: String, delegate: &Membership) -> Self {
        let mut row = Self::volunteer(id, user_email, delegate.event_id);
        row.link_to(delegate);
        row
    }

    #[inline]
    pub fn is_delegate(&self) -> bool {
        self.role == MemberRole::Delegate
    }

    #[inline]
    pub fn is_volunteer(&self) -> bool {
        self.role == MemberRole::Volunteer
    }

    /// Delegate row that owns an organization
    pub fn owns_organization(&self) -> bool {
        self.is_delegate() && self.delegate_org_code.is_some()
    }

    pub fn in_organization(&self, code: &JoinCode) -> bool {
        self.delegate_org_code.as_ref() == Some(code)
    }

    /// Inherit organization linkage from the delegate row, including its event
    pub fn link_to(&mut self, delegate: &Membership) {
        self.organization.clone_from(&delegate.organization);
        self.delegate_org_code.clone_from(&delegate.delegate_org_code);
        self.delegate_email = Some(delegate.user_email.clone());
        self.event_id = delegate.event_id;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delegate() -> Membership {
        Membership::organization_delegate(
            Snowflake::new(1),
            "d@example.com".to_string(),
            Some(Snowflake::new(10)),
            "Acme".to_string(),
            JoinCode::parse("ABC123").unwrap(),
        )
    }

    #[test]
    fn test_org_volunteer_inherits_linkage() {
        let delegate = delegate();
        let volunteer = Membership::org_volunteer(Snowflake::new(2), "v@example.com".to_string(), &delegate);

        assert!(volunteer.is_volunteer());
        assert_eq!(volunteer.event_id, Some(Snowflake::new(10)));
        assert_eq!(volunteer.organization.as_deref(), Some("Acme"));
        assert_eq!(volunteer.delegate_email.as_deref(), Some("d@example.com"));
        assert!(volunteer.in_organization(&JoinCode::parse("abc123").unwrap()));
    }

    #[test]
    fn test_relink_replaces_previous_org() {
        let mut volunteer = Membership::org_volunteer(Snowflake::new(2), "v@example.com".to_string(), &delegate());

        let other = Membership::organization_delegate(
            Snowflake::new(3),
            "e@example.com".to_string(),
            Some(Snowflake::new(10)),
            "Beta".to_string(),
            JoinCode::parse("BETA01").unwrap(),
        );
        volunteer.link_to(&other);

        assert_eq!(volunteer.organization.as_deref(), Some("Beta"));
        assert_eq!(volunteer.delegate_email.as_deref(), Some("e@example.com"));
        assert!(!volunteer.in_organization(&JoinCode::parse("ABC123").unwrap()));
    }

    #[test]
    fn test_event_delegate_has_no_org() {
        let row = Membership::event_delegate(Snowflake::new(4), "d@example.com".to_string(), Snowflake::new(10));
        assert!(row.is_delegate());
        assert!(!row.owns_organization());
        assert!(delegate().owns_organization());
    }
}
