//! Membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for event_volunteers table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub id: i64,
    pub event_id: Option<i64>,
    pub user_email: String,
    pub role: String,
    pub organization: Option<String>,
    pub delegate_org_code: Option<String>,
    pub delegate_email: Option<String>,
    pub notes: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MembershipModel {
    #[inline]
    pub fn is_detached(&self) -> bool {
        self.event_id.is_none()
    }
}
