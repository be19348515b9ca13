//! Event entity - an organizer-owned volunteer event

use chrono::{DateTime, Utc};

use crate::value_objects::{JoinCode, Location, Snowflake, TimeWindow};

/// Event entity
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub window: Option<TimeWindow>,
    /// Email of the organizer who created the event
    pub created_by: String,
    pub delegate_join_code: JoinCode,
    /// Legacy mode: redeeming this code makes the caller a plain volunteer
    pub volunteer_join_code: Option<JoinCode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        id: Snowflake,
        name: String,
        created_by: String,
        delegate_join_code: JoinCode,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: None,
            location: None,
            window: None,
            created_by,
            delegate_join_code,
            volunteer_join_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_organizer(&self, email: &str) -> bool {
        self.created_by.eq_ignore_ascii_case(email)
    }

    /// Which of this event's codes, if any, the given code is
    pub fn code_kind(&self, code: &JoinCode) -> Option<EventCodeKind> {
        if &self.delegate_join_code == code {
            Some(EventCodeKind::Delegate)
        } else if self.volunteer_join_code.as_ref() == Some(code) {
            Some(EventCodeKind::Volunteer)
        } else {
            None
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// The two kinds of code an event carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCodeKind {
    Delegate,
    Volunteer,
}
