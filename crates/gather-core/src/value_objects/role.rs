//! Membership roles

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Role stored on a membership row
///
/// Organizers are never stored: organizing is implied by being an event's creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Delegate,
    Volunteer,
}

impl MemberRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delegate => "delegate",
            Self::Volunteer => "volunteer",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "delegate" => Ok(Self::Delegate),
            "volunteer" => Ok(Self::Volunteer),
            other => Err(DomainError::ValidationError(format!(
                "unknown membership role: {other}"
            ))),
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a caller can hold relative to an event, used to list "my events"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventRole {
    Organizer,
    Delegate,
    Volunteer,
}

impl EventRole {
    /// The stored membership role, if this role is stored at all
    pub fn member_role(self) -> Option<MemberRole> {
        match self {
            Self::Organizer => None,
            Self::Delegate => Some(MemberRole::Delegate),
            Self::Volunteer => Some(MemberRole::Volunteer),
        }
    }
}

impl From<MemberRole> for EventRole {
    fn from(role: MemberRole) -> Self {
        match role {
            MemberRole::Delegate => Self::Delegate,
            MemberRole::Volunteer => Self::Volunteer,
        }
    }
}
