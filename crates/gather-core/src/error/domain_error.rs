//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(Snowflake),

    #[error("No event, task or organization uses code {0}")]
    JoinCodeNotFound(String),

    #[error("Delegate not found: {0}")]
    DelegateNotFound(String),

    #[error("Membership not found: {0}")]
    MembershipNotFound(String),

    #[error("Assignment not found")]
    AssignmentNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid code: {0}")]
    InvalidCode(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the event organizer can do this")]
    NotEventOrganizer,

    #[error("Only the organization's delegate can do this")]
    NotOrganizationDelegate,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Role conflict: {0}")]
    RoleConflict(String),

    #[error("Code already in use: {0}")]
    CodeConflict(String),

    #[error("Membership already exists: {0}")]
    DuplicateMembership(String),

    #[error("Organization name already registered")]
    OrganizationExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("No free code found after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::EventNotFound(_) => "UNKNOWN_EVENT",
            Self::TaskNotFound(_) => "UNKNOWN_TASK",
            Self::JoinCodeNotFound(_) => "UNKNOWN_CODE",
            Self::DelegateNotFound(_) => "UNKNOWN_DELEGATE",
            Self::MembershipNotFound(_) => "UNKNOWN_MEMBERSHIP",
            Self::AssignmentNotFound => "UNKNOWN_ASSIGNMENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidCode(_) => "INVALID_CODE",

            // Authorization
            Self::NotEventOrganizer => "NOT_EVENT_ORGANIZER",
            Self::NotOrganizationDelegate => "NOT_ORGANIZATION_DELEGATE",

            // Conflict
            Self::RoleConflict(_) => "ROLE_CONFLICT",
            Self::CodeConflict(_) => "CODE_CONFLICT",
            Self::DuplicateMembership(_) => "DUPLICATE_MEMBERSHIP",
            Self::OrganizationExists => "ORGANIZATION_EXISTS",

            // Infrastructure
            Self::CodeSpaceExhausted { .. } => "CODE_SPACE_EXHAUSTED",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound(_)
                | Self::TaskNotFound(_)
                | Self::JoinCodeNotFound(_)
                | Self::DelegateNotFound(_)
                | Self::MembershipNotFound(_)
                | Self::AssignmentNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::InvalidCode(_))
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotEventOrganizer | Self::NotOrganizationDelegate)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::RoleConflict(_)
                | Self::CodeConflict(_)
                | Self::DuplicateMembership(_)
                | Self::OrganizationExists
        )
    }
}
