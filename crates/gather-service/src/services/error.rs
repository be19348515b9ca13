//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use gather_common::{domain_status, AppError};
use gather_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Application error (auth, validation, etc.)
    App(AppError),

    /// Caller lacks the role the operation requires
    PermissionDenied { reason: String },

    /// Malformed input that is not a join code
    Validation(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::PermissionDenied { reason } => write!(f, "Permission denied: {reason}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a permission denied error
    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::App(e) => e.status_code(),
            Self::PermissionDenied { .. } => 403,
            Self::Validation(_) => 400,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::PermissionDenied { .. } => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::PermissionDenied { .. } => AppError::InsufficientPermissions,
            ServiceError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_error() {
        let err = ServiceError::permission_denied("not a participant of this event");
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert!(err.to_string().contains("not a participant"));
    }

    #[test]
    fn test_validation_error() {
        let err = ServiceError::validation("delegate_org_code is required");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_domain_errors_keep_their_class() {
        let role = ServiceError::from(DomainError::RoleConflict("delegate here".to_string()));
        assert_eq!(role.status_code(), 409);
        assert_eq!(role.error_code(), "ROLE_CONFLICT");

        let forbidden = ServiceError::from(DomainError::NotOrganizationDelegate);
        assert_eq!(forbidden.status_code(), 403);

        let code = ServiceError::from(DomainError::InvalidCode("ABC12".to_string()));
        assert_eq!(code.status_code(), 400);

        let exhausted = ServiceError::from(DomainError::CodeSpaceExhausted { attempts: 100 });
        assert_eq!(exhausted.status_code(), 500);
    }

    #[test]
    fn test_convert_to_app_error() {
        let app_err: AppError = ServiceError::permission_denied("x").into();
        assert_eq!(app_err.status_code(), 403);

        let app_err: AppError = ServiceError::validation("bad id").into();
        assert_eq!(app_err.error_code(), "VALIDATION_ERROR");

        let domain: AppError = ServiceError::from(DomainError::TaskNotFound(gather_core::Snowflake::new(1))).into();
        assert_eq!(domain.error_code(), "UNKNOWN_TASK");
    }
}
