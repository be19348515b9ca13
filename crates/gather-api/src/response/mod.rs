//! Error envelope and status helpers shared by every handler
//!
//! Every failure leaves the API as `{"error": {"code", "message", "details"?}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gather_common::{domain_status, AppError};
use gather_core::DomainError;
use gather_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// Part of the request that could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPart {
    Path,
    Query,
    Body,
}

impl RequestPart {
    fn code(self) -> &'static str {
        match self {
            Self::Path => "INVALID_PATH_PARAMETER",
            Self::Query => "INVALID_QUERY_PARAMETER",
            Self::Body => "INVALID_BODY",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{message}")]
    Malformed { part: RequestPart, message: String },

    #[error("Missing authorization header")]
    MissingAuth,
}

impl ApiError {
    pub fn malformed(part: RequestPart, message: impl Into<String>) -> Self {
        Self::Malformed {
            part,
            message: message.into(),
        }
    }

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::malformed(RequestPart::Path, message)
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::malformed(RequestPart::Query, message)
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::malformed(RequestPart::Body, message)
    }

    /// HTTP status and machine-readable code, resolved together
    fn classify(&self) -> (u16, &str) {
        match self {
            Self::App(e) => (e.status_code(), e.error_code()),
            Self::Service(e) => (e.status_code(), e.error_code()),
            Self::Domain(e) => (domain_status(e), e.code()),
            Self::Validation(_) => (400, "VALIDATION_ERROR"),
            Self::Malformed { part, .. } => (400, part.code()),
            Self::MissingAuth => (401, "MISSING_AUTHORIZATION"),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.classify().0).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    #[must_use]
    pub fn error_code(&self) -> &str {
        self.classify().1
    }
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    error: Detail<'a>,
}

#[derive(Debug, Serialize)]
struct Detail<'a> {
    code: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a ValidationErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server faults never leak their cause to the client
        let message = if status.is_server_error() {
            error!(error = ?self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let details = match &self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        };

        let body = Envelope {
            error: Detail {
                code: self.error_code(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 201 wrapper for creation handlers
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, self.0).into_response()
    }
}
