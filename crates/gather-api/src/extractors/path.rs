//! Path parameter extractors
//!
//! Typed path parameters. IDs are parsed here so that a malformed ID is a
//! 400 before any handler logic runs; join codes are passed through as typed
//! by the client and normalized by the services.

use gather_core::Snowflake;

use crate::response::ApiError;

fn parse_snowflake(raw: &str, field: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {field} format")))
}

/// Path parameters with event_id
#[derive(Debug, serde::Deserialize)]
pub struct EventIdPath {
    pub event_id: String,
}

impl EventIdPath {
    /// Parse event_id as Snowflake
    pub fn event_id(&self) -> Result<Snowflake, ApiError> {
        parse_snowflake(&self.event_id, "event_id")
    }
}

/// Path parameters with event_id and task_id
#[derive(Debug, serde::Deserialize)]
pub struct EventTaskPath {
    pub event_id: String,
    pub task_id: String,
}

impl EventTaskPath {
    /// Parse event_id as Snowflake
    pub fn event_id(&self) -> Result<Snowflake, ApiError> {
        parse_snowflake(&self.event_id, "event_id")
    }

    /// Parse task_id as Snowflake
    pub fn task_id(&self) -> Result<Snowflake, ApiError> {
        parse_snowflake(&self.task_id, "task_id")
    }
}

/// A join code in the path
#[derive(Debug, serde::Deserialize)]
pub struct CodePath {
    pub code: String,
}

impl CodePath {
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// `/delegate/attach/{event_id}/{delegate_org_code}`; the event may be given
/// by ID or by its delegate join code
#[derive(Debug, serde::Deserialize)]
pub struct AttachPath {
    pub event_id: String,
    pub delegate_org_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_task_path_parsing() {
        let path = EventTaskPath {
            event_id: "42".to_string(),
            task_id: "abc".to_string(),
        };
        assert_eq!(path.event_id().unwrap(), Snowflake::new(42));

        let err = path.task_id().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PATH_PARAMETER");
        assert!(err.to_string().contains("task_id"));
    }
}
