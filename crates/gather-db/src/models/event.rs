//! Event database model

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use gather_core::value_objects::Location;

/// Database model for events table
#[derive(Debug, Clone, FromRow)]
pub struct EventModel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<Json<Location>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub delegate_join_code: String,
    pub volunteer_join_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
