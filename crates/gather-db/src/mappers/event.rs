//! Event entity <-> model mapper

use chrono::{DateTime, Utc};
use sqlx::types::Json;

use gather_core::entities::Event;
use gather_core::error::DomainError;
use gather_core::value_objects::{Location, Snowflake};

use super::{stored_code, stored_optional_code, window_from_columns, window_to_columns};
use crate::models::EventModel;

impl TryFrom<EventModel> for Event {
    type Error = DomainError;

    fn try_from(model: EventModel) -> Result<Self, Self::Error> {
        Ok(Event {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            location: model.location.map(|Json(location)| location),
            window: window_from_columns(model.starts_at, model.ends_at),
            created_by: model.created_by,
            delegate_join_code: stored_code("delegate_join_code", &model.delegate_join_code)?,
            volunteer_join_code: stored_optional_code(
                "volunteer_join_code",
                model.volunteer_join_code.as_deref(),
            )?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Event values flattened for binding
pub struct EventColumns<'a> {
    pub id: i64,
    pub location: Option<Json<&'a Location>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub delegate_join_code: &'a str,
    pub volunteer_join_code: Option<&'a str>,
}

impl<'a> EventColumns<'a> {
    pub fn new(event: &'a Event) -> Self {
        let (starts_at, ends_at) = window_to_columns(event.window.as_ref());
        Self {
            id: event.id.into_inner(),
            location: event.location.as_ref().map(Json),
            starts_at,
            ends_at,
            delegate_join_code: event.delegate_join_code.as_str(),
            volunteer_join_code: event.volunteer_join_code.as_ref().map(|c| c.as_str()),
        }
    }
}
