//! Event service
//!
//! Handles event creation, editing and the per-role event listings.

use chrono::{DateTime, Utc};
use gather_core::entities::Event;
use gather_core::{EventRole, GeoPoint, Location, Snowflake, TimeWindow};
use tracing::{info, instrument};

use crate::dto::{
    CreateEventRequest, EventMembersResponse, EventResponse, MembershipResponse, UpdateEventRequest,
};

use super::access::AccessService;
use super::codes::{CodeGenerator, CodeScope};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Build a location from a point and an optional place name
pub(crate) fn build_location(point: Option<GeoPoint>, name: Option<String>) -> ServiceResult<Option<Location>> {
    match (point, name) {
        (Some(point), name) => Ok(Some(Location { point, name })),
        (None, Some(_)) => Err(ServiceError::validation("location_name requires a location")),
        (None, None) => Ok(None),
    }
}

/// Apply a partial location edit to the stored one
pub(crate) fn merge_location(
    existing: Option<Location>,
    point: Option<GeoPoint>,
    name: Option<String>,
) -> ServiceResult<Option<Location>> {
    match (existing, point, name) {
        (existing, None, None) => Ok(existing),
        (Some(mut location), None, Some(name)) => {
            location.name = Some(name);
            Ok(Some(location))
        }
        (existing, Some(point), name) => Ok(Some(Location {
            point,
            name: name.or_else(|| existing.and_then(|l| l.name)),
        })),
        (None, None, Some(_)) => Err(ServiceError::validation("location_name requires a location")),
    }
}

/// Apply a partial start/end edit to the stored window
pub(crate) fn merge_window(
    existing: Option<TimeWindow>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> ServiceResult<Option<TimeWindow>> {
    if start.is_none() && end.is_none() {
        return Ok(existing);
    }
    let start = start.or(existing.map(|w| w.start));
    let end = end.or(existing.map(|w| w.end));
    match (start, end) {
        (Some(start), Some(end)) => Ok(Some(TimeWindow::new(start, end)?)),
        _ => Err(ServiceError::validation("start_date and end_date must be given together")),
    }
}

/// Event service
pub struct EventService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventService<'a> {
    /// Create a new EventService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an event owned by the caller, minting its join codes
    #[instrument(skip(self, request))]
    pub async fn create_event(&self, organizer: &str, request: CreateEventRequest) -> ServiceResult<EventResponse> {
        let location = build_location(request.location, request.location_name)?;
        let window = merge_window(None, request.start_date, request.end_date)?;

        let codes = CodeGenerator::new(self.ctx);
        let delegate_code = codes.generate(CodeScope::EventCode).await?;
        let volunteer_code = if request.volunteer_code {
            Some(
                codes
                    .generate_excluding(CodeScope::EventCode, std::slice::from_ref(&delegate_code))
                    .await?,
            )
        } else {
            None
        };

        let mut event = Event::new(self.ctx.generate_id(), request.name.trim().to_string(), organizer.to_string(), delegate_code);
        event.description = request.description;
        event.location = location;
        event.window = window;
        event.volunteer_join_code = volunteer_code;

        self.ctx.event_repo().create(&event).await?;

        info!(
            event_id = %event.id,
            code = %event.delegate_join_code,
            user = %organizer,
            "Event created"
        );

        Ok(EventResponse::from(event))
    }

    /// Edit an event; only its creator may
    #[instrument(skip(self, request))]
    pub async fn update_event(
        &self,
        event_id: Snowflake,
        organizer: &str,
        request: UpdateEventRequest,
    ) -> ServiceResult<EventResponse> {
        let mut event = AccessService::new(self.ctx).require_organizer(event_id, organizer).await?;

        if let Some(name) = request.name {
            event.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            event.description = Some(description);
        }
        event.location = merge_location(event.location.take(), request.location, request.location_name)?;
        event.window = merge_window(event.window, request.start_date, request.end_date)?;
        event.touch();

        self.ctx.event_repo().update(&event).await?;

        info!(event_id = %event_id, "Event updated");

        Ok(EventResponse::from(event))
    }

    /// Get an event; codes are only shown to the organizer
    #[instrument(skip(self))]
    pub async fn get_event(&self, event_id: Snowflake, email: &str) -> ServiceResult<EventResponse> {
        let (event, is_organizer) = AccessService::new(self.ctx)
            .require_participant(event_id, email)
            .await?;

        let response = EventResponse::from(event);
        Ok(if is_organizer { response } else { response.without_codes() })
    }

    /// Events the caller holds the given role in
    #[instrument(skip(self))]
    pub async fn list_events(&self, email: &str, role: EventRole) -> ServiceResult<Vec<EventResponse>> {
        let Some(member_role) = role.member_role() else {
            let events = self.ctx.event_repo().find_by_creator(email).await?;
            return Ok(events.into_iter().map(EventResponse::from).collect());
        };

        let mut event_ids: Vec<Snowflake> = self
            .ctx
            .membership_repo()
            .find_by_user(email)
            .await?
            .into_iter()
            .filter(|row| row.role == member_role)
            .filter_map(|row| row.event_id)
            .collect();
        event_ids.sort_unstable();
        event_ids.dedup();

        let events = self.ctx.event_repo().find_by_ids(&event_ids).await?;
        Ok(events
            .into_iter()
            .map(|event| {
                let is_organizer = event.is_organizer(email);
                let response = EventResponse::from(event);
                if is_organizer { response } else { response.without_codes() }
            })
            .collect())
    }

    /// Delegates and volunteers of an event (organizer only)
    #[instrument(skip(self))]
    pub async fn list_members(&self, event_id: Snowflake, organizer: &str) -> ServiceResult<EventMembersResponse> {
        AccessService::new(self.ctx).require_organizer(event_id, organizer).await?;

        let rows = self.ctx.membership_repo().find_by_event(event_id).await?;
        let (delegates, volunteers): (Vec<_>, Vec<_>) = rows.iter().partition(|row| row.is_delegate());

        Ok(EventMembersResponse {
            event_id: event_id.to_string(),
            delegates: delegates.into_iter().map(MembershipResponse::from).collect(),
            volunteers: volunteers.into_iter().map(MembershipResponse::from).collect(),
        })
    }
}
