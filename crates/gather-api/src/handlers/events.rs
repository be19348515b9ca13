//! Event handlers
//!
//! Event CRUD for organizers, per-role event listings and event join by code.

use axum::{
    extract::{Path, State},
    Json,
};
use gather_service::dto::{
    CreateEventRequest, EventMembersResponse, EventResponse, JoinEventResponse, ListEventsQuery,
    UpdateEventRequest,
};
use gather_service::{DelegateService, EventService};

use crate::extractors::{ApiQuery, AuthUser, CodePath, EventIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create an event owned by the caller
///
/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> ApiResult<Created<Json<EventResponse>>> {
    let service = EventService::new(state.service_context());
    let response = service.create_event(&auth.email, request).await?;
    Ok(Created(Json(response)))
}

/// Events the caller holds a role in
///
/// GET /events?role=organizer|delegate|volunteer
pub async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListEventsQuery>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let service = EventService::new(state.service_context());
    let response = service.list_events(&auth.email, query.role).await?;
    Ok(Json(response))
}

/// GET /events/{event_id}
pub async fn get_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<EventIdPath>,
) -> ApiResult<Json<EventResponse>> {
    let service = EventService::new(state.service_context());
    let response = service.get_event(path.event_id()?, &auth.email).await?;
    Ok(Json(response))
}

/// Edit an event (creator only)
///
/// PATCH /events/{event_id}
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<EventIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let service = EventService::new(state.service_context());
    let response = service.update_event(path.event_id()?, &auth.email, request).await?;
    Ok(Json(response))
}

/// Delegates and volunteers of an event (organizer only)
///
/// GET /events/{event_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<EventIdPath>,
) -> ApiResult<Json<EventMembersResponse>> {
    let service = EventService::new(state.service_context());
    let response = service.list_members(path.event_id()?, &auth.email).await?;
    Ok(Json(response))
}

/// Redeem an event's delegate or volunteer join code
///
/// POST /event/join/{code}
pub async fn join_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CodePath>,
) -> ApiResult<Json<JoinEventResponse>> {
    let service = DelegateService::new(state.service_context());
    let response = service.join_event(&auth.email, path.code()).await?;
    Ok(Json(response))
}
