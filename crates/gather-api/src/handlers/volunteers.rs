//! Volunteer handlers

use axum::{extract::State, Json};
use gather_service::dto::{LeaveResponse, VolunteerLeaveRequest, VolunteerProfileResponse};
use gather_service::VolunteerService;

use crate::extractors::{AuthUser, OptionalValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Leave memberships (all of them, or those matching the body's filters)
///
/// POST /volunteer/leave
pub async fn leave(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalValidatedJson(request): OptionalValidatedJson<VolunteerLeaveRequest>,
) -> ApiResult<Json<LeaveResponse>> {
    let service = VolunteerService::new(state.service_context());
    let response = service.leave(&auth.email, request).await?;
    Ok(Json(response))
}

/// GET /volunteer/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<VolunteerProfileResponse>> {
    let service = VolunteerService::new(state.service_context());
    let response = service.profile(&auth.email).await?;
    Ok(Json(response))
}
