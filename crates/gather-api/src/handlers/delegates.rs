//! Delegate handlers
//!
//! Organization registration and attachment, volunteer management and
//! volunteer sign-up by delegate-org code.

use axum::{
    extract::{Path, State},
    Json,
};
use gather_service::dto::{
    DelegateLeaveRequest, DelegateOrgResponse, DelegateProfileResponse, LeaveResponse,
    MembershipResponse, RegisterDelegateQuery, RegisterDelegateRequest, RemoveDelegateRequest,
    RemoveVolunteerRequest,
};
use gather_service::{DelegateService, VolunteerService};

use crate::extractors::{
    ApiQuery, AttachPath, AuthUser, CodePath, EventIdPath, OptionalValidatedJson, ValidatedJson,
};
use crate::response::ApiResult;
use crate::state::AppState;

/// Register an organization, optionally attaching it to an event
///
/// POST /delegate/register?event_id={id or delegate join code}
pub async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<RegisterDelegateQuery>,
    ValidatedJson(request): ValidatedJson<RegisterDelegateRequest>,
) -> ApiResult<Json<DelegateOrgResponse>> {
    let service = DelegateService::new(state.service_context());
    let response = service
        .register(&auth.email, &request.organization, query.event_id.as_deref())
        .await?;
    Ok(Json(response))
}

/// POST /delegate/attach/{event_id}/{delegate_org_code}
pub async fn attach(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<AttachPath>,
) -> ApiResult<Json<DelegateOrgResponse>> {
    let service = DelegateService::new(state.service_context());
    let response = service
        .attach(&auth.email, &path.event_id, &path.delegate_org_code)
        .await?;
    Ok(Json(response))
}

/// Join an organization as volunteer
///
/// POST /delegate/join/{delegate_org_code}
pub async fn join_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CodePath>,
) -> ApiResult<Json<MembershipResponse>> {
    let service = VolunteerService::new(state.service_context());
    let response = service.join_organization(&auth.email, path.code()).await?;
    Ok(Json(response))
}

/// POST /delegate/volunteer/remove
pub async fn remove_volunteer(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<RemoveVolunteerRequest>,
) -> ApiResult<Json<LeaveResponse>> {
    let service = DelegateService::new(state.service_context());
    let response = service.remove_volunteer(&auth.email, request).await?;
    Ok(Json(response))
}

/// Detach the caller's organization(s) from their events
///
/// POST /delegate/leave
pub async fn leave(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalValidatedJson(request): OptionalValidatedJson<DelegateLeaveRequest>,
) -> ApiResult<Json<LeaveResponse>> {
    let service = DelegateService::new(state.service_context());
    let response = service
        .leave(&auth.email, request.delegate_org_code.as_deref())
        .await?;
    Ok(Json(response))
}

/// Organizer removes a delegate from an event
///
/// POST /delegate/remove/{event_id}
pub async fn remove_delegate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<EventIdPath>,
    ValidatedJson(request): ValidatedJson<RemoveDelegateRequest>,
) -> ApiResult<Json<LeaveResponse>> {
    let service = DelegateService::new(state.service_context());
    let response = service
        .remove_delegate(path.event_id()?, &auth.email, &request.delegate_email)
        .await?;
    Ok(Json(response))
}

/// GET /delegate/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DelegateProfileResponse>> {
    let service = DelegateService::new(state.service_context());
    let response = service.profile(&auth.email).await?;
    Ok(Json(response))
}
