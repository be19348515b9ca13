//! Task handlers
//!
//! Task CRUD and delegate assignment for organizers, task join/leave for volunteers.

use axum::{
    extract::{Path, State},
    Json,
};
use gather_service::dto::{
    AssignDelegateRequest, AssignmentResponse, CreateTaskRequest, LeaveResponse, LeaveTaskRequest,
    TaskResponse, UpdateTaskRequest,
};
use gather_service::TaskService;

use crate::extractors::{AuthUser, CodePath, EventIdPath, EventTaskPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// POST /events/{event_id}/tasks
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<EventIdPath>,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<Created<Json<TaskResponse>>> {
    let service = TaskService::new(state.service_context());
    let response = service.create_task(path.event_id()?, &auth.email, request).await?;
    Ok(Created(Json(response)))
}

/// Tasks of an event with live volunteer counts
///
/// GET /events/{event_id}/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<EventIdPath>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let service = TaskService::new(state.service_context());
    let response = service.list_tasks(path.event_id()?, &auth.email).await?;
    Ok(Json(response))
}

/// PATCH /events/{event_id}/tasks/{task_id}
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<EventTaskPath>,
    ValidatedJson(request): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let service = TaskService::new(state.service_context());
    let response = service
        .update_task(path.event_id()?, path.task_id()?, &auth.email, request)
        .await?;
    Ok(Json(response))
}

/// GET /events/{event_id}/tasks/{task_id}/volunteers
pub async fn task_volunteers(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<EventTaskPath>,
) -> ApiResult<Json<Vec<AssignmentResponse>>> {
    let service = TaskService::new(state.service_context());
    let response = service
        .task_volunteers(path.event_id()?, path.task_id()?, &auth.email)
        .await?;
    Ok(Json(response))
}

/// Assign a delegate and their organization's volunteers to a task
///
/// PATCH /events/{event_id}/tasks/{task_id}/assign
pub async fn assign_delegate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<EventTaskPath>,
    ValidatedJson(request): ValidatedJson<AssignDelegateRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let service = TaskService::new(state.service_context());
    let response = service
        .assign_delegate(path.event_id()?, path.task_id()?, &auth.email, &request.assigned_delegate)
        .await?;
    Ok(Json(response))
}

/// PATCH /events/{event_id}/tasks/{task_id}/unassign
pub async fn unassign_delegate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<EventTaskPath>,
) -> ApiResult<Json<TaskResponse>> {
    let service = TaskService::new(state.service_context());
    let response = service
        .unassign_delegate(path.event_id()?, path.task_id()?, &auth.email)
        .await?;
    Ok(Json(response))
}

/// POST /tasks/join/{code}
pub async fn join_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CodePath>,
) -> ApiResult<Json<TaskResponse>> {
    let service = TaskService::new(state.service_context());
    let response = service.join_task(&auth.email, path.code()).await?;
    Ok(Json(response))
}

/// POST /tasks/leave
pub async fn leave_task(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<LeaveTaskRequest>,
) -> ApiResult<Json<LeaveResponse>> {
    let service = TaskService::new(state.service_context());
    let response = service.leave_task(&auth.email, &request.task_id).await?;
    Ok(Json(response))
}
