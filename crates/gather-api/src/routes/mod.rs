//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{delegates, events, health, tasks, volunteers};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(event_routes())
        .merge(task_routes())
        .merge(delegate_routes())
        .merge(volunteer_routes())
}

/// Event routes
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(events::create_event).get(events::list_events))
        .route("/events/:event_id", get(events::get_event).patch(events::update_event))
        .route("/events/:event_id/members", get(events::list_members))
        .route("/event/join/:code", post(events::join_event))
}

/// Task routes
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/events/:event_id/tasks", post(tasks::create_task).get(tasks::list_tasks))
        .route("/events/:event_id/tasks/:task_id", patch(tasks::update_task))
        .route("/events/:event_id/tasks/:task_id/volunteers", get(tasks::task_volunteers))
        .route("/events/:event_id/tasks/:task_id/assign", patch(tasks::assign_delegate))
        .route("/events/:event_id/tasks/:task_id/unassign", patch(tasks::unassign_delegate))
        .route("/tasks/join/:code", post(tasks::join_task))
        .route("/tasks/leave", post(tasks::leave_task))
}

/// Delegate routes
fn delegate_routes() -> Router<AppState> {
    Router::new()
        .route("/delegate/register", post(delegates::register))
        .route("/delegate/attach/:event_id/:delegate_org_code", post(delegates::attach))
        .route("/delegate/join/:code", post(delegates::join_organization))
        .route("/delegate/volunteer/remove", post(delegates::remove_volunteer))
        .route("/delegate/leave", post(delegates::leave))
        .route("/delegate/remove/:event_id", post(delegates::remove_delegate))
        .route("/delegate/profile", get(delegates::profile))
}

/// Volunteer routes
fn volunteer_routes() -> Router<AppState> {
    Router::new()
        .route("/volunteer/leave", post(volunteers::leave))
        .route("/volunteer/profile", get(volunteers::profile))
}
