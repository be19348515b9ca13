//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    AssignDelegateRequest, CreateEventRequest, CreateTaskRequest, DelegateLeaveRequest,
    LeaveTaskRequest, ListEventsQuery, RegisterDelegateQuery, RegisterDelegateRequest,
    RemoveDelegateRequest, RemoveVolunteerRequest, UpdateEventRequest, UpdateTaskRequest,
    VolunteerLeaveRequest,
};

// Re-export commonly used response types
pub use responses::{
    AssignmentResponse, DelegateOrgResponse, DelegateOrganizationProfile, DelegateProfileResponse,
    EventMembersResponse, EventResponse, EventSummary, HealthChecks, HealthResponse,
    JoinEventResponse, LeaveResponse, MembershipResponse, ReadinessResponse, TaskResponse,
    VolunteerMembershipProfile, VolunteerProfileResponse, VolunteerTaskProfile,
};

// Re-export mappers and helper structs
pub use mappers::{event_summary_for, AssignmentWithTask, TaskWithCount};
