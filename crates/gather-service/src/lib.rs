//! # gather-service
//!
//! Application layer: membership coordination, task assignment, join code
//! generation and the request/response DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AccessService, CodeGenerator, CodeScope, DelegateService, EventRef, EventService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, TaskService, VolunteerService,
};
