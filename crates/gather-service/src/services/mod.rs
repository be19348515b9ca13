//! Business logic services
//!
//! This module contains the coordinators for events, tasks, delegates and
//! volunteers. Every service borrows the shared [`ServiceContext`] and talks
//! to the store only through the repository traits it carries.

pub mod access;
pub mod codes;
pub mod context;
pub mod delegate;
pub mod error;
pub mod event;
pub mod task;
pub mod volunteer;

// Re-export all services for convenience
pub use access::{AccessService, EventRef};
pub use codes::{generate_unique_code, CodeGenerator, CodeScope};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use delegate::DelegateService;
pub use error::{ServiceError, ServiceResult};
pub use event::EventService;
pub use task::TaskService;
pub use volunteer::VolunteerService;
