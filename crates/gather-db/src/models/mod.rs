//! Database models - SQLx-compatible structs for PostgreSQL tables

mod assignment;
mod event;
mod membership;
mod task;

pub use assignment::{AssignmentModel, TaskCountModel};
pub use event::EventModel;
pub use membership::MembershipModel;
pub use task::TaskModel;
