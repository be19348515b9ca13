//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in gather-core.

mod assignment;
mod error;
mod event;
mod health;
mod membership;
mod task;

pub use assignment::PgAssignmentRepository;
pub use event::PgEventRepository;
pub use health::PgStoreHealth;
pub use membership::PgMembershipRepository;
pub use task::PgTaskRepository;
