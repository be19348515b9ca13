//! Domain entities - core business objects

mod assignment;
mod event;
mod membership;
mod task;

pub use assignment::Assignment;
pub use event::{Event, EventCodeKind};
pub use membership::Membership;
pub use task::{DelegateSnapshot, Task};
