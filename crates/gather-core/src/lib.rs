//! # gather-core
//!
//! Domain layer for volunteer event coordination: events, memberships,
//! tasks, assignments and the join codes that connect them.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

pub use entities::{Assignment, DelegateSnapshot, Event, EventCodeKind, Membership, Task};
pub use error::DomainError;
pub use traits::{
    AssignmentRepository, EventRepository, MembershipRepository, RepoResult, StoreHealth,
    TaskRepository,
};
pub use value_objects::{
    EventRole, GeoPoint, JoinCode, Location, MemberRole, Snowflake, SnowflakeGenerator,
    SnowflakeParseError, TimeWindow,
};
