//! Domain traits - ports implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    AssignmentRepository, EventRepository, MembershipRepository, RepoResult, StoreHealth,
    TaskRepository,
};
