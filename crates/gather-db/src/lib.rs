//! # gather-db
//!
//! Storage layer implementing the repository traits of `gather-core`.
//!
//! ## Overview
//!
//! Two interchangeable backends sit behind the same traits:
//!
//! - PostgreSQL via SQLx, with embedded migrations
//! - [`MemoryStore`], an in-process store enforcing the same unique constraints
//!
//! [`Repositories::connect`] picks one from `DATABASE_URL`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gather_common::AppConfig;
//! use gather_db::Repositories;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let repos = Repositories::connect(&config.database).await?;
//!     let events = repos.events.find_by_creator("org@example.com").await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod store;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_timeouts, run_migrations, PgPool, PoolTimeouts};
pub use repositories::{
    PgAssignmentRepository, PgEventRepository, PgMembershipRepository, PgStoreHealth,
    PgTaskRepository,
};
pub use store::{Repositories, StoreError};
