//! Service context - dependency container for services
//!
//! Holds the repositories, token service, ID generator and join-code settings
//! needed by services. The store is injected here once; services never reach
//! for a global handle.

use std::sync::Arc;

use gather_common::auth::JwtService;
use gather_common::JoinCodeConfig;
use gather_core::traits::{
    AssignmentRepository, EventRepository, MembershipRepository, StoreHealth, TaskRepository,
};
use gather_core::{Snowflake, SnowflakeGenerator};
use gather_db::Repositories;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Event, membership, task and assignment repositories
/// - Store health check
/// - JWT service for authentication
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    event_repo: Arc<dyn EventRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    task_repo: Arc<dyn TaskRepository>,
    assignment_repo: Arc<dyn AssignmentRepository>,
    store_health: Arc<dyn StoreHealth>,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    join_codes: JoinCodeConfig,
}

impl ServiceContext {
    /// Create a new service context over one set of repositories
    pub fn new(
        repositories: Repositories,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        join_codes: JoinCodeConfig,
    ) -> Self {
        Self {
            event_repo: repositories.events,
            membership_repo: repositories.memberships,
            task_repo: repositories.tasks,
            assignment_repo: repositories.assignments,
            store_health: repositories.health,
            jwt_service,
            snowflake_generator,
            join_codes,
        }
    }

    // === Repositories ===

    /// Get the event repository
    pub fn event_repo(&self) -> &dyn EventRepository {
        self.event_repo.as_ref()
    }

    /// Get the membership repository
    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    /// Get the task repository
    pub fn task_repo(&self) -> &dyn TaskRepository {
        self.task_repo.as_ref()
    }

    /// Get the assignment repository
    pub fn assignment_repo(&self) -> &dyn AssignmentRepository {
        self.assignment_repo.as_ref()
    }

    pub fn store_health(&self) -> &dyn StoreHealth {
        self.store_health.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    /// Collision retries allowed when minting a join code
    pub fn code_attempts(&self) -> u32 {
        self.join_codes.max_attempts
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("join_codes", &self.join_codes)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    repositories: Option<Repositories>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    join_codes: JoinCodeConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            repositories: None,
            jwt_service: None,
            snowflake_generator: None,
            join_codes: JoinCodeConfig::default(),
        }
    }

    pub fn repositories(mut self, repositories: Repositories) -> Self {
        self.repositories = Some(repositories);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn join_codes(mut self, join_codes: JoinCodeConfig) -> Self {
        self.join_codes = join_codes;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.repositories.ok_or_else(|| super::error::ServiceError::validation("repositories are required"))?,
            self.jwt_service.ok_or_else(|| super::error::ServiceError::validation("jwt_service is required"))?,
            self.snowflake_generator.ok_or_else(|| super::error::ServiceError::validation("snowflake_generator is required"))?,
            self.join_codes,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
