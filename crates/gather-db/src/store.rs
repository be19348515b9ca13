//! Backend selection - one set of repository handles per process

use std::sync::Arc;

use tracing::info;

use gather_common::{DatabaseConfig, StoreBackend};
use gather_core::traits::{
    AssignmentRepository, EventRepository, MembershipRepository, StoreHealth, TaskRepository,
};

use crate::memory::MemoryStore;
use crate::pool::{create_pool, run_migrations, PgPool};
use crate::repositories::{
    PgAssignmentRepository, PgEventRepository, PgMembershipRepository, PgStoreHealth,
    PgTaskRepository,
};

/// Store bootstrap errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("failed to apply migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Repository handles sharing one backing store
#[derive(Clone)]
pub struct Repositories {
    pub events: Arc<dyn EventRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
    pub health: Arc<dyn StoreHealth>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            events: Arc::new(PgEventRepository::new(pool.clone())),
            memberships: Arc::new(PgMembershipRepository::new(pool.clone())),
            tasks: Arc::new(PgTaskRepository::new(pool.clone())),
            assignments: Arc::new(PgAssignmentRepository::new(pool.clone())),
            health: Arc::new(PgStoreHealth::new(pool)),
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            events: store.clone(),
            memberships: store.clone(),
            tasks: store.clone(),
            assignments: store.clone(),
            health: store,
        }
    }

    /// Connect to the configured backend, applying migrations for PostgreSQL
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        match config.backend() {
            StoreBackend::Memory => {
                info!("Using in-memory store");
                Ok(Self::memory(Arc::new(MemoryStore::new())))
            }
            StoreBackend::Postgres => {
                let pool = create_pool(config).await?;
                run_migrations(&pool).await?;
                info!(max_connections = config.max_connections, "Connected to PostgreSQL");
                Ok(Self::postgres(pool))
            }
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
