//! State handed to every handler through `State<AppState>`

use std::fmt;
use std::sync::Arc;

use gather_common::{AppConfig, JwtService};
use gather_service::ServiceContext;

struct Shared {
    ctx: ServiceContext,
    config: AppConfig,
}

/// Cheap to clone; all clones point at one context and config
#[derive(Clone)]
pub struct AppState(Arc<Shared>);

impl AppState {
    pub fn new(ctx: ServiceContext, config: AppConfig) -> Self {
        Self(Arc::new(Shared { ctx, config }))
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.0.ctx
    }

    pub fn config(&self) -> &AppConfig {
        &self.0.config
    }

    /// Verifies bearer tokens in the auth extractor
    pub fn jwt_service(&self) -> &JwtService {
        self.0.ctx.jwt_service()
    }
}

// Config carries the signing secret, so only identifying fields are shown
impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config();
        f.debug_struct("AppState")
            .field("app", &config.app.name)
            .field("env", &config.app.env)
            .field("store", &config.database.backend())
            .finish_non_exhaustive()
    }
}
