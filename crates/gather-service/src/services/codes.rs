//! Join code generation
//!
//! Codes are drawn uniformly from `[A-Z0-9]` and checked against the
//! collection they will live in before being handed out. The unique indexes
//! re-verify at insert time, so a code that loses a race surfaces as a
//! `CodeConflict` from the repository rather than a silent duplicate.

use std::future::Future;

use gather_core::{DomainError, JoinCode, RepoResult};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Collection a new code must be unique in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeScope {
    /// Both code fields of every event
    EventCode,
    /// Task join codes
    TaskCode,
    /// Delegate-organization codes on memberships
    DelegateOrgCode,
}

/// Draw codes until `exists` reports a free one, giving up after `max_attempts`.
///
/// Length is always [`JoinCode::LENGTH`]; redemption rejects any other length.
pub async fn generate_unique_code<D, E, Fut>(
    max_attempts: u32,
    mut draw: D,
    mut exists: E,
) -> RepoResult<JoinCode>
where
    D: FnMut() -> JoinCode,
    E: FnMut(JoinCode) -> Fut,
    Fut: Future<Output = RepoResult<bool>>,
{
    for attempt in 1..=max_attempts {
        let code = draw();
        if !exists(code.clone()).await? {
            return Ok(code);
        }
        debug!(attempt, code = %code, "Join code collision");
    }

    warn!(attempts = max_attempts, "Join code space exhausted");
    Err(DomainError::CodeSpaceExhausted {
        attempts: max_attempts,
    })
}

/// Code generator bound to the context's repositories
pub struct CodeGenerator<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// A code not yet used in `scope`
    #[instrument(skip(self))]
    pub async fn generate(&self, scope: CodeScope) -> ServiceResult<JoinCode> {
        self.generate_excluding(scope, &[]).await
    }

    /// A code not yet used in `scope` and different from every code in `reserved`
    #[instrument(skip(self, reserved))]
    pub async fn generate_excluding(
        &self,
        scope: CodeScope,
        reserved: &[JoinCode],
    ) -> ServiceResult<JoinCode> {
        let code = generate_unique_code(self.ctx.code_attempts(), JoinCode::generate, move |code| async move {
            if reserved.contains(&code) {
                return Ok(true);
            }
            self.exists(scope, &code).await
        })
        .await?;

        Ok(code)
    }

    async fn exists(&self, scope: CodeScope, code: &JoinCode) -> RepoResult<bool> {
        match scope {
            CodeScope::EventCode => self.ctx.event_repo().code_exists(code).await,
            CodeScope::TaskCode => self.ctx.task_repo().code_exists(code).await,
            CodeScope::DelegateOrgCode => self.ctx.membership_repo().code_exists(code).await,
        }
    }
}
