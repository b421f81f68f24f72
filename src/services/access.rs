//! Existence, token and permission gates shared by the mutating services

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    gateways::{AuthGateway, PermissionGateway, ProblemStore},
    models::{Identity, Problem},
};

/// Runs the three management gates in their fixed order:
/// problem exists, then token is valid, then the caller may manage it.
#[derive(Clone)]
pub struct ProblemAccess {
    auth: Arc<dyn AuthGateway>,
    permissions: Arc<dyn PermissionGateway>,
    store: Arc<dyn ProblemStore>,
}

impl ProblemAccess {
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        permissions: Arc<dyn PermissionGateway>,
        store: Arc<dyn ProblemStore>,
    ) -> Self {
        Self {
            auth,
            permissions,
            store,
        }
    }

    pub async fn identify(&self, token: &str) -> AppResult<Identity> {
        self.auth.get_account_by_token(token).await
    }

    /// Return the problem and the caller once every gate has passed.
    ///
    /// The existence check comes first so an unknown id with a bad token
    /// reports `ItemNotFound`.
    pub async fn require_manage(
        &self,
        problem_id: Uuid,
        token: &str,
    ) -> AppResult<(Problem, Identity)> {
        let problem = self
            .store
            .get_by_id(problem_id)
            .await?
            .ok_or_else(AppError::problem_not_found)?;

        let identity = self.identify(token).await?;

        if !self.permissions.can_manage(&identity, &problem).await? {
            debug!(
                %problem_id,
                account_id = %identity.account_id,
                "Manage permission denied"
            );
            return Err(AppError::PermissionDenied);
        }

        Ok((problem, identity))
    }
}
