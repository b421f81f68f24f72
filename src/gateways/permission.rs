//! Management rights over problems

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Identity, Problem},
};

/// Decides whether an identity may edit a problem.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionGateway: Send + Sync {
    async fn can_manage(&self, identity: &Identity, problem: &Problem) -> AppResult<bool>;
}
