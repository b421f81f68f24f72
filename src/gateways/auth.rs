//! Token resolution

use async_trait::async_trait;

use crate::{error::AppResult, models::Identity};

/// Resolves a bearer token to the account it belongs to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Fails with `AppError::InvalidToken` when the token is empty, unknown or expired.
    async fn get_account_by_token(&self, token: &str) -> AppResult<Identity>;
}
