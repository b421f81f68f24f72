//! Account repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;

use crate::{
    error::{AppError, AppResult},
    gateways::AuthGateway,
    models::{Account, Identity},
    utils::sha256_hex,
};

/// Token lookup against the `accounts` table
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find account by the hash of its current bearer token
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"SELECT * FROM accounts WHERE token_hash = $1"#,
        )
        .bind(sha256_hex(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}

#[async_trait]
impl AuthGateway for AccountRepository {
    async fn get_account_by_token(&self, token: &str) -> AppResult<Identity> {
        if token.is_empty() {
            debug!("Auth failed: no token presented");
            return Err(AppError::InvalidToken);
        }

        match self.find_by_token(token).await? {
            Some(account) if account.token_is_live(Utc::now()) => Ok(account.identity()),
            Some(account) => {
                debug!(account_id = %account.account_id, "Auth failed: token expired");
                Err(AppError::InvalidToken)
            }
            None => {
                debug!("Auth failed: unknown token");
                Err(AppError::InvalidToken)
            }
        }
    }
}
