//! Problem permission repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    gateways::PermissionGateway,
    models::{Identity, Problem},
};

/// Ownership and group-grant checks
#[derive(Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether any group the account belongs to may manage the problem
    pub async fn has_group_grant(&self, account_id: &Uuid, problem_id: &Uuid) -> AppResult<bool> {
        let granted: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM problem_group_permissions pgp
                JOIN group_members gm ON gm.group_id = pgp.group_id
                WHERE pgp.problem_id = $1
                  AND gm.account_id = $2
                  AND pgp.permission_manage_problems
            )
            "#,
        )
        .bind(problem_id)
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(granted)
    }
}

#[async_trait]
impl PermissionGateway for PermissionRepository {
    async fn can_manage(&self, identity: &Identity, problem: &Problem) -> AppResult<bool> {
        if problem.creator == identity.account_id {
            return Ok(true);
        }

        self.has_group_grant(&identity.account_id, &problem.problem_id)
            .await
    }
}
