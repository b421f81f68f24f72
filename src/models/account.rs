//! Account model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account database model (read-only for this service)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub token_hash: Option<String>,
    /// Unix timestamp (seconds) after which the token stops working
    pub token_expire: i64,
    pub created_date: DateTime<Utc>,
}

impl Account {
    /// Check whether the account's token is still valid at `now`
    pub fn token_is_live(&self, now: DateTime<Utc>) -> bool {
        self.token_expire >= now.timestamp()
    }

    pub fn identity(&self) -> Identity {
        Identity {
            account_id: self.account_id,
            username: self.username.clone(),
        }
    }
}

/// The caller a token resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub account_id: Uuid,
    pub username: String,
}
