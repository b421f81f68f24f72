//! Testcase model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::runtime_statuses;

/// Testcase database model
///
/// Rows are append-only: a regeneration flags the previous rows as
/// `deprecated` instead of deleting them.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Testcase {
    pub testcase_id: Uuid,
    pub problem_id: Uuid,
    /// Position within its generation
    pub ordinal: i32,
    pub input: String,
    pub output: String,
    pub runtime_status: String,
    pub deprecated: bool,
    pub created_date: DateTime<Utc>,
}

impl Testcase {
    /// Typed view of the stored runtime status
    pub fn status(&self) -> Option<RuntimeStatus> {
        RuntimeStatus::from_str(&self.runtime_status)
    }
}

/// A testcase row that has not been inserted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewTestcase {
    pub problem_id: Uuid,
    pub ordinal: i32,
    pub input: String,
    pub output: String,
    pub runtime_status: RuntimeStatus,
}

/// Outcome of running the reference solution against one input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeStatus {
    Ok,
    Error,
    Timeout,
}

impl RuntimeStatus {
    /// Get status as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => runtime_statuses::OK,
            Self::Error => runtime_statuses::ERROR,
            Self::Timeout => runtime_statuses::TIMEOUT,
        }
    }

    /// Parse status from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            runtime_statuses::OK => Some(Self::Ok),
            runtime_statuses::ERROR => Some(Self::Error),
            runtime_statuses::TIMEOUT => Some(Self::Timeout),
            _ => None,
        }
    }
}

impl std::fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
