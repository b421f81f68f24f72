//! Code execution
//!
//! A grader runs a reference solution against a list of raw inputs and
//! reports what the solution printed for each one. It does not judge
//! correctness; the outputs it produces become the expected outputs of the
//! new testcase generation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::AppResult, models::RuntimeStatus};

/// One grading run
#[derive(Debug, Clone, PartialEq)]
pub struct GradingRequest {
    pub language: String,
    pub source_code: String,
    pub inputs: Vec<String>,
    pub time_limit_ms: i32,
    pub memory_limit_mb: u64,
}

/// Result for a single input, in request order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedCase {
    pub input: String,
    pub output: String,
    pub runtime_status: RuntimeStatus,
}

/// Result of a whole grading run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingReport {
    /// False when the solution could not be executed cleanly
    pub runnable: bool,
    pub results: Vec<GradedCase>,
}

impl GradingReport {
    /// Report for a solution that failed before any input ran
    pub fn not_runnable(inputs: &[String], diagnostic: &str) -> Self {
        Self {
            runnable: false,
            results: inputs
                .iter()
                .map(|input| GradedCase {
                    input: input.clone(),
                    output: diagnostic.to_string(),
                    runtime_status: RuntimeStatus::Error,
                })
                .collect(),
        }
    }

    /// Build a report from per-input results; runnable iff every case is `ok`
    pub fn from_results(results: Vec<GradedCase>) -> Self {
        let runnable = results
            .iter()
            .all(|case| case.runtime_status == RuntimeStatus::Ok);
        Self { runnable, results }
    }
}

/// Executes source code against inputs.
///
/// Timeouts and crashes are reported per case through `runtime_status`;
/// an `Err` means the grader itself could not be reached or failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeGrader: Send + Sync {
    async fn run(&self, request: GradingRequest) -> AppResult<GradingReport>;
}
