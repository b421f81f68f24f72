//! Testcase generations
//!
//! A problem owns exactly one active generation of testcases at rest. A new
//! generation is built from grader output; the previous one is flagged
//! `deprecated` in bulk and kept as history. Both steps run inside the
//! caller's problem-scoped transaction, so a failure between them rolls
//! back to the previous generation.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    gateways::{CodeGrader, GradedCase, GradingReport, GradingRequest, ProblemTransaction},
    models::{NewTestcase, Problem, Testcase},
};

#[derive(Clone)]
pub struct TestcaseVersioner {
    grader: Arc<dyn CodeGrader>,
    memory_limit_mb: u64,
}

impl TestcaseVersioner {
    pub fn new(grader: Arc<dyn CodeGrader>, memory_limit_mb: u64) -> Self {
        Self {
            grader,
            memory_limit_mb,
        }
    }

    /// Run `source_code` against every input.
    ///
    /// Per-case timeouts and crashes come back inside the report; only a
    /// grader failure is an error.
    pub async fn grade(
        &self,
        language: &str,
        source_code: &str,
        inputs: Vec<String>,
        time_limit_ms: i32,
    ) -> AppResult<GradingReport> {
        let expected = inputs.len();
        let report = self
            .grader
            .run(GradingRequest {
                language: language.to_string(),
                source_code: source_code.to_string(),
                inputs,
                time_limit_ms,
                memory_limit_mb: self.memory_limit_mb,
            })
            .await?;

        if report.results.len() != expected {
            return Err(AppError::Internal(anyhow::anyhow!(
                "grader returned {} results for {} inputs",
                report.results.len(),
                expected
            )));
        }

        Ok(report)
    }

    /// Re-run the problem's current solution against the inputs of `active`.
    ///
    /// Outputs are discarded; a run that is not executable (compile error,
    /// crash or timeout on any case) fails with `CodeExecutionError`.
    pub async fn validate_solution(&self, problem: &Problem, active: &[Testcase]) -> AppResult<()> {
        let inputs = active.iter().map(|tc| tc.input.clone()).collect();
        let report = self
            .grade(
                &problem.language,
                &problem.solution,
                inputs,
                problem.time_limit_ms,
            )
            .await?;

        if !report.runnable {
            debug!(problem_id = %problem.problem_id, "Solution failed validation run");
            return Err(AppError::CodeExecutionError);
        }

        Ok(())
    }

    /// Flag every active testcase of the problem. A no-op when none are active.
    pub async fn deprecate_active(
        &self,
        tx: &mut dyn ProblemTransaction,
        problem_id: Uuid,
    ) -> AppResult<u64> {
        tx.bulk_mark_deprecated(problem_id).await
    }

    /// Persist grader results as a fresh active generation, in input order
    pub async fn create_generation(
        &self,
        tx: &mut dyn ProblemTransaction,
        problem_id: Uuid,
        results: Vec<GradedCase>,
    ) -> AppResult<Vec<Testcase>> {
        let rows = results
            .into_iter()
            .enumerate()
            .map(|(ordinal, case)| {
                Ok(NewTestcase {
                    problem_id,
                    ordinal: i32::try_from(ordinal)
                        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?,
                    input: case.input,
                    output: case.output,
                    runtime_status: case.runtime_status,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        tx.bulk_create(rows).await
    }

    /// Deprecate the active generation, then create the new one
    pub async fn replace_generation(
        &self,
        tx: &mut dyn ProblemTransaction,
        problem_id: Uuid,
        results: Vec<GradedCase>,
    ) -> AppResult<Vec<Testcase>> {
        let deprecated = self.deprecate_active(tx, problem_id).await?;
        let created = self.create_generation(tx, problem_id, results).await?;

        debug!(
            %problem_id,
            deprecated,
            created = created.len(),
            "Testcase generation replaced"
        );

        Ok(created)
    }
}
