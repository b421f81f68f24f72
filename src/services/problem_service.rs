//! Problem lifecycle
//!
//! Creation and update of problems together with their testcase
//! generations. The gates run in a fixed order and each one short-circuits
//! the rest:
//!
//! `ItemNotFound` > `InvalidToken` > `PermissionDenied` > `CodeExecutionError`
//!
//! Nothing is written until every gate and grading check has passed, and all
//! writes for one call share a single transaction.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    gateways::{AuthGateway, PermissionGateway, ProblemStore},
    models::{ProblemDraft, ProblemPatch, ProblemWithTestcases},
};

use super::{access::ProblemAccess, testcase_versioner::TestcaseVersioner};

pub struct ProblemLifecycleService {
    access: ProblemAccess,
    store: Arc<dyn ProblemStore>,
    versioner: TestcaseVersioner,
}

impl ProblemLifecycleService {
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        permissions: Arc<dyn PermissionGateway>,
        store: Arc<dyn ProblemStore>,
        versioner: TestcaseVersioner,
    ) -> Self {
        Self {
            access: ProblemAccess::new(auth, permissions, store.clone()),
            store,
            versioner,
        }
    }

    /// The creation gate alone: the token must resolve
    pub async fn authenticate(&self, token: &str) -> AppResult<()> {
        self.access.identify(token).await.map(|_| ())
    }

    /// The update gates alone, in their usual order
    pub async fn authorize(&self, problem_id: Uuid, token: &str) -> AppResult<()> {
        self.access.require_manage(problem_id, token).await.map(|_| ())
    }

    /// Create a problem and its first testcase generation.
    ///
    /// The caller becomes the creator. Cases the solution fails on are still
    /// stored with their runtime status; only a grader failure aborts.
    pub async fn create(&self, draft: ProblemDraft, token: &str) -> AppResult<ProblemWithTestcases> {
        let identity = self.access.identify(token).await?;
        let (new_problem, inputs) = draft.into_new_problem(identity.account_id);

        let report = self
            .versioner
            .grade(
                &new_problem.language,
                &new_problem.solution,
                inputs,
                new_problem.time_limit_ms,
            )
            .await?;

        let mut tx = self.store.begin().await?;
        let problem = tx.create(new_problem).await?;
        let testcases = self
            .versioner
            .create_generation(tx.as_mut(), problem.problem_id, report.results)
            .await?;
        tx.commit().await?;

        info!(
            problem_id = %problem.problem_id,
            creator = %identity.account_id,
            testcases = testcases.len(),
            runnable = report.runnable,
            "Problem created"
        );

        Ok(ProblemWithTestcases { problem, testcases })
    }

    /// Apply a partial update.
    ///
    /// With `testcases` present the solution is graded against the new
    /// inputs and the result replaces the active generation. With only
    /// `solution` present the new code is checked against the existing
    /// inputs and nothing about the testcases changes.
    pub async fn update(
        &self,
        problem_id: Uuid,
        patch: ProblemPatch,
        token: &str,
    ) -> AppResult<ProblemWithTestcases> {
        self.access.require_manage(problem_id, token).await?;

        // Held until commit or drop; concurrent updates of this problem queue here
        let mut tx = self.store.begin().await?;
        let mut problem = tx
            .lock_problem(problem_id)
            .await?
            .ok_or_else(AppError::problem_not_found)?;

        problem.apply(&patch, Utc::now());

        let testcases = if let Some(inputs) = patch.testcases {
            let report = self
                .versioner
                .grade(
                    &problem.language,
                    &problem.solution,
                    inputs,
                    problem.time_limit_ms,
                )
                .await?;
            self.versioner
                .replace_generation(tx.as_mut(), problem_id, report.results)
                .await?
        } else if patch.solution.is_some() {
            let active = tx.filter_by_problem(problem_id, false).await?;
            self.versioner.validate_solution(&problem, &active).await?;
            active
        } else {
            tx.filter_by_problem(problem_id, false).await?
        };

        let problem = tx.save(&problem).await?;
        tx.commit().await?;

        info!(%problem_id, testcases = testcases.len(), "Problem updated");

        Ok(ProblemWithTestcases { problem, testcases })
    }

    /// The problem with its active generation. Takes no lock.
    pub async fn get(&self, problem_id: Uuid) -> AppResult<ProblemWithTestcases> {
        let problem = self
            .store
            .get_by_id(problem_id)
            .await?
            .ok_or_else(AppError::problem_not_found)?;
        let testcases = self.store.filter_by_problem(problem_id, false).await?;

        Ok(ProblemWithTestcases { problem, testcases })
    }
}
