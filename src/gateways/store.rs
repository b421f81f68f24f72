//! Problem and testcase persistence
//!
//! Reads go straight through [`ProblemStore`]. Every write happens inside a
//! [`ProblemTransaction`]: nothing is visible to other callers until
//! [`ProblemTransaction::commit`] succeeds, and dropping an uncommitted
//! transaction discards it.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{NewProblem, NewTestcase, Problem, Testcase},
};

#[async_trait]
pub trait ProblemStore: Send + Sync {
    async fn get_by_id(&self, problem_id: Uuid) -> AppResult<Option<Problem>>;

    /// Testcases of a problem with the given `deprecated` flag, oldest first
    async fn filter_by_problem(&self, problem_id: Uuid, deprecated: bool)
        -> AppResult<Vec<Testcase>>;

    async fn begin(&self) -> AppResult<Box<dyn ProblemTransaction>>;
}

#[async_trait]
pub trait ProblemTransaction: Send {
    /// Take the exclusive per-problem lock and return the current row.
    ///
    /// The lock is held until the transaction commits or is dropped.
    async fn lock_problem(&mut self, problem_id: Uuid) -> AppResult<Option<Problem>>;

    async fn create(&mut self, problem: NewProblem) -> AppResult<Problem>;

    async fn save(&mut self, problem: &Problem) -> AppResult<Problem>;

    async fn filter_by_problem(
        &mut self,
        problem_id: Uuid,
        deprecated: bool,
    ) -> AppResult<Vec<Testcase>>;

    async fn bulk_create(&mut self, testcases: Vec<NewTestcase>) -> AppResult<Vec<Testcase>>;

    /// Flag every active testcase of the problem; returns how many rows changed
    async fn bulk_mark_deprecated(&mut self, problem_id: Uuid) -> AppResult<u64>;

    async fn commit(&mut self) -> AppResult<()>;
}
