//! Problem repository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    gateways::{ProblemStore, ProblemTransaction},
    models::{NewProblem, NewTestcase, Problem, Testcase},
};

/// Repository for problem and testcase database operations
#[derive(Clone)]
pub struct ProblemRepository {
    pool: PgPool,
}

impl ProblemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProblemStore for ProblemRepository {
    async fn get_by_id(&self, problem_id: Uuid) -> AppResult<Option<Problem>> {
        let problem =
            sqlx::query_as::<_, Problem>(r#"SELECT * FROM problems WHERE problem_id = $1"#)
                .bind(problem_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(problem)
    }

    async fn filter_by_problem(
        &self,
        problem_id: Uuid,
        deprecated: bool,
    ) -> AppResult<Vec<Testcase>> {
        let mut conn = self.pool.acquire().await?;
        select_testcases(&mut conn, problem_id, deprecated).await
    }

    async fn begin(&self) -> AppResult<Box<dyn ProblemTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgProblemTransaction { tx: Some(tx) }))
    }
}

/// A PostgreSQL transaction; dropping it without `commit` rolls back
pub struct PgProblemTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgProblemTransaction {
    fn conn(&mut self) -> AppResult<&mut PgConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("transaction already committed")))
    }
}

#[async_trait]
impl ProblemTransaction for PgProblemTransaction {
    async fn lock_problem(&mut self, problem_id: Uuid) -> AppResult<Option<Problem>> {
        let problem = sqlx::query_as::<_, Problem>(
            r#"SELECT * FROM problems WHERE problem_id = $1 FOR UPDATE"#,
        )
        .bind(problem_id)
        .fetch_optional(self.conn()?)
        .await?;

        Ok(problem)
    }

    async fn create(&mut self, problem: NewProblem) -> AppResult<Problem> {
        let problem = sqlx::query_as::<_, Problem>(
            r#"
            INSERT INTO problems (
                title, description, language, solution, time_limit_ms,
                allowed_languages, view_mode, is_private, creator
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&problem.title)
        .bind(&problem.description)
        .bind(&problem.language)
        .bind(&problem.solution)
        .bind(problem.time_limit_ms)
        .bind(&problem.allowed_languages)
        .bind(&problem.view_mode)
        .bind(problem.is_private)
        .bind(problem.creator)
        .fetch_one(self.conn()?)
        .await?;

        Ok(problem)
    }

    async fn save(&mut self, problem: &Problem) -> AppResult<Problem> {
        // creator and created_date are never written
        let saved = sqlx::query_as::<_, Problem>(
            r#"
            UPDATE problems
            SET
                title = $2,
                description = $3,
                language = $4,
                solution = $5,
                time_limit_ms = $6,
                allowed_languages = $7,
                view_mode = $8,
                is_private = $9,
                pdf_url = $10,
                updated_date = $11
            WHERE problem_id = $1
            RETURNING *
            "#,
        )
        .bind(problem.problem_id)
        .bind(&problem.title)
        .bind(&problem.description)
        .bind(&problem.language)
        .bind(&problem.solution)
        .bind(problem.time_limit_ms)
        .bind(&problem.allowed_languages)
        .bind(&problem.view_mode)
        .bind(problem.is_private)
        .bind(&problem.pdf_url)
        .bind(problem.updated_date)
        .fetch_optional(self.conn()?)
        .await?
        .ok_or_else(AppError::problem_not_found)?;

        Ok(saved)
    }

    async fn filter_by_problem(
        &mut self,
        problem_id: Uuid,
        deprecated: bool,
    ) -> AppResult<Vec<Testcase>> {
        select_testcases(self.conn()?, problem_id, deprecated).await
    }

    async fn bulk_create(&mut self, testcases: Vec<NewTestcase>) -> AppResult<Vec<Testcase>> {
        if testcases.is_empty() {
            return Ok(Vec::new());
        }

        let mut problem_ids = Vec::with_capacity(testcases.len());
        let mut ordinals = Vec::with_capacity(testcases.len());
        let mut inputs = Vec::with_capacity(testcases.len());
        let mut outputs = Vec::with_capacity(testcases.len());
        let mut statuses = Vec::with_capacity(testcases.len());
        for tc in testcases {
            problem_ids.push(tc.problem_id);
            ordinals.push(tc.ordinal);
            inputs.push(tc.input);
            outputs.push(tc.output);
            statuses.push(tc.runtime_status.as_str().to_string());
        }

        let mut created = sqlx::query_as::<_, Testcase>(
            r#"
            INSERT INTO testcases (problem_id, ordinal, input, output, runtime_status, deprecated)
            SELECT t.problem_id, t.ordinal, t.input, t.output, t.runtime_status, FALSE
            FROM UNNEST($1::uuid[], $2::int4[], $3::text[], $4::text[], $5::text[])
                AS t(problem_id, ordinal, input, output, runtime_status)
            RETURNING *
            "#,
        )
        .bind(&problem_ids)
        .bind(&ordinals)
        .bind(&inputs)
        .bind(&outputs)
        .bind(&statuses)
        .fetch_all(self.conn()?)
        .await?;

        created.sort_by_key(|tc| tc.ordinal);
        Ok(created)
    }

    async fn bulk_mark_deprecated(&mut self, problem_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            r#"UPDATE testcases SET deprecated = TRUE WHERE problem_id = $1 AND deprecated = FALSE"#,
        )
        .bind(problem_id)
        .execute(self.conn()?)
        .await?;

        Ok(result.rows_affected())
    }

    async fn commit(&mut self) -> AppResult<()> {
        match self.tx.take() {
            Some(tx) => Ok(tx.commit().await?),
            None => Err(AppError::Internal(anyhow::anyhow!(
                "transaction already committed"
            ))),
        }
    }
}

async fn select_testcases(
    conn: &mut PgConnection,
    problem_id: Uuid,
    deprecated: bool,
) -> AppResult<Vec<Testcase>> {
    let testcases = sqlx::query_as::<_, Testcase>(
        r#"
        SELECT * FROM testcases
        WHERE problem_id = $1 AND deprecated = $2
        ORDER BY created_date, ordinal
        "#,
    )
    .bind(problem_id)
    .bind(deprecated)
    .fetch_all(conn)
    .await?;

    Ok(testcases)
}
