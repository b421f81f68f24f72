//! Problem response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ProblemWithTestcases, Testcase};

/// Problem response
#[derive(Debug, Serialize)]
pub struct ProblemResponse {
    pub problem_id: Uuid,
    pub title: String,
    pub description: String,
    pub language: String,
    pub solution: String,
    pub time_limit_ms: i32,
    pub allowed_languages: Vec<String>,
    pub view_mode: String,
    pub is_private: bool,
    /// Absolute URL of the attached PDF
    pub pdf_url: Option<String>,
    pub creator: Uuid,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub testcases: Vec<TestcaseResponse>,
}

/// Testcase response
#[derive(Debug, Serialize)]
pub struct TestcaseResponse {
    pub testcase_id: Uuid,
    pub ordinal: i32,
    pub input: String,
    pub output: String,
    pub runtime_status: String,
}

impl From<Testcase> for TestcaseResponse {
    fn from(tc: Testcase) -> Self {
        Self {
            testcase_id: tc.testcase_id,
            ordinal: tc.ordinal,
            input: tc.input,
            output: tc.output,
            runtime_status: tc.runtime_status,
        }
    }
}

impl ProblemResponse {
    /// Build the response, turning the stored PDF name into a URL
    pub fn new(data: ProblemWithTestcases, host: Option<&str>, media_prefix: &str) -> Self {
        let ProblemWithTestcases { problem, testcases } = data;

        Self {
            problem_id: problem.problem_id,
            title: problem.title,
            description: problem.description,
            language: problem.language,
            solution: problem.solution,
            time_limit_ms: problem.time_limit_ms,
            allowed_languages: problem.allowed_languages,
            view_mode: problem.view_mode,
            is_private: problem.is_private,
            pdf_url: problem
                .pdf_url
                .map(|name| media_url(host, media_prefix, &name)),
            creator: problem.creator,
            created_date: problem.created_date,
            updated_date: problem.updated_date,
            testcases: testcases.into_iter().map(Into::into).collect(),
        }
    }
}

/// `http://<host><prefix>/<name>`, or a root-relative path when the host is unknown
pub fn media_url(host: Option<&str>, media_prefix: &str, name: &str) -> String {
    let prefix = media_prefix.trim_end_matches('/');
    match host {
        Some(host) => format!("http://{host}{prefix}/{name}"),
        None => format!("{prefix}/{name}"),
    }
}
