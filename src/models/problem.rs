//! Problem model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Testcase;

/// Problem database model
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Problem {
    pub problem_id: Uuid,
    pub title: String,
    pub description: String,
    pub language: String,
    pub solution: String,
    pub time_limit_ms: i32,
    pub allowed_languages: Vec<String>,
    pub view_mode: String,
    pub is_private: bool,
    /// Stored blob name, not a URL
    pub pdf_url: Option<String>,
    pub creator: Uuid,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl Problem {
    /// Apply a partial update. `creator` and `pdf_url` are never touched here.
    pub fn apply(&mut self, patch: &ProblemPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(language) = &patch.language {
            self.language = language.clone();
        }
        if let Some(solution) = &patch.solution {
            self.solution = solution.clone();
        }
        if let Some(time_limit_ms) = patch.time_limit_ms {
            self.time_limit_ms = time_limit_ms;
        }
        if let Some(allowed_languages) = &patch.allowed_languages {
            self.allowed_languages = allowed_languages.clone();
        }
        if let Some(view_mode) = &patch.view_mode {
            self.view_mode = view_mode.clone();
        }
        if let Some(is_private) = patch.is_private {
            self.is_private = is_private;
        }
        self.updated_date = now;
    }
}

/// Fields required to insert a new problem
#[derive(Debug, Clone)]
pub struct NewProblem {
    pub title: String,
    pub description: String,
    pub language: String,
    pub solution: String,
    pub time_limit_ms: i32,
    pub allowed_languages: Vec<String>,
    pub view_mode: String,
    pub is_private: bool,
    pub creator: Uuid,
}

/// Input to `ProblemLifecycleService::create`
#[derive(Debug, Clone)]
pub struct ProblemDraft {
    pub title: String,
    pub description: String,
    pub language: String,
    pub solution: String,
    pub time_limit_ms: i32,
    pub allowed_languages: Vec<String>,
    pub view_mode: String,
    pub is_private: bool,
    /// Raw testcase inputs; outputs come from grading the solution
    pub testcases: Vec<String>,
}

impl ProblemDraft {
    /// Attach the resolved creator
    pub fn into_new_problem(self, creator: Uuid) -> (NewProblem, Vec<String>) {
        (
            NewProblem {
                title: self.title,
                description: self.description,
                language: self.language,
                solution: self.solution,
                time_limit_ms: self.time_limit_ms,
                allowed_languages: self.allowed_languages,
                view_mode: self.view_mode,
                is_private: self.is_private,
                creator,
            },
            self.testcases,
        )
    }
}

/// Partial update. `None` means the key was absent from the request.
#[derive(Debug, Clone, Default)]
pub struct ProblemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub solution: Option<String>,
    pub time_limit_ms: Option<i32>,
    pub allowed_languages: Option<Vec<String>>,
    pub view_mode: Option<String>,
    pub is_private: Option<bool>,
    pub testcases: Option<Vec<String>>,
}

/// A problem together with its active testcase generation
#[derive(Debug, Clone, Serialize)]
pub struct ProblemWithTestcases {
    #[serde(flatten)]
    pub problem: Problem,
    pub testcases: Vec<Testcase>,
}
