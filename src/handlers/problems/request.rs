//! Problem request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{
        view_modes, DEFAULT_TIME_LIMIT_MS, MAX_PROBLEM_DESCRIPTION_LENGTH,
        MAX_PROBLEM_TITLE_LENGTH, MAX_SOURCE_CODE_SIZE, MAX_TESTCASES_PER_PROBLEM,
        MAX_TIME_LIMIT_MS, MIN_TIME_LIMIT_MS,
    },
    models::{ProblemDraft, ProblemPatch},
    utils::{validate_language, validate_language_list, validate_view_mode},
};

/// Create problem request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProblemRequest {
    #[validate(length(min = 1, max = MAX_PROBLEM_TITLE_LENGTH))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = MAX_PROBLEM_DESCRIPTION_LENGTH))]
    pub description: String,

    /// Language of the reference solution
    #[validate(custom(function = "validate_language"))]
    pub language: String,

    #[validate(length(min = 1, max = MAX_SOURCE_CODE_SIZE))]
    pub solution: String,

    #[serde(default = "default_time_limit")]
    #[validate(range(min = MIN_TIME_LIMIT_MS, max = MAX_TIME_LIMIT_MS, message = "Time limit must be 100-30000 ms"))]
    pub time_limit_ms: i64,

    /// Languages submissions may use
    #[serde(default)]
    #[validate(custom(function = "validate_language_list"))]
    pub allowed_languages: Vec<String>,

    #[serde(default = "default_view_mode")]
    #[validate(custom(function = "validate_view_mode"))]
    pub view_mode: String,

    #[serde(default = "default_true")]
    pub is_private: bool,

    /// Raw inputs; expected outputs are produced by running the solution
    #[serde(default)]
    #[validate(length(max = MAX_TESTCASES_PER_PROBLEM))]
    pub testcases: Vec<String>,
}

impl From<CreateProblemRequest> for ProblemDraft {
    fn from(req: CreateProblemRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            language: req.language,
            solution: req.solution,
            // Range-checked by validation
            time_limit_ms: req.time_limit_ms as i32,
            allowed_languages: req.allowed_languages,
            view_mode: req.view_mode,
            is_private: req.is_private,
            testcases: req.testcases,
        }
    }
}

/// Update problem request. Absent keys leave the stored value alone.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProblemRequest {
    #[validate(length(min = 1, max = MAX_PROBLEM_TITLE_LENGTH))]
    pub title: Option<String>,

    #[validate(length(max = MAX_PROBLEM_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_language"))]
    pub language: Option<String>,

    #[validate(length(min = 1, max = MAX_SOURCE_CODE_SIZE))]
    pub solution: Option<String>,

    #[validate(range(min = MIN_TIME_LIMIT_MS, max = MAX_TIME_LIMIT_MS, message = "Time limit must be 100-30000 ms"))]
    pub time_limit_ms: Option<i64>,

    #[validate(custom(function = "validate_language_list"))]
    pub allowed_languages: Option<Vec<String>>,

    #[validate(custom(function = "validate_view_mode"))]
    pub view_mode: Option<String>,

    pub is_private: Option<bool>,

    /// Present: regrade and replace the active generation
    #[validate(length(max = MAX_TESTCASES_PER_PROBLEM))]
    pub testcases: Option<Vec<String>>,
}

impl From<UpdateProblemRequest> for ProblemPatch {
    fn from(req: UpdateProblemRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            language: req.language,
            solution: req.solution,
            time_limit_ms: req.time_limit_ms.map(|ms| ms as i32),
            allowed_languages: req.allowed_languages,
            view_mode: req.view_mode,
            is_private: req.is_private,
            testcases: req.testcases,
        }
    }
}

fn default_time_limit() -> i64 {
    i64::from(DEFAULT_TIME_LIMIT_MS)
}

fn default_view_mode() -> String {
    view_modes::PRIVATE.to_string()
}

fn default_true() -> bool {
    true
}
