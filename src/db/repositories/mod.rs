//! Database repositories
//!
//! Each repository implements one gateway trait on top of a `PgPool`.

pub mod account_repo;
pub mod permission_repo;
pub mod problem_repo;

pub use account_repo::AccountRepository;
pub use permission_repo::PermissionRepository;
pub use problem_repo::{PgProblemTransaction, ProblemRepository};
