//! Grader - coding-problem judge backend
//!
//! Problems carry a reference solution and a list of raw testcase inputs.
//! Expected outputs are never typed in by hand: the solution is executed
//! against every input in a sandboxed container and the results become the
//! problem's active testcase generation. Older generations are kept as
//! deprecated history.
//!
//! # Architecture
//!
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: gate ordering, grading and generation management
//! - **Gateways**: the traits the services depend on
//! - **Adapters**: PostgreSQL ([`db`]), Docker ([`grader`]) and filesystem
//!   ([`storage`]) implementations of those traits

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod gateways;
pub mod grader;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
