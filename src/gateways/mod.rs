//! Capability boundaries consumed by the services
//!
//! The services only ever see these traits. Concrete adapters live in
//! [`crate::db`], [`crate::grader`] and [`crate::storage`] and are wired
//! together in `main`.

pub mod auth;
pub mod blob;
pub mod grader;
pub mod permission;
pub mod store;

pub use auth::AuthGateway;
pub use blob::BlobStore;
pub use grader::{CodeGrader, GradedCase, GradingReport, GradingRequest};
pub use permission::PermissionGateway;
pub use store::{ProblemStore, ProblemTransaction};
