//! HTTP middleware and extractors

pub mod auth;
pub mod logging;

pub use auth::RequestContext;
pub use logging::logging_middleware;
