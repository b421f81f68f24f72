//! HTTP Request Handlers
//!
//! Handlers only translate between HTTP and the services; every decision
//! about gates and ordering lives in [`crate::services`].

pub mod health;
pub mod problems;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/problems", problems::routes())
}
