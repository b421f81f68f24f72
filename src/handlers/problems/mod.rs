//! Problem handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Problem routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_problem))
        .route("/{id}", get(handler::get_problem).put(handler::update_problem))
        .route(
            "/{id}/pdf",
            get(handler::download_pdf).put(handler::upload_pdf),
        )
}
