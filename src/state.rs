//! Application state management
//!
//! Shared state handed to every request handler through Axum's `State`
//! extractor. Services are built once in `main` and injected here.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::Config,
    services::{PdfAttachmentHandler, ProblemLifecycleService},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    db: PgPool,
    problems: Arc<ProblemLifecycleService>,
    pdfs: Arc<PdfAttachmentHandler>,
    config: Config,
}

impl AppState {
    pub fn new(
        db: PgPool,
        problems: Arc<ProblemLifecycleService>,
        pdfs: Arc<PdfAttachmentHandler>,
        config: Config,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                problems,
                pdfs,
                config,
            }),
        }
    }

    /// Database pool, used directly only by the health probe
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub fn problems(&self) -> &ProblemLifecycleService {
        &self.inner.problems
    }

    pub fn pdfs(&self) -> &PdfAttachmentHandler {
        &self.inner.pdfs
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
