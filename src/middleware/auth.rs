//! Caller context extraction
//!
//! Handlers never resolve tokens themselves. They take a [`RequestContext`]
//! and hand the raw token to the services, which decide when in their gate
//! order it gets checked.

use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, HOST},
        request::Parts,
    },
};
use tracing::debug;

use crate::error::AppError;

/// The parts of a request the services care about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Bearer token, empty when absent or malformed
    pub token: String,
    /// `Host` header, used to compose absolute media URLs
    pub host: Option<String>,
}

impl RequestContext {
    fn from_parts(parts: &Parts) -> Self {
        let token = match parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        {
            Some(value) => match value.strip_prefix("Bearer ") {
                Some(token) => token.trim().to_string(),
                None => {
                    debug!(path = %parts.uri.path(), "Authorization header is not a bearer token");
                    String::new()
                }
            },
            None => String::new(),
        };

        let host = parts
            .headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Self { token, host }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
