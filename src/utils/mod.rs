//! Utility functions

pub mod crypto;
pub mod validation;

pub use crypto::{random_token, sha256_hex};
pub use validation::{slugify, validate_language, validate_language_list, validate_view_mode};
