//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod account;
pub mod problem;
pub mod testcase;

pub use account::*;
pub use problem::*;
pub use testcase::*;
