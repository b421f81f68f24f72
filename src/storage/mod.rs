//! Blob storage adapters

pub mod fs;

pub use fs::FsBlobStore;
