//! Code execution backed by Docker

pub mod docker;
pub mod languages;

pub use docker::DockerGrader;
pub use languages::Toolchain;
