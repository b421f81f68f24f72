//! Application configuration management
//!
//! Configuration is loaded from environment variables once at startup and
//! handed to the components that need it.

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_COMPILE_TIMEOUT_MS, DEFAULT_CPU_LIMIT, DEFAULT_DATABASE_MAX_CONNECTIONS,
    DEFAULT_GRADER_TIMEOUT_SLACK_MS, DEFAULT_MAX_PDF_SIZE_MB, DEFAULT_MEMORY_LIMIT_MB,
    DEFAULT_PDF_MEDIA_PREFIX, DEFAULT_PDF_STORAGE_PATH, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub grader: GraderConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// PDF storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub pdf_path: PathBuf,
    pub pdf_media_prefix: String,
    pub max_pdf_size_mb: usize,
}

/// Grading container configuration
#[derive(Debug, Clone)]
pub struct GraderConfig {
    pub socket_path: String,
    pub network_name: String,
    pub memory_limit_mb: u64,
    pub cpu_limit: f64,
    pub timeout_slack_ms: u64,
    pub compile_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            grader: GraderConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json_logs: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
        })
    }
}

impl StorageConfig {
    /// Upload size limit in bytes
    pub fn max_pdf_bytes(&self) -> usize {
        self.max_pdf_size_mb * 1024 * 1024
    }

    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            pdf_path: PathBuf::from(
                env::var("PDF_STORAGE_PATH").unwrap_or_else(|_| DEFAULT_PDF_STORAGE_PATH.to_string()),
            ),
            pdf_media_prefix: env::var("PDF_MEDIA_PREFIX")
                .unwrap_or_else(|_| DEFAULT_PDF_MEDIA_PREFIX.to_string()),
            max_pdf_size_mb: parse_var("MAX_PDF_SIZE_MB", DEFAULT_MAX_PDF_SIZE_MB)?,
        })
    }
}

impl GraderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            socket_path: env::var("DOCKER_SOCKET")
                .unwrap_or_else(|_| "/var/run/docker.sock".to_string()),
            network_name: env::var("GRADER_NETWORK").unwrap_or_else(|_| "none".to_string()),
            memory_limit_mb: parse_var("DEFAULT_MEMORY_LIMIT_MB", DEFAULT_MEMORY_LIMIT_MB)?,
            cpu_limit: parse_var("GRADER_CPU_LIMIT", DEFAULT_CPU_LIMIT)?,
            timeout_slack_ms: parse_var("GRADER_TIMEOUT_SLACK_MS", DEFAULT_GRADER_TIMEOUT_SLACK_MS)?,
            compile_timeout_ms: parse_var(
                "GRADER_COMPILE_TIMEOUT_MS",
                DEFAULT_COMPILE_TIMEOUT_MS,
            )?,
        })
    }
}

/// Read an optional variable, falling back to `default` when unset
fn parse_var<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
