//! Application-wide constants
//!
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// GRADER DEFAULTS
// =============================================================================

/// Default time limit in milliseconds
pub const DEFAULT_TIME_LIMIT_MS: i32 = 1500;

/// Smallest accepted time limit in milliseconds
pub const MIN_TIME_LIMIT_MS: i64 = 100;

/// Largest accepted time limit in milliseconds
pub const MAX_TIME_LIMIT_MS: i64 = 30_000;

/// Default memory limit in megabytes
pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 256;

/// CPU limit per grading container (number of cores)
pub const DEFAULT_CPU_LIMIT: f64 = 1.0;

/// Extra wall-clock allowance on top of the time limit before the host gives up
pub const DEFAULT_GRADER_TIMEOUT_SLACK_MS: u64 = 2_000;

/// Wall-clock limit for compiling a solution
pub const DEFAULT_COMPILE_TIMEOUT_MS: u64 = 30_000;

/// Bound on container bookkeeping (create, file writes, removal)
pub const CONTAINER_OP_TIMEOUT_MS: u64 = 30_000;

/// Exit code reported by coreutils `timeout`
pub const TIMEOUT_EXIT_CODE: i32 = 124;

// =============================================================================
// SUPPORTED LANGUAGES
// =============================================================================

/// Language identifiers
pub mod languages {
    pub const C: &str = "c";
    pub const CPP: &str = "cpp";
    pub const RUST: &str = "rust";
    pub const GO: &str = "go";
    pub const ZIG: &str = "zig";
    pub const PYTHON: &str = "python";

    /// All supported language identifiers
    pub const ALL: &[&str] = &[C, CPP, RUST, GO, ZIG, PYTHON];
}

/// Container images for each language
pub mod container_images {
    pub const C: &str = "grader/c:latest";
    pub const CPP: &str = "grader/cpp:latest";
    pub const RUST: &str = "grader/rust:latest";
    pub const GO: &str = "grader/go:latest";
    pub const ZIG: &str = "grader/zig:latest";
    pub const PYTHON: &str = "grader/python:latest";
}

// =============================================================================
// PROBLEM SETTINGS
// =============================================================================

/// Problem visibility policies
pub mod view_modes {
    pub const PUBLIC: &str = "public";
    pub const PRIVATE: &str = "private";
    pub const HIDDEN: &str = "hidden";

    /// All view modes
    pub const ALL: &[&str] = &[PUBLIC, PRIVATE, HIDDEN];
}

/// Per-testcase outcome of running the reference solution
pub mod runtime_statuses {
    pub const OK: &str = "ok";
    pub const ERROR: &str = "error";
    pub const TIMEOUT: &str = "timeout";
}

// =============================================================================
// PDF ATTACHMENTS
// =============================================================================

/// Magic bytes every PDF starts with
pub const PDF_SIGNATURE: &[u8; 4] = b"%PDF";

/// Required file name extension (compared case-insensitively)
pub const PDF_EXTENSION: &str = ".pdf";

/// Length of the random suffix appended to stored PDF names
pub const PDF_NAME_TOKEN_LENGTH: usize = 7;

/// Longest title slug kept in a stored PDF name; the full name must fit
/// a 255-byte file name
pub const MAX_SLUG_LENGTH: usize = 200;

/// Default directory for stored PDFs
pub const DEFAULT_PDF_STORAGE_PATH: &str = "media/import-pdf";

/// Default public path prefix the PDFs are served under
pub const DEFAULT_PDF_MEDIA_PREFIX: &str = "/media/import-pdf";

/// Default maximum PDF upload size in megabytes
pub const DEFAULT_MAX_PDF_SIZE_MB: usize = 20;

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum problem title length
pub const MAX_PROBLEM_TITLE_LENGTH: u64 = 256;

/// Maximum problem description length
pub const MAX_PROBLEM_DESCRIPTION_LENGTH: u64 = 65535;

/// Maximum source code size in bytes (64 KB)
pub const MAX_SOURCE_CODE_SIZE: u64 = 64 * 1024;

/// Maximum number of testcase inputs per generation
pub const MAX_TESTCASES_PER_PROBLEM: u64 = 200;
