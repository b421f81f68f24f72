//! Per-language build and run recipes

use crate::{
    constants::{container_images, languages},
    error::{AppError, AppResult},
};

/// How to build and run a solution in one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toolchain {
    pub language: &'static str,
    pub image: &'static str,
    pub source_file: &'static str,
    /// Compile step, or a syntax check for interpreted languages
    pub compile_command: Option<&'static str>,
    pub run_command: &'static str,
}

const TOOLCHAINS: &[Toolchain] = &[
    Toolchain {
        language: languages::C,
        image: container_images::C,
        source_file: "solution.c",
        compile_command: Some(
            "gcc -O2 -std=c17 -Wall -o /workspace/solution /workspace/solution.c -lm",
        ),
        run_command: "/workspace/solution",
    },
    Toolchain {
        language: languages::CPP,
        image: container_images::CPP,
        source_file: "solution.cpp",
        compile_command: Some(
            "g++ -O2 -std=c++20 -Wall -o /workspace/solution /workspace/solution.cpp",
        ),
        run_command: "/workspace/solution",
    },
    Toolchain {
        language: languages::RUST,
        image: container_images::RUST,
        source_file: "solution.rs",
        compile_command: Some("rustc -O -o /workspace/solution /workspace/solution.rs"),
        run_command: "/workspace/solution",
    },
    Toolchain {
        language: languages::GO,
        image: container_images::GO,
        source_file: "solution.go",
        compile_command: Some("go build -o /workspace/solution /workspace/solution.go"),
        run_command: "/workspace/solution",
    },
    Toolchain {
        language: languages::ZIG,
        image: container_images::ZIG,
        source_file: "solution.zig",
        compile_command: Some(
            "zig build-exe -O ReleaseFast -femit-bin=/workspace/solution /workspace/solution.zig",
        ),
        run_command: "/workspace/solution",
    },
    Toolchain {
        language: languages::PYTHON,
        image: container_images::PYTHON,
        source_file: "solution.py",
        compile_command: Some("python3 -m py_compile /workspace/solution.py"),
        run_command: "python3 /workspace/solution.py",
    },
];

impl Toolchain {
    /// Look up the recipe for a language identifier
    pub fn for_language(language: &str) -> AppResult<Self> {
        TOOLCHAINS
            .iter()
            .find(|t| t.language == language)
            .copied()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Unsupported language: {language}")))
    }

    pub fn source_path(&self) -> String {
        format!("/workspace/{}", self.source_file)
    }
}
