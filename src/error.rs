// src/error.rs

//! Error types for the kitchen and recipe system

use thiserror::Error;

/// Errors that can occur while loading or cooking a recipe
#[derive(Error, Debug)]
pub enum Error {
    /// I/O failure with context
    #[error("I/O error: {0}")]
    IoError(String),

    /// Raw I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input (recipe, version range, JSON)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Recipe parsed but is not usable
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),

    /// A required file or directory does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// An external tool is not installed
    #[error("Required tool not found in PATH: {0}")]
    ToolMissing(String),

    /// An external command exited unsuccessfully
    #[error("{program} failed with exit code {code:?}\nstderr: {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// An external command ran past the configured timeout
    #[error("{program} timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },

    /// A reused checkout is not at the pinned revision
    #[error("Checkout at {path} is at {head:?}, not {tag}; rerun with --fresh")]
    StaleCheckout {
        path: String,
        tag: String,
        head: String,
    },

    /// A declared requirement could not be satisfied
    #[error("Resolution error: {0}")]
    ResolutionError(String),

    /// Patch search text was not found in the target file
    #[error("Patch not applicable to {file}: search text not found: {search:?}")]
    PatchNotApplicable { file: String, search: String },

    /// Single-occurrence patch matched more than once
    #[error("Patch for {file} is ambiguous: {search:?} occurs {occurrences} times")]
    PatchAmbiguous {
        file: String,
        search: String,
        occurrences: usize,
    },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ParseError(format!("JSON: {}", e))
    }
}

impl From<walkdir::Error> for Error {
    fn from(e: walkdir::Error) -> Self {
        Error::IoError(format!("Directory walk failed: {}", e))
    }
}
