//! # Error Handling
//!
//! This module defines the centralized error type for `pipeline-lib-build`.
//! It uses `thiserror` to build a single `Error` enum covering every failure
//! mode of the build-graph compiler, with messages that always name the
//! implicated coordinate, file path, or HTTP status.
//!
//! ## Taxonomy
//!
//! - **`Format`**: a malformed `group:name:version` string.
//! - **`Configuration`**: unknown catalog component, mutation after the catalog
//!   was frozen, resolver or graph population called out of order.
//! - **`Validation`**: a generated file whose extension does not match the
//!   target source language.
//! - **`Network`**: a failed download or a non-success HTTP status.
//! - **`Filesystem`** / **`Io`**: read, write and copy failures.
//!
//! None of these are retried. They propagate to the invoking build step, which
//! reports them and stops.

use thiserror::Error;

/// Main error type for pipeline-lib-build operations
#[derive(Error, Debug)]
pub enum Error {
    /// A coordinate string could not be parsed.
    #[error("Invalid coordinate '{input}': {message}")]
    Format { input: String, message: String },

    /// The build configuration is inconsistent or was used out of order.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Configuration {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A generated artifact failed validation before it was rendered.
    #[error("Validation error for {path}: {message}")]
    Validation { path: String, message: String },

    /// A download failed or the server answered with a non-success status.
    #[error("Network error for {url}: {message}{}", status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Network {
        url: String,
        message: String,
        status: Option<u16>,
    },

    /// A filesystem operation on a known path failed.
    #[error("Filesystem error at {path}: {message}")]
    Filesystem { path: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A directory traversal error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// Shorthand for a `Configuration` error without a hint.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            hint: None,
        }
    }

    /// Shorthand for a `Filesystem` error on `path`.
    pub fn filesystem(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Error::Filesystem {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
