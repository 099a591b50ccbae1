//! Error types and handling for the ghup CLI
//!
//! Provides structured error types for all CLI operations with proper context
//! and stable process exit codes.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ghup CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error types for ghup CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    // ═══════════════════════════════════════════════════════════════
    // Network & HTTP Errors
    // ═══════════════════════════════════════════════════════════════
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// API error response from the server; the body has already been
    /// surfaced to stderr by the client
    #[error("API error: HTTP {status}")]
    Api {
        /// HTTP status code of the error response
        status: u16,
        /// Raw error response body
        body: Vec<u8>,
    },

    /// Response body was not the JSON shape we expected
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    // ═══════════════════════════════════════════════════════════════
    // Authentication
    // ═══════════════════════════════════════════════════════════════
    /// No token or password configured
    #[error("No authorization available, specify --password or create a token file")]
    MissingCredentials,

    // ═══════════════════════════════════════════════════════════════
    // Release & Asset Selection
    // ═══════════════════════════════════════════════════════════════
    /// No release matched the requested tag
    #[error("Release does not exist: {tag}")]
    ReleaseNotFound {
        /// The tag that was searched for
        tag: String,
    },

    /// No asset matched the requested id or name
    #[error("Asset does not exist: {wanted}")]
    AssetNotFound {
        /// The id or name that was searched for
        wanted: String,
    },

    // ═══════════════════════════════════════════════════════════════
    // I/O & Input Errors
    // ═══════════════════════════════════════════════════════════════
    /// File operation failed
    #[error("File operation failed: {path}: {reason}")]
    File {
        /// Path involved in the failed operation
        path: PathBuf,
        /// Underlying failure description
        reason: String,
    },

    /// Invalid input argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to serialize or deserialize JSON
    #[error("JSON error: {0}")]
    Json(String),
}

impl CliError {
    /// Get the process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingCredentials
            | Self::ReleaseNotFound { .. }
            | Self::AssetNotFound { .. }
            | Self::InvalidArgument(_) => 2,
            Self::Http(_) | Self::Api { .. } => 4,
            Self::InvalidResponse(_) | Self::File { .. } | Self::Json(_) => 1,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::File {
            path: PathBuf::from("<unknown>"),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for CliError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
