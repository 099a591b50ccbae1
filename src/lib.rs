#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

//! # ghup CLI
//!
//! Command-line tools for uploading binary assets to GitHub releases and
//! pre-signed storage forms.
//!
//! ## Architecture
//!
//! This library is organized into several key modules:
//!
//! - **[`error`]** - Error types and process exit codes
//! - **[`auth`]** - Credential resolution (token file, env var, password)
//! - **[`client`]** - JSON HTTP client with error-body surfacing
//! - **[`multipart`]** - RFC 7578 multipart/form-data body construction
//! - **[`release`]** - Release/asset model and first-match selection
//! - **[`upload`]** - Pre-signed form and direct release-asset uploads
//! - **[`label`]** - Asset relabeling
//!
//! ## Quick Start
//!
//! ```bash
//! ghup push -u octocat -r hello --tag v1.0 dist/hello-1.0.tar.gz
//! ghup label -u octocat -r hello --tag v1.0 hello-1.0.tar.gz "Source tarball"
//! ```

pub mod auth;
pub mod cli;
pub mod client;
pub mod error;
pub mod label;
pub mod multipart;
pub mod release;
pub mod upload;

/// Error type alias for convenience
pub use error::{CliError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "ghup";
