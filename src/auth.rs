//! Credential resolution
//!
//! Resolves an access token or a username/password pair once per invocation
//! and turns it into an `Authorization` header value. Lookup order: the
//! `--password` flag, then the `GHUP_TOKEN` environment variable, then the
//! `access-token` file in the user config directory.

use crate::error::{CliError, Result};
use base64::{engine::general_purpose::STANDARD as B64_STANDARD, Engine};
use std::fs;
use std::path::PathBuf;

/// Resolved credentials, threaded explicitly through every request.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Personal access token
    Token(String),
    /// Username/password pair for HTTP basic auth
    Basic {
        /// Account owner name
        owner: String,
        /// Account password
        password: String,
    },
}

impl Credentials {
    /// Resolve credentials for this invocation.
    ///
    /// An explicit password wins, then the environment, then the token file.
    /// Fails with [`CliError::MissingCredentials`] when nothing is configured.
    pub fn resolve(owner: &str, password: Option<&str>) -> Result<Self> {
        if let Some(password) = password {
            return Ok(Self::Basic {
                owner: owner.to_string(),
                password: password.to_string(),
            });
        }
        if let Ok(token) = std::env::var("GHUP_TOKEN") {
            if !token.is_empty() {
                return Ok(Self::Token(token));
            }
        }
        if let Some(token) = read_token_file()? {
            return Ok(Self::Token(token));
        }
        Err(CliError::MissingCredentials)
    }

    /// The value to place in the `Authorization` header.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::Token(token) => format!("token {token}"),
            Self::Basic { owner, password } => {
                let encoded = B64_STANDARD.encode(format!("{owner}:{password}"));
                format!("Basic {encoded}")
            }
        }
    }
}

/// Path of the access-token file (`~/.config/ghup/access-token`).
///
/// Create the token at <https://github.com/settings/tokens> and store it
/// there, one line, no quoting.
pub fn token_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ghup").join("access-token"))
}

fn read_token_file() -> Result<Option<String>> {
    let Some(path) = token_file_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path).map_err(|err| CliError::File {
        path,
        reason: err.to_string(),
    })?;
    let token = content.trim();
    if token.is_empty() {
        return Ok(None);
    }
    Ok(Some(token.to_string()))
}
