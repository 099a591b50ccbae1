//! JSON HTTP client for the REST API
//!
//! Thin wrapper over reqwest that injects the resolved `Authorization`
//! header, speaks JSON in both directions, and surfaces error response
//! bodies to stderr before returning a structured error. No retries.

use crate::auth::Credentials;
use crate::error::{CliError, Result};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// User-Agent sent with every request; the API rejects anonymous clients.
const USER_AGENT: &str = concat!("ghup/", env!("CARGO_PKG_VERSION"));

/// JSON API client carrying the resolved credentials.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    auth: String,
}

impl ApiClient {
    /// Create a client from resolved credentials.
    #[must_use]
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            http: Client::new(),
            auth: credentials.header_value(),
        }
    }

    /// GET a JSON resource.
    pub async fn get<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        self.request(Method::GET, url, None::<&()>).await
    }

    /// POST a JSON body, returning the parsed JSON response.
    pub async fn post<T: Serialize, R: DeserializeOwned>(&self, url: &str, body: &T) -> Result<R> {
        self.request(Method::POST, url, Some(body)).await
    }

    /// PATCH a JSON body, returning the parsed JSON response.
    pub async fn patch<T: Serialize, R: DeserializeOwned>(&self, url: &str, body: &T) -> Result<R> {
        self.request(Method::PATCH, url, Some(body)).await
    }

    /// POST raw bytes (JSON is not assumed), returning the parsed response.
    ///
    /// Used for multipart bodies aimed at authenticated endpoints; the
    /// caller supplies the matching `Content-Type` value.
    pub async fn post_bytes<R: DeserializeOwned>(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<R> {
        let response = self
            .http
            .post(url)
            .header("Authorization", &self.auth)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(surface_http_error(url, status, bytes.to_vec()));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn request<T: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&T>,
    ) -> Result<R> {
        let mut request = self
            .http
            .request(method, url)
            .header("Authorization", &self.auth)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(surface_http_error(url, status, bytes.to_vec()));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// POST a rendered form body without credentials.
///
/// Pre-signed storage forms carry their own authorization in the form
/// fields, so no `Authorization` header is sent.
pub async fn post_form(url: &str, content_type: &str, body: Vec<u8>) -> Result<StatusCode> {
    let response = Client::new()
        .post(url)
        .header("User-Agent", USER_AGENT)
        .header("Content-Type", content_type)
        .body(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let bytes = response.bytes().await?;
        return Err(surface_http_error(url, status, bytes.to_vec()));
    }
    Ok(status)
}

/// Write the failing URL and the error response body to stderr, then build
/// the structured error the caller decides on.
fn surface_http_error(url: &str, status: StatusCode, body: Vec<u8>) -> CliError {
    eprintln!("URL: {url}");
    eprintln!("HTTP error document:");
    eprintln!("{}", String::from_utf8_lossy(&body));
    CliError::Api {
        status: status.as_u16(),
        body,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn error_surfacing_preserves_status_and_body() {
        let err = surface_http_error(
            "https://api.github.com/x",
            StatusCode::BAD_GATEWAY,
            b"upstream sad".to_vec(),
        );
        match err {
            CliError::Api { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, b"upstream sad");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
