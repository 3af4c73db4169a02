//! HTTP client for the attendance backend.
//!
//! The backend is an external collaborator consumed over three endpoints:
//! a form-encoded login exchange, a bearer-authenticated record listing,
//! and a bearer-authenticated CSV report download. Every call is one-shot:
//! no retries, no backoff, no caching. Timeout behavior is whatever the
//! transport provides.

mod error;

pub use error::ApiError;

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::credentials::{Identity, StoredSession};
use crate::records::AttendanceRecord;

/// Standard User-Agent header for muster API requests.
pub const USER_AGENT: &str = concat!("muster/", env!("CARGO_PKG_VERSION"));

/// Environment variable overriding the backend base URL.
pub const BACKEND_URL_ENV: &str = "MUSTER_BACKEND_URL";

/// Resolves the backend base URL with precedence: env > config > default.
///
/// Trailing slashes are trimmed so endpoint paths can be appended directly.
///
/// # Errors
/// Returns an error if the chosen URL is not well-formed.
pub fn resolve_backend_url(config_url: Option<&str>) -> Result<String> {
    // Try env var first
    if let Ok(env_url) = std::env::var(BACKEND_URL_ENV) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.trim_end_matches('/').to_string());
        }
    }

    // Try config value
    if let Some(config_url) = config_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.trim_end_matches('/').to_string());
        }
    }

    Ok(crate::config::Config::DEFAULT_BACKEND_URL.to_string())
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid backend base URL: {url}"))?;
    Ok(())
}

/// Login response body: bearer token plus the administrator it belongs to.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    admin: Identity,
}

/// Attendance backend client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Creates a client from config, applying the env > config > default
    /// base URL precedence.
    ///
    /// # Errors
    /// Returns an error if the configured URL is not well-formed.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        let base_url = resolve_backend_url(config.backend_url.as_deref())?;
        Ok(Self::new(base_url))
    }

    /// Returns the resolved base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs the login exchange.
    ///
    /// The backend uses the OAuth2 password flow, so the e-mail travels in
    /// the form field named `username`. When the response omits an identity,
    /// the login e-mail stands in so the UI always has something to show.
    ///
    /// A single failed attempt is surfaced immediately; nothing is retried.
    ///
    /// # Errors
    /// `AuthenticationFailed` on any non-success status, `NetworkUnreachable`
    /// when no response arrives.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<StoredSession, ApiError> {
        let url = format!("{}/admin/login", self.base_url);
        let params = [("username", email), ("password", password)];

        tracing::debug!(url, email, "login exchange");
        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|err| ApiError::network_unreachable(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::authentication_failed(status.as_u16(), &body));
        }

        let payload: LoginResponse = response.json().await.map_err(|err| {
            tracing::warn!("malformed login response: {err}");
            ApiError::AuthenticationFailed {
                message: "Login failed (malformed server response)".to_string(),
            }
        })?;

        let mut admin = payload.admin;
        if admin.display().is_none() {
            admin.email = Some(email.to_string());
        }

        Ok(StoredSession {
            token: payload.access_token,
            admin,
        })
    }

    /// Fetches the current attendance record set.
    ///
    /// Three-way classification: 200 parses the body as a record array and
    /// returns it untouched and in order; 401 is `Unauthorized` (the caller
    /// clears the credential and returns to login); any other status is
    /// `ServerUnavailable`; a transport failure is `NetworkUnreachable`.
    ///
    /// # Errors
    /// See the classification above.
    pub async fn fetch_records(
        &self,
        token: &str,
    ) -> std::result::Result<Vec<AttendanceRecord>, ApiError> {
        let url = format!("{}/attendance/records", self.base_url);

        tracing::debug!(url, "fetching attendance records");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| ApiError::network_unreachable(&err))?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(|err| {
                tracing::warn!("malformed records response: {err}");
                ApiError::ServerUnavailable { status: 200 }
            }),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status => Err(ApiError::ServerUnavailable {
                status: status.as_u16(),
            }),
        }
    }

    /// Downloads the attendance report in exportable (CSV) form.
    ///
    /// Same request class and classification as [`Self::fetch_records`];
    /// the payload is returned as raw bytes for the caller to materialize.
    ///
    /// # Errors
    /// See [`Self::fetch_records`].
    pub async fn export_report(&self, token: &str) -> std::result::Result<Bytes, ApiError> {
        let url = format!("{}/attendance/report", self.base_url);

        tracing::debug!(url, "downloading attendance report");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| ApiError::network_unreachable(&err))?;

        match response.status() {
            StatusCode::OK => response
                .bytes()
                .await
                .map_err(|err| ApiError::network_unreachable(&err)),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status => Err(ApiError::ServerUnavailable {
                status: status.as_u16(),
            }),
        }
    }
}
