//! Error taxonomy for backend requests.
//!
//! Every failure a request can produce maps to exactly one variant, and each
//! variant maps to exactly one user-facing message via `Display`. The
//! `ServerUnavailable` and `NetworkUnreachable` messages are deliberately
//! different strings: a reachable server that failed and a server that never
//! answered call for different operator reactions.

use std::fmt;

use serde_json::Value;

/// Classified failure from the attendance backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Bad credentials at login. The user retries the login.
    AuthenticationFailed {
        /// Server-provided error text, or a fallback built from the status.
        message: String,
    },
    /// Stale or rejected token on a protected request. The caller must
    /// clear the credential and return to the login surface; never retried.
    Unauthorized,
    /// The server answered with a non-401 failure status.
    ServerUnavailable { status: u16 },
    /// No response reached the client (connect failure, timeout, ...).
    NetworkUnreachable { detail: String },
    /// Client-side precondition: no stored credential. Blocks the action
    /// before any network call.
    MissingCredential,
}

impl ApiError {
    /// Builds an `AuthenticationFailed` from a login failure response.
    ///
    /// Prefers the server's error text when the body is JSON with a
    /// `detail` field (FastAPI style) or an `error.message` field, falling
    /// back to the raw status code.
    pub fn authentication_failed(status: u16, body: &str) -> Self {
        let message = extract_error_text(body)
            .unwrap_or_else(|| format!("Login failed (HTTP {status})"));
        Self::AuthenticationFailed { message }
    }

    /// Builds a `NetworkUnreachable` from a transport-level failure.
    pub fn network_unreachable(err: &reqwest::Error) -> Self {
        Self::NetworkUnreachable {
            detail: transport_detail(err),
        }
    }
}

/// Flattens a reqwest error's source chain into one line for the log.
fn transport_detail(err: &reqwest::Error) -> String {
    use std::error::Error;

    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(e) = source {
        parts.push(e.to_string());
        source = e.source();
    }
    parts.join(": ")
}

/// Pulls a human-readable error message out of a JSON error body.
fn extract_error_text(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    if let Some(detail) = json.get("detail").and_then(Value::as_str) {
        return Some(detail.to_string());
    }
    json.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(std::string::ToString::to_string)
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::AuthenticationFailed { message } => write!(f, "{message}"),
            ApiError::Unauthorized => write!(f, "Unauthorized. Please log in again."),
            ApiError::ServerUnavailable { status } => {
                write!(f, "Failed to load data (HTTP {status}).")
            }
            ApiError::NetworkUnreachable { .. } => write!(f, "Server unreachable."),
            ApiError::MissingCredential => write!(f, "Not logged in. Please log in first."),
        }
    }
}

impl std::error::Error for ApiError {}
