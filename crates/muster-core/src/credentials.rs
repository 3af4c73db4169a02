//! Session credential storage and retrieval.
//!
//! Stores the bearer token and administrator identity in
//! `${MUSTER_HOME}/session.json` with restricted permissions (0600).
//! Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::config::paths;

/// Administrator identity returned at login and shown in the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Display name, when the backend provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// E-mail address, when the backend provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Identity {
    /// Returns the preferred display string: name, then e-mail.
    pub fn display(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.email.as_deref().filter(|s| !s.is_empty()))
    }
}

/// A stored session: bearer token plus the identity it belongs to.
///
/// Token and identity live and die together; `clear` removes both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// The opaque bearer token presented on each protected request.
    pub token: String,
    /// The authenticated administrator.
    #[serde(default)]
    pub admin: Identity,
}

/// File-backed credential store.
///
/// The path is explicit so tests can point the store at a scratch file
/// instead of the real `${MUSTER_HOME}`.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Opens the store at the default session path under `${MUSTER_HOME}`.
    pub fn open_default() -> Self {
        Self::at(paths::session_path())
    }

    /// Opens the store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored session from disk.
    /// Returns `None` if no credential has been saved.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;

        let session = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))?;
        Ok(Some(session))
    }

    /// Saves the session to disk with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn save(&self, session: &StoredSession) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    /// Removes the stored session.
    /// Returns true if a credential existed.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        Ok(true)
    }

    /// Session guard: loads the stored session, failing with
    /// [`ApiError::MissingCredential`] when none is present.
    ///
    /// Callers run this before any protected request; a missing credential
    /// must block the action before anything goes on the wire.
    ///
    /// # Errors
    /// Returns `MissingCredential` when no session is stored. An unreadable
    /// session file is treated the same way; the next login overwrites it.
    pub fn require_login(&self) -> std::result::Result<StoredSession, ApiError> {
        match self.load() {
            Ok(Some(session)) => Ok(session),
            Ok(None) => Err(ApiError::MissingCredential),
            Err(err) => {
                tracing::warn!("unreadable session file: {err:#}");
                Err(ApiError::MissingCredential)
            }
        }
    }
}

/// Returns a masked version of a token for display (first 8 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 12 {
        return "***".to_string();
    }
    format!("{}...", &token[..8])
}
