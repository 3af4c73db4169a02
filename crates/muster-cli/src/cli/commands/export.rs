//! Export command handler.

use std::path::PathBuf;

use anyhow::{Context, Result};
use muster_core::api::{ApiClient, ApiError};
use muster_core::config::Config;
use muster_core::credentials::CredentialStore;

/// Downloads the attendance report and writes it to disk.
pub async fn run(config: &Config, store: &CredentialStore, output: Option<&str>) -> Result<()> {
    // Fail fast with a log-in prompt when no credential is stored; nothing
    // goes on the wire in that case.
    let session = match store.require_login() {
        Ok(session) => session,
        Err(err) => anyhow::bail!("{err}"),
    };

    let client = ApiClient::from_config(config)?;
    let bytes = match client.export_report(&session.token).await {
        Ok(bytes) => bytes,
        Err(ApiError::Unauthorized) => {
            store.clear()?;
            anyhow::bail!("{}", ApiError::Unauthorized);
        }
        Err(err) => anyhow::bail!("Export failed: {err}"),
    };
    tracing::debug!(bytes = bytes.len(), "downloaded attendance report");

    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.export_path));
    std::fs::write(&path, &bytes)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    println!("✓ Saved {} ({} bytes)", path.display(), bytes.len());

    Ok(())
}
