//! Auth command handlers.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::Result;
use muster_core::api::ApiClient;
use muster_core::config::Config;
use muster_core::credentials::{CredentialStore, mask_token};

/// Logs in to the attendance backend.
///
/// The password is read from stdin (piped or typed) so it stays out of the
/// shell history. On success the session is persisted for later commands.
pub async fn login(config: &Config, store: &CredentialStore, email: &str) -> Result<()> {
    // Check if already logged in
    if let Some(existing) = store.load()? {
        println!(
            "Already logged in as {} (token: {})",
            existing.admin.display().unwrap_or("unknown"),
            mask_token(&existing.token)
        );
        print!("Replace the existing session? [y/N] ");
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        if !response.trim().eq_ignore_ascii_case("y") {
            println!("Login cancelled.");
            return Ok(());
        }
    }

    if io::stdin().is_terminal() {
        print!("Password: ");
        io::stdout().flush()?;
    }
    let mut password = String::new();
    io::stdin().lock().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let client = ApiClient::from_config(config)?;
    let session = client.login(email, password).await?;
    store.save(&session)?;

    println!(
        "✓ Logged in as {}",
        session.admin.display().unwrap_or(email)
    );
    println!("  Session saved to: {}", store.path().display());

    Ok(())
}

/// Logs out by clearing the stored session. No network call.
pub fn logout(store: &CredentialStore) -> Result<()> {
    let had_session = store.clear()?;

    if had_session {
        println!("✓ Logged out");
        println!("  Session removed from: {}", store.path().display());
    } else {
        println!("Not logged in (no stored session).");
    }

    Ok(())
}
