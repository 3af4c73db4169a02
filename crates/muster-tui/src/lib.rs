//! Terminal dashboard for the attendance backend.
//!
//! Architecture follows an Elm-style split:
//! - `state` holds the screen state machine (login vs dashboard)
//! - `update` is the pure reducer: state + event -> mutations + effects
//! - `render` is the pure view: state -> frame
//! - `runtime` owns the terminal, executes effects, and collects async
//!   results through an inbox channel
//! - `terminal` handles raw-mode/alternate-screen lifecycle

pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::path::PathBuf;

use anyhow::Result;
use muster_core::api::ApiClient;
use muster_core::credentials::CredentialStore;

/// Runs the dashboard until the user quits.
///
/// The stored session decides the initial screen: a present credential
/// opens the dashboard (and triggers the first fetch), an absent one opens
/// the login form. Protected work never runs from the login screen.
///
/// # Errors
/// Returns an error if the terminal cannot be set up or restored.
pub async fn run(client: ApiClient, store: CredentialStore, export_path: PathBuf) -> Result<()> {
    let session = match store.load() {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!("unreadable session file, starting logged out: {err:#}");
            None
        }
    };
    let mut runtime = runtime::TuiRuntime::new(client, store, export_path, session)?;
    runtime.run()
}
