//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Async work (login exchange, record fetch, export) is spawned as a tokio
//! task that sends its completion event to `inbox_tx`. The event loop
//! drains `inbox_rx` each frame, so exactly one task per trigger is in
//! flight and results always flow through the reducer.

use std::io::Stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use muster_core::api::ApiClient;
use muster_core::credentials::{CredentialStore, StoredSession};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::{ExportError, UiEvent};
use crate::state::{AppState, Screen};
use crate::{render, terminal, update};

/// Tick cadence for spinner animation and input polling.
const TICK_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is restored on drop paths via the panic hook and at the
/// end of `run`.
pub struct TuiRuntime {
    /// Terminal instance.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state.
    pub state: AppState,
    /// Inbox sender - spawned tasks send completion events here.
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    /// Inbox receiver - the loop drains this each frame.
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    /// Backend client shared by all spawned requests.
    client: ApiClient,
    /// Credential store (the session guard reads it before each request).
    store: CredentialStore,
    /// Where exports are written.
    export_path: PathBuf,
    /// Last time a Tick event was emitted.
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime and takes over the terminal.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(
        client: ApiClient,
        store: CredentialStore,
        export_path: PathBuf,
        session: Option<StoredSession>,
    ) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state: AppState::new(session),
            inbox_tx,
            inbox_rx,
            client,
            store,
            export_path,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until quit, restoring the terminal after.
    ///
    /// # Errors
    /// Returns an error if drawing or input polling fails.
    pub fn run(&mut self) -> Result<()> {
        // Starting logged in is the page-load flow: guard already passed,
        // fetch immediately.
        if let Screen::Dashboard(dash) = &mut self.state.screen {
            dash.loading = true;
            self.execute_effect(UiEffect::FetchRecords);
        }

        let result = self.event_loop();
        let restored = terminal::restore_terminal();
        result.and(restored)
    }

    fn event_loop(&mut self) -> Result<()> {
        while !self.state.should_quit {
            let events = self.collect_events()?;
            for event in events {
                let effects = update::update(&mut self.state, event);
                for effect in effects {
                    self.execute_effect(effect);
                }
            }

            self.terminal.draw(|frame| {
                render::render(&self.state, frame);
            })?;
        }

        Ok(())
    }

    /// Collects events from the terminal, the inbox, and the tick timer.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Wait up to one tick for terminal input, then drain whatever is
        // queued without waiting further.
        if event::poll(TICK_DURATION).context("Failed to poll terminal events")? {
            events.push(UiEvent::Terminal(
                event::read().context("Failed to read terminal event")?,
            ));
            while event::poll(Duration::ZERO).unwrap_or(false) {
                if let Ok(ev) = event::read() {
                    events.push(UiEvent::Terminal(ev));
                }
            }
        }

        // Async completions.
        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        // Steady tick for the spinner.
        if self.last_tick.elapsed() >= TICK_DURATION {
            self.last_tick = Instant::now();
            events.push(UiEvent::Tick);
        }

        Ok(events)
    }

    /// Executes one effect. Task-spawning effects clone what they need and
    /// report back through the inbox.
    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => self.state.should_quit = true,

            UiEffect::SubmitLogin { email, password } => {
                let client = self.client.clone();
                let store = self.store.clone();
                let tx = self.inbox_tx.clone();
                tokio::spawn(async move {
                    let result = client.login(&email, &password).await;
                    if let Ok(session) = &result
                        && let Err(err) = store.save(session)
                    {
                        tracing::error!("failed to persist credential: {err:#}");
                    }
                    let _ = tx.send(UiEvent::LoginFinished(result));
                });
            }

            UiEffect::FetchRecords => {
                let client = self.client.clone();
                let store = self.store.clone();
                let tx = self.inbox_tx.clone();
                tokio::spawn(async move {
                    // Session guard first: nothing goes on the wire without
                    // a stored credential.
                    let result = match store.require_login() {
                        Ok(session) => client.fetch_records(&session.token).await,
                        Err(err) => Err(err),
                    };
                    let _ = tx.send(UiEvent::RecordsLoaded(result));
                });
            }

            UiEffect::ExportReport => {
                let client = self.client.clone();
                let store = self.store.clone();
                let tx = self.inbox_tx.clone();
                let path = self.export_path.clone();
                tokio::spawn(async move {
                    let result = match store.require_login() {
                        Ok(session) => match client.export_report(&session.token).await {
                            Ok(bytes) => std::fs::write(&path, &bytes)
                                .map(|()| path)
                                .map_err(|err| ExportError::Io(err.to_string())),
                            Err(err) => Err(ExportError::Api(err)),
                        },
                        // Fail fast: no credential, no request.
                        Err(err) => Err(ExportError::Api(err)),
                    };
                    let _ = tx.send(UiEvent::ExportFinished(result));
                });
            }

            UiEffect::ClearCredentials => {
                if let Err(err) = self.store.clear() {
                    tracing::error!("failed to clear credential: {err:#}");
                }
            }
        }
    }
}
