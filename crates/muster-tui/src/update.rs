//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(state, event)`
//! and executes the returned effects.
//!
//! This is the single source of truth for how events modify state, which is
//! what makes the session transitions testable: a 401 always produces a
//! `ClearCredentials` effect plus a switch to the login screen, and nothing
//! else can leave the dashboard.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use muster_core::api::ApiError;
use muster_core::credentials::StoredSession;
use muster_core::records::AttendanceRecord;
use muster_core::table::project_rows;

use crate::effects::UiEffect;
use crate::events::{ExportError, UiEvent};
use crate::state::{AppState, LoginScreen, Screen};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(state: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            if is_busy(state) {
                state.spinner_frame = state.spinner_frame.wrapping_add(1);
            }
            vec![]
        }
        UiEvent::Terminal(Event::Key(key)) if key.kind != KeyEventKind::Release => {
            handle_key(state, key)
        }
        UiEvent::Terminal(_) => vec![],
        UiEvent::LoginFinished(result) => handle_login_finished(state, result),
        UiEvent::RecordsLoaded(result) => handle_records_loaded(state, result),
        UiEvent::ExportFinished(result) => handle_export_finished(state, result),
    }
}

fn is_busy(state: &AppState) -> bool {
    match &state.screen {
        Screen::Login(login) => login.submitting,
        Screen::Dashboard(dash) => dash.loading || dash.exporting,
    }
}

// ============================================================================
// Key handling
// ============================================================================

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    // Ctrl+C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    match &mut state.screen {
        Screen::Login(login) => handle_login_key(login, key),
        Screen::Dashboard(_) => handle_dashboard_key(state, key),
    }
}

fn handle_login_key(login: &mut LoginScreen, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Esc => vec![UiEffect::Quit],
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            login.toggle_focus();
            vec![]
        }
        KeyCode::Enter => {
            if login.submitting {
                return vec![];
            }
            if login.email.trim().is_empty() || login.password.is_empty() {
                login.error = Some("E-mail and password are required.".to_string());
                return vec![];
            }
            login.submitting = true;
            login.error = None;
            login.notice = None;
            vec![UiEffect::SubmitLogin {
                email: login.email.trim().to_string(),
                password: login.password.clone(),
            }]
        }
        KeyCode::Char(c) if !login.submitting => {
            login.focused_input_mut().push(c);
            vec![]
        }
        KeyCode::Backspace if !login.submitting => {
            login.focused_input_mut().pop();
            vec![]
        }
        _ => vec![],
    }
}

fn handle_dashboard_key(state: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let Screen::Dashboard(dash) = &mut state.screen else {
        return vec![];
    };

    if dash.filtering {
        match key.code {
            // Esc cancels the filter; everything becomes visible again.
            KeyCode::Esc => {
                dash.filtering = false;
                dash.set_filter(String::new());
            }
            KeyCode::Enter => dash.filtering = false,
            KeyCode::Char(c) => {
                let mut filter = dash.filter.clone();
                filter.push(c);
                dash.set_filter(filter);
            }
            KeyCode::Backspace => {
                let mut filter = dash.filter.clone();
                filter.pop();
                dash.set_filter(filter);
            }
            _ => {}
        }
        return vec![];
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => vec![UiEffect::Quit],
        KeyCode::Char('r') => {
            if dash.loading {
                return vec![];
            }
            dash.loading = true;
            dash.error = None;
            dash.notice = None;
            vec![UiEffect::FetchRecords]
        }
        KeyCode::Char('e') => {
            if dash.exporting {
                return vec![];
            }
            dash.exporting = true;
            dash.error = None;
            dash.notice = None;
            vec![UiEffect::ExportReport]
        }
        KeyCode::Char('/') => {
            dash.filtering = true;
            vec![]
        }
        KeyCode::Char('l') => {
            state.go_to_login(None);
            vec![UiEffect::ClearCredentials]
        }
        _ => vec![],
    }
}

// ============================================================================
// Async completions
// ============================================================================

fn handle_login_finished(
    state: &mut AppState,
    result: Result<StoredSession, ApiError>,
) -> Vec<UiEffect> {
    let Screen::Login(login) = &mut state.screen else {
        return vec![];
    };

    match result {
        Ok(session) => {
            // Entering the dashboard is the page-load flow: guard passed,
            // fetch immediately.
            state.go_to_dashboard(session.admin);
            if let Screen::Dashboard(dash) = &mut state.screen {
                dash.loading = true;
            }
            vec![UiEffect::FetchRecords]
        }
        Err(err) => {
            login.submitting = false;
            login.error = Some(err.to_string());
            vec![]
        }
    }
}

fn handle_records_loaded(
    state: &mut AppState,
    result: Result<Vec<AttendanceRecord>, ApiError>,
) -> Vec<UiEffect> {
    let Screen::Dashboard(dash) = &mut state.screen else {
        return vec![];
    };

    match result {
        Ok(records) => {
            dash.loading = false;
            dash.error = None;
            dash.last_updated = Some(chrono::Local::now().format("%H:%M:%S").to_string());
            dash.set_rows(project_rows(&records));
            vec![]
        }
        Err(err @ (ApiError::Unauthorized | ApiError::MissingCredential)) => {
            // A stale or rejected token is "not logged in": clear the
            // credential and return to the entry screen. Never retried.
            state.go_to_login(Some(err.to_string()));
            vec![UiEffect::ClearCredentials]
        }
        Err(err) => {
            dash.loading = false;
            dash.error = Some(err.to_string());
            vec![]
        }
    }
}

fn handle_export_finished(
    state: &mut AppState,
    result: Result<std::path::PathBuf, ExportError>,
) -> Vec<UiEffect> {
    let Screen::Dashboard(dash) = &mut state.screen else {
        return vec![];
    };

    match result {
        Ok(path) => {
            dash.exporting = false;
            dash.notice = Some(format!("Saved {}", path.display()));
            vec![]
        }
        Err(ExportError::Api(err @ (ApiError::Unauthorized | ApiError::MissingCredential))) => {
            state.go_to_login(Some(err.to_string()));
            vec![UiEffect::ClearCredentials]
        }
        Err(err) => {
            match &err {
                ExportError::Api(api) => tracing::warn!("export failed: {api}"),
                ExportError::Io(detail) => tracing::warn!("export write failed: {detail}"),
            }
            dash.exporting = false;
            dash.error = Some("Export failed.".to_string());
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use muster_core::credentials::Identity;

    use super::*;
    use crate::state::DashboardScreen;

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn logged_in_state() -> AppState {
        AppState::new(Some(StoredSession {
            token: "T".to_string(),
            admin: Identity {
                name: Some("Admin".to_string()),
                email: None,
            },
        }))
    }

    fn records(json: &str) -> Vec<AttendanceRecord> {
        serde_json::from_str(json).unwrap()
    }

    fn dashboard(state: &AppState) -> &DashboardScreen {
        match &state.screen {
            Screen::Dashboard(dash) => dash,
            Screen::Login(_) => panic!("expected dashboard screen"),
        }
    }

    /// Test: a successful login switches to the dashboard and fetches.
    #[test]
    fn test_login_success_enters_dashboard() {
        let mut state = AppState::new(None);
        let session = StoredSession {
            token: "T".to_string(),
            admin: Identity {
                name: Some("Admin".to_string()),
                email: None,
            },
        };

        let effects = update(&mut state, UiEvent::LoginFinished(Ok(session)));

        assert_eq!(effects, vec![UiEffect::FetchRecords]);
        assert!(dashboard(&state).loading);
    }

    /// Test: a rejected login stays on the login screen with the server's
    /// message.
    #[test]
    fn test_login_failure_shows_message() {
        let mut state = AppState::new(None);
        // Simulate a submitted form.
        if let Screen::Login(login) = &mut state.screen {
            login.submitting = true;
        }

        let err = ApiError::AuthenticationFailed {
            message: "Invalid email or password".to_string(),
        };
        let effects = update(&mut state, UiEvent::LoginFinished(Err(err)));

        assert!(effects.is_empty());
        let Screen::Login(login) = &state.screen else {
            panic!("expected login screen");
        };
        assert!(!login.submitting);
        assert_eq!(login.error.as_deref(), Some("Invalid email or password"));
    }

    /// Test: a 401 on fetch always clears the credential and returns to the
    /// login screen, regardless of prior state.
    #[test]
    fn test_unauthorized_fetch_forces_logout() {
        let mut state = logged_in_state();

        let effects = update(
            &mut state,
            UiEvent::RecordsLoaded(Err(ApiError::Unauthorized)),
        );

        assert_eq!(effects, vec![UiEffect::ClearCredentials]);
        let Screen::Login(login) = &state.screen else {
            panic!("expected login screen");
        };
        assert_eq!(
            login.notice.as_deref(),
            Some("Unauthorized. Please log in again.")
        );
    }

    /// Test: a non-401 failure keeps the dashboard and its rows, and shows
    /// a message distinct from the network one.
    #[test]
    fn test_server_failure_keeps_dashboard() {
        let mut state = logged_in_state();
        update(
            &mut state,
            UiEvent::RecordsLoaded(Ok(records(r#"[{"name":"Alice"}]"#))),
        );

        let effects = update(
            &mut state,
            UiEvent::RecordsLoaded(Err(ApiError::ServerUnavailable { status: 500 })),
        );

        assert!(effects.is_empty());
        let dash = dashboard(&state);
        assert_eq!(dash.rows.len(), 1, "prior rows untouched");
        let server_msg = dash.error.clone().unwrap();

        let mut state = logged_in_state();
        update(
            &mut state,
            UiEvent::RecordsLoaded(Err(ApiError::NetworkUnreachable {
                detail: "connection refused".to_string(),
            })),
        );
        let network_msg = dashboard(&state).error.clone().unwrap();

        assert_ne!(server_msg, network_msg);
    }

    /// Test: an empty record set renders the single placeholder row.
    #[test]
    fn test_empty_records_placeholder() {
        let mut state = logged_in_state();
        update(&mut state, UiEvent::RecordsLoaded(Ok(vec![])));

        let dash = dashboard(&state);
        assert_eq!(dash.rows.len(), 1);
        assert!(dash.rows[0].placeholder);
        assert!(dash.rows[0].visible);
    }

    /// Test: filter keystrokes toggle row visibility without effects.
    #[test]
    fn test_filter_keystrokes() {
        let mut state = logged_in_state();
        update(
            &mut state,
            UiEvent::RecordsLoaded(Ok(records(r#"[{"name":"Alice"},{"name":"Bob"}]"#))),
        );

        assert!(update(&mut state, key(KeyCode::Char('/'))).is_empty());
        assert!(update(&mut state, key(KeyCode::Char('b'))).is_empty());

        let dash = dashboard(&state);
        assert_eq!(
            dash.rows.iter().map(|r| r.visible).collect::<Vec<_>>(),
            vec![false, true]
        );

        // Esc cancels the filter and everything is visible again.
        update(&mut state, key(KeyCode::Esc));
        let dash = dashboard(&state);
        assert!(!dash.filtering);
        assert!(dash.rows.iter().all(|r| r.visible));
    }

    /// Test: refresh is ignored while a fetch is already in flight.
    #[test]
    fn test_refresh_ignored_while_loading() {
        let mut state = logged_in_state();

        let first = update(&mut state, key(KeyCode::Char('r')));
        assert_eq!(first, vec![UiEffect::FetchRecords]);

        let second = update(&mut state, key(KeyCode::Char('r')));
        assert!(second.is_empty());
    }

    /// Test: export completion posts the saved path, failure a generic
    /// notice.
    #[test]
    fn test_export_outcomes() {
        let mut state = logged_in_state();
        update(&mut state, key(KeyCode::Char('e')));

        update(
            &mut state,
            UiEvent::ExportFinished(Ok(std::path::PathBuf::from("attendance_report.csv"))),
        );
        assert_eq!(
            dashboard(&state).notice.as_deref(),
            Some("Saved attendance_report.csv")
        );

        update(&mut state, key(KeyCode::Char('e')));
        update(
            &mut state,
            UiEvent::ExportFinished(Err(ExportError::Api(ApiError::ServerUnavailable {
                status: 500,
            }))),
        );
        assert_eq!(dashboard(&state).error.as_deref(), Some("Export failed."));
    }

    /// Test: a missing credential at export time routes to the login
    /// screen without a request having been made.
    #[test]
    fn test_export_missing_credential_routes_to_login() {
        let mut state = logged_in_state();
        update(&mut state, key(KeyCode::Char('e')));

        let effects = update(
            &mut state,
            UiEvent::ExportFinished(Err(ExportError::Api(ApiError::MissingCredential))),
        );

        assert_eq!(effects, vec![UiEffect::ClearCredentials]);
        assert!(matches!(state.screen, Screen::Login(_)));
    }

    /// Test: logout clears the credential and returns to login.
    #[test]
    fn test_logout_key() {
        let mut state = logged_in_state();
        let effects = update(&mut state, key(KeyCode::Char('l')));

        assert_eq!(effects, vec![UiEffect::ClearCredentials]);
        assert!(matches!(state.screen, Screen::Login(_)));
    }

    /// Test: quit keys produce the quit effect.
    #[test]
    fn test_quit_keys() {
        let mut state = logged_in_state();
        assert_eq!(update(&mut state, key(KeyCode::Char('q'))), vec![
            UiEffect::Quit
        ]);

        let mut state = AppState::new(None);
        assert_eq!(update(&mut state, key(KeyCode::Esc)), vec![UiEffect::Quit]);
    }
}
