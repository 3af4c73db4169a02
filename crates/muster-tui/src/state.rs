//! Application state for the dashboard.
//!
//! The screen enum is the session state machine made explicit: `Login` is
//! the logged-out state, `Dashboard` the logged-in one. There is no third
//! state, and only the dashboard screen can trigger protected requests, so
//! fetching while logged out is unrepresentable.
//!
//! ```text
//! Login --(login success)--> Dashboard --(logout | 401)--> Login
//! ```

use muster_core::credentials::{Identity, StoredSession};
use muster_core::table::{DisplayRow, apply_filter};

/// Top-level TUI state.
pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Current screen (the session state machine).
    pub screen: Screen,
    /// Spinner animation frame counter (for in-flight requests).
    pub spinner_frame: usize,
}

impl AppState {
    /// Creates the initial state from the stored session, if any.
    pub fn new(session: Option<StoredSession>) -> Self {
        let screen = match session {
            Some(session) => Screen::Dashboard(DashboardScreen::new(session.admin)),
            None => Screen::Login(LoginScreen::default()),
        };
        Self {
            should_quit: false,
            screen,
            spinner_frame: 0,
        }
    }

    /// Switches to the login screen, optionally carrying a notice
    /// (e.g. the unauthorized message after a forced logout).
    pub fn go_to_login(&mut self, notice: Option<String>) {
        self.screen = Screen::Login(LoginScreen {
            notice,
            ..LoginScreen::default()
        });
    }

    /// Switches to the dashboard for the given identity.
    pub fn go_to_dashboard(&mut self, admin: Identity) {
        self.screen = Screen::Dashboard(DashboardScreen::new(admin));
    }
}

/// The two screens of the session state machine.
pub enum Screen {
    /// Logged out: the login form.
    Login(LoginScreen),
    /// Logged in: the attendance table.
    Dashboard(DashboardScreen),
}

/// Which login field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

/// Login form state.
#[derive(Default)]
pub struct LoginScreen {
    /// E-mail input.
    pub email: String,
    /// Password input (rendered masked).
    pub password: String,
    /// Focused field.
    pub focus: LoginField,
    /// True while the login exchange is in flight.
    pub submitting: bool,
    /// Error region: login failures.
    pub error: Option<String>,
    /// Informational line (e.g. why the user landed here).
    pub notice: Option<String>,
}

impl LoginScreen {
    /// Moves focus to the other field.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    /// Returns the focused input buffer.
    pub fn focused_input_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }
}

/// Dashboard state: the rendered attendance table plus request flags.
pub struct DashboardScreen {
    /// The authenticated administrator, reflected in the header.
    pub admin: Identity,
    /// Projected rows for the current record set. Replaced wholesale on
    /// every fetch; never mutated incrementally.
    pub rows: Vec<DisplayRow>,
    /// Current filter query.
    pub filter: String,
    /// True while the filter input has focus.
    pub filtering: bool,
    /// True while a record fetch is in flight.
    pub loading: bool,
    /// True while an export is in flight.
    pub exporting: bool,
    /// Error region: fetch/export failures.
    pub error: Option<String>,
    /// Informational line (e.g. where the export landed).
    pub notice: Option<String>,
    /// Wall-clock time of the last successful fetch (HH:MM:SS).
    pub last_updated: Option<String>,
}

impl DashboardScreen {
    /// Creates an empty dashboard for the given identity. The first fetch
    /// is triggered by the reducer, not here.
    pub fn new(admin: Identity) -> Self {
        Self {
            admin,
            rows: Vec::new(),
            filter: String::new(),
            filtering: false,
            loading: false,
            exporting: false,
            error: None,
            notice: None,
            last_updated: None,
        }
    }

    /// Replaces the rendered rows and re-applies the current filter.
    pub fn set_rows(&mut self, mut rows: Vec<DisplayRow>) {
        apply_filter(&mut rows, &self.filter);
        self.rows = rows;
    }

    /// Updates the filter query and row visibility.
    pub fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        apply_filter(&mut self.rows, &self.filter);
    }
}
