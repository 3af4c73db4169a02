//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! This keeps the reducer pure: it only mutates state and returns effects,
//! never performs I/O or spawns tasks directly.

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Spawn the login exchange (persists the credential on success).
    SubmitLogin { email: String, password: String },

    /// Spawn an authenticated record fetch. The runtime reads the stored
    /// credential through the session guard before anything goes on the
    /// wire.
    FetchRecords,

    /// Spawn an authenticated report download and write it to the export
    /// path. Fails fast without a request when no credential is stored.
    ExportReport,

    /// Clear the stored credential (user logout or forced by a 401).
    /// No network call.
    ClearCredentials,
}
