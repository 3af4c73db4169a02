//! UI event types.
//!
//! Events are everything that can reach the reducer: terminal input, the
//! animation tick, and completions of async work spawned by the runtime.

use std::path::PathBuf;

use muster_core::api::ApiError;
use muster_core::credentials::StoredSession;
use muster_core::records::AttendanceRecord;

/// A failed export, split by where it failed.
#[derive(Debug)]
pub enum ExportError {
    /// The request itself failed (classified).
    Api(ApiError),
    /// The report arrived but could not be written to disk.
    Io(String),
}

/// Events consumed by the reducer.
pub enum UiEvent {
    /// Animation tick.
    Tick,
    /// Raw terminal input.
    Terminal(crossterm::event::Event),
    /// Login exchange finished. On success the credential is already
    /// persisted.
    LoginFinished(Result<StoredSession, ApiError>),
    /// Record fetch finished.
    RecordsLoaded(Result<Vec<AttendanceRecord>, ApiError>),
    /// Export finished; on success carries the written file path.
    ExportFinished(Result<PathBuf, ExportError>),
}
