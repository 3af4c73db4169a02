//! Attendance record model.
//!
//! The backend does not guarantee a uniform shape across records: older
//! deployments name the subject field `user`, newer ones `name`, and the
//! same applies to the time and id fields. Each logical field is therefore
//! resolved through an explicit ordered alias list, and all resolution goes
//! through one lookup function so the fallback order stays a documented
//! contract.
//!
//! Records are read-only from the client's perspective: they are displayed
//! and exported, never created or mutated.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Accepted field names for the subject identity, in fallback order.
pub const SUBJECT_ALIASES: &[&str] = &["name", "user"];

/// Accepted field names for the subject identifier, in fallback order.
pub const SUBJECT_ID_ALIASES: &[&str] = &["user_id", "id"];

/// Accepted field names for the event time, in fallback order.
pub const TIME_ALIASES: &[&str] = &["time", "timestamp"];

/// Accepted field names for the status label.
pub const STATUS_ALIASES: &[&str] = &["status"];

/// Status label assumed when the backend omits one.
///
/// A display default only: the backend records explicit statuses where it
/// has them, and the client must not infer anything further from absence.
pub const DEFAULT_STATUS: &str = "Present";

/// One recognized-attendance event, as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct AttendanceRecord(Map<String, Value>);

impl AttendanceRecord {
    /// Resolves a logical field through its alias list.
    ///
    /// The first alias present with a non-empty string or numeric value
    /// wins; nulls and empty strings fall through to the next alias.
    fn lookup(&self, aliases: &[&str]) -> Option<String> {
        for alias in aliases {
            match self.0.get(*alias) {
                Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
                Some(Value::Number(n)) => return Some(n.to_string()),
                _ => {}
            }
        }
        None
    }

    /// Subject identity (`name`, then `user`).
    pub fn subject(&self) -> Option<String> {
        self.lookup(SUBJECT_ALIASES)
    }

    /// Subject identifier (`user_id`, then `id`).
    pub fn subject_id(&self) -> Option<String> {
        self.lookup(SUBJECT_ID_ALIASES)
    }

    /// Event time (`time`, then `timestamp`).
    pub fn time(&self) -> Option<String> {
        self.lookup(TIME_ALIASES)
    }

    /// Status label, defaulting to [`DEFAULT_STATUS`] when absent.
    pub fn status(&self) -> String {
        self.lookup(STATUS_ALIASES)
            .unwrap_or_else(|| DEFAULT_STATUS.to_string())
    }
}
