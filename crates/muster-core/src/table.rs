//! Row projection and filtering for the attendance table.
//!
//! Projection is pure: the same record set always projects to the same rows,
//! and the input is never mutated. Each fetch replaces the previous row set
//! wholesale; there is no incremental diffing. The terminal frontends
//! (comfy-table in the CLI, ratatui in the dashboard) only draw what is
//! projected here.

use crate::records::AttendanceRecord;

/// Placeholder glyph shown when a record is missing a display field.
pub const MISSING_FIELD: &str = "—";

/// Text of the placeholder row rendered for an empty record set.
pub const NO_RECORDS: &str = "No attendance records found.";

/// Column headers, in display order.
pub const HEADERS: [&str; 5] = ["#", "Name", "ID", "Time", "Status"];

/// Display-only projection of one attendance record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// 1-based position within the rendered set.
    pub index: usize,
    /// Subject identity, or [`MISSING_FIELD`].
    pub subject: String,
    /// Subject identifier, or [`MISSING_FIELD`].
    pub subject_id: String,
    /// Event time, or [`MISSING_FIELD`].
    pub time: String,
    /// Status label (already defaulted).
    pub status: String,
    /// Whether the row passes the current filter.
    pub visible: bool,
    /// True for the single "no records" row of an empty set.
    pub placeholder: bool,
}

impl DisplayRow {
    fn from_record(index: usize, record: &AttendanceRecord) -> Self {
        let or_missing = |value: Option<String>| value.unwrap_or_else(|| MISSING_FIELD.to_string());
        Self {
            index,
            subject: or_missing(record.subject()),
            subject_id: or_missing(record.subject_id()),
            time: or_missing(record.time()),
            status: record.status(),
            visible: true,
            placeholder: false,
        }
    }

    fn no_records() -> Self {
        Self {
            index: 0,
            subject: NO_RECORDS.to_string(),
            subject_id: String::new(),
            time: String::new(),
            status: String::new(),
            visible: true,
            placeholder: true,
        }
    }
}

/// Projects a record set into display rows, in input order, 1-indexed.
///
/// An empty record set projects to exactly one placeholder row so the table
/// never renders silently empty.
pub fn project_rows(records: &[AttendanceRecord]) -> Vec<DisplayRow> {
    if records.is_empty() {
        return vec![DisplayRow::no_records()];
    }

    records
        .iter()
        .enumerate()
        .map(|(i, record)| DisplayRow::from_record(i + 1, record))
        .collect()
}

/// Toggles row visibility by case-insensitive substring match on the
/// subject cell. The empty query shows every row.
///
/// Purely local: operates on already-projected rows, never the backend.
/// The placeholder row is not subject to filtering.
pub fn apply_filter(rows: &mut [DisplayRow], query: &str) {
    let needle = query.to_lowercase();
    for row in rows {
        row.visible = row.placeholder || row.subject.to_lowercase().contains(&needle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(json: &str) -> Vec<AttendanceRecord> {
        serde_json::from_str(json).unwrap()
    }

    /// Test: projecting the same record set twice yields identical rows.
    #[test]
    fn test_projection_is_idempotent() {
        let set = records(r#"[{"name":"Alice","time":"09:00"},{"user":"Bob"}]"#);
        assert_eq!(project_rows(&set), project_rows(&set));
    }

    /// Test: the empty set projects to exactly one placeholder row.
    #[test]
    fn test_empty_set_placeholder_row() {
        let rows = project_rows(&[]);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].placeholder);
        assert_eq!(rows[0].subject, NO_RECORDS);
    }

    /// Test: rows keep input order and are 1-indexed.
    #[test]
    fn test_rows_in_input_order() {
        let set = records(r#"[{"name":"C"},{"name":"A"},{"name":"B"}]"#);
        let rows = project_rows(&set);
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(rows[0].subject, "C");
        assert_eq!(rows[2].subject, "B");
    }

    /// Test: alias fallback and status default survive projection.
    #[test]
    fn test_fallbacks_and_status_default() {
        let set = records(r#"[{"name":"A","status":"present"},{"user":"B"}]"#);
        let rows = project_rows(&set);

        assert_eq!(rows[0].subject, "A");
        assert_eq!(rows[0].status, "present");

        assert_eq!(rows[1].subject, "B");
        assert_eq!(rows[1].status, "Present");
        assert_eq!(rows[1].time, MISSING_FIELD);
        assert_eq!(rows[1].subject_id, MISSING_FIELD);
    }

    /// Test: filter matches case-insensitively on the subject cell.
    #[test]
    fn test_filter_case_insensitive() {
        let set = records(r#"[{"name":"Alice"},{"name":"Bob"},{"user":"alicia"}]"#);
        let mut rows = project_rows(&set);

        apply_filter(&mut rows, "ALI");
        assert_eq!(
            rows.iter().map(|r| r.visible).collect::<Vec<_>>(),
            vec![true, false, true]
        );

        apply_filter(&mut rows, "nobody");
        assert!(rows.iter().all(|r| !r.visible));
    }

    /// Test: the empty query shows every row again.
    #[test]
    fn test_empty_query_shows_all() {
        let set = records(r#"[{"name":"Alice"},{"name":"Bob"}]"#);
        let mut rows = project_rows(&set);

        apply_filter(&mut rows, "alice");
        apply_filter(&mut rows, "");
        assert!(rows.iter().all(|r| r.visible));
    }

    /// Test: the placeholder row ignores the filter.
    #[test]
    fn test_placeholder_ignores_filter() {
        let mut rows = project_rows(&[]);
        apply_filter(&mut rows, "zzz");
        assert!(rows[0].visible);
    }
}
