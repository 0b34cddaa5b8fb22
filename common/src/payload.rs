//! Monthly data files: location and normalisation.
//!
//! A file holds either an array of [`CalendarDataEntry`] or a single entry
//! object. Anything unexpected degrades to fewer (or no) entries instead of
//! an error, so a bad file only ever shows up as an empty month.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::grid::MonthCursor;
use crate::model::CalendarDataEntry;

/// File name for `cursor`, e.g. `calendar_202410.json`.
pub fn file_name(cursor: MonthCursor) -> String {
    format!("{}.json", cursor.file_stem())
}

pub fn month_file(dir: &Path, cursor: MonthCursor) -> PathBuf {
    dir.join(file_name(cursor))
}

/// Parse a data file body.
pub fn normalize(text: &str) -> Vec<CalendarDataEntry> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => normalize_value(value),
        Err(e) => {
            warn!("Calendar data is not valid JSON: {e}");
            Vec::new()
        }
    }
}

/// Normalise an already-decoded payload: arrays are taken element by
/// element, a lone object becomes a one-element sequence.
pub fn normalize_value(value: Value) -> Vec<CalendarDataEntry> {
    let items = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => {
            warn!("Unexpected calendar payload type: {}", json_kind(&other));
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<CalendarDataEntry>(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping calendar entry #{i}: {e}");
                None
            }
        })
        .collect()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─── tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::generate_days;
    use crate::source::EntryIndex;

    const OCTOBER: &str = r#"[
        {"date": "2024-10-15", "count": "2", "details": [
            {"tickerName": "Alpha Holdings", "tickerCode": "1301", "fiscalPeriod": "Q2"},
            {"tickerName": "Beta Industries", "tickerCode": "1332", "fiscalPeriod": "Q2"}
        ]}
    ]"#;

    #[test]
    fn test_october_fixture_lands_on_the_15th() {
        let entries = normalize(OCTOBER);
        assert_eq!(entries.len(), 1);
        let cells = generate_days(2024, 9, &mut EntryIndex::new(entries));
        let fifteenth = cells.iter().find(|c| c.label == "15").unwrap();
        assert_eq!(fifteenth.report_count(), 2);
        assert_eq!(fifteenth.reports[0].display_name(), "Alpha Holdings");
        assert_eq!(fifteenth.reports[1].ticker_code, "1332");
        let total: usize = cells.iter().map(|c| c.report_count()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_single_object_is_wrapped() {
        let entries = normalize(r#"{"date":"2024-10-01","count":1,"details":[{"name":"A"}]}"#);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, "2024-10-01");
    }

    #[test]
    fn test_garbage_is_empty() {
        assert!(normalize("not json").is_empty());
        assert!(normalize("42").is_empty());
        assert!(normalize("null").is_empty());
        assert!(normalize("[]").is_empty());
    }

    #[test]
    fn test_bad_elements_are_skipped() {
        let entries = normalize(r#"[1, "x", {"date":"2024-10-02"}, {"date":"2024-10-03","details":[{}]}]"#);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].details.is_empty());
        assert_eq!(entries[1].details.len(), 1);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(MonthCursor::new(2024, 9)), "calendar_202410.json");
        assert_eq!(file_name(MonthCursor::new(2025, 0)), "calendar_202501.json");
    }
}
