//! Month grid generation.
//!
//! A month is always laid out as 6 weeks × 7 days, Sunday first. Days of the
//! previous and next month are represented by placeholder cells labelled with
//! a signed offset so the grid has a stable shape.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::DayCell;
use crate::source::ReportLookup;

/// Number of cells in every rendered month.
pub const GRID_CELLS: usize = 42;

/// Style class of in-month cells.
pub const DAY_CLASS: &str = "cal-cell";
/// Style class of adjacent-month placeholders.
pub const PLACEHOLDER_CLASS: &str = "cal-cell muted";

// ─── Month cursor ────────────────────────────────────────────────────────────

/// A (year, zero-based month) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthCursor {
    pub year: i32,
    /// 0 = January … 11 = December.
    pub month0: u32,
}

impl MonthCursor {
    /// Build a cursor, carrying months ≥ 12 into the year.
    pub fn new(year: i32, month0: u32) -> Self {
        Self::from_index(i64::from(year) * 12 + i64::from(month0))
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// Move by `delta` months, wrapping December ↔ January across years.
    pub fn shifted(self, delta: i32) -> Self {
        Self::from_index(self.index() + i64::from(delta))
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(self, other: MonthCursor) -> i64 {
        other.index() - self.index()
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    pub fn days(self) -> u32 {
        days_in_month(self.year, self.month0)
    }

    /// Date of day `day` (1-based) of this month, if representable.
    pub fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, day)
    }

    /// Stem of the monthly data file, e.g. `calendar_202410`.
    pub fn file_stem(self) -> String {
        format!("calendar_{:04}{:02}", self.year, self.month0 + 1)
    }

    /// Heading text, e.g. `October 2024`.
    pub fn label(self) -> String {
        format!("{} {}", month_label(self.month0), self.year)
    }

    fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month0)
    }

    fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month0: index.rem_euclid(12) as u32,
        }
    }
}

impl std::fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month0 + 1)
    }
}

// ─── Generator ───────────────────────────────────────────────────────────────

/// Lay out the 42 cells of (`year`, `month0`), filling in-month days with
/// whatever `lookup` has for that date.
pub fn generate_days<L: ReportLookup + ?Sized>(year: i32, month0: u32, lookup: &mut L) -> Vec<DayCell> {
    let cursor = MonthCursor::new(year, month0);
    let leading = first_weekday(cursor.year, cursor.month0);
    let days = cursor.days();

    let mut cells = Vec::with_capacity(GRID_CELLS);

    for i in 0..leading {
        cells.push(placeholder(format!("-{}", leading - i)));
    }

    for day in 1..=days {
        let date = cursor.date(day);
        let reports = date.map(|d| lookup.reports_on(d)).unwrap_or_default();
        cells.push(DayCell {
            label: format!("{day:02}"),
            style_class: DAY_CLASS.to_string(),
            date,
            reports,
        });
    }

    let trailing = GRID_CELLS - cells.len();
    for i in 1..=trailing {
        cells.push(placeholder(format!("+{i}")));
    }

    cells
}

fn placeholder(label: String) -> DayCell {
    DayCell {
        label,
        style_class: PLACEHOLDER_CLASS.to_string(),
        date: None,
        reports: Vec::new(),
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// ISO `YYYY-MM-DD` key used to match data-file entries.
pub fn iso_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn month_label(month0: u32) -> &'static str {
    match month0 {
        0 => "January", 1 => "February", 2 => "March", 3 => "April",
        4 => "May", 5 => "June", 6 => "July", 7 => "August",
        8 => "September", 9 => "October", 10 => "November", 11 => "December",
        _ => "?",
    }
}

/// Returns 0 = Sunday … 6 = Saturday for the 1st of the given month.
pub fn first_weekday(year: i32, month0: u32) -> u32 {
    // Tomohiko Sakamoto's algorithm
    const T: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let m = (month0 % 12) as usize;
    let y = if m < 2 { i64::from(year) - 1 } else { i64::from(year) };
    let dow = y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400) + T[m] + 1;
    dow.rem_euclid(7) as u32
}

pub fn days_in_month(year: i32, month0: u32) -> u32 {
    match month0 % 12 {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        _ => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
    }
}

// ─── tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CalendarDataEntry, Report};
    use crate::source::{EmptyLookup, EntryIndex, SyntheticReports};

    fn leading(cells: &[DayCell]) -> usize {
        cells.iter().take_while(|c| c.label.starts_with('-')).count()
    }

    #[test]
    fn test_always_42_cells() {
        for year in 1999..=2030 {
            for month0 in 0..12 {
                let cells = generate_days(year, month0, &mut EmptyLookup);
                assert_eq!(cells.len(), GRID_CELLS, "{year}-{month0}");
            }
        }
    }

    #[test]
    fn test_in_month_cells_match_month_length() {
        for year in [1900, 2000, 2023, 2024] {
            for month0 in 0..12 {
                let cells = generate_days(year, month0, &mut EmptyLookup);
                let in_month = cells.iter().filter(|c| !c.is_placeholder()).count();
                let expected = MonthCursor::new(year, month0).date(1).unwrap();
                let next = MonthCursor::new(year, month0).shifted(1).date(1).unwrap();
                assert_eq!(in_month as i64, (next - expected).num_days());
            }
        }
        let feb = generate_days(2024, 1, &mut EmptyLookup);
        assert_eq!(feb.iter().filter(|c| !c.is_placeholder()).count(), 29);
        assert_eq!(feb.iter().filter(|c| c.is_placeholder()).count(), 13);
        let feb = generate_days(1900, 1, &mut EmptyLookup);
        assert_eq!(feb.iter().filter(|c| !c.is_placeholder()).count(), 28);
    }

    #[test]
    fn test_leading_count_is_weekday_of_first() {
        for year in 2020..=2026 {
            for month0 in 0..12 {
                let first = MonthCursor::new(year, month0).date(1).unwrap();
                let cells = generate_days(year, month0, &mut EmptyLookup);
                assert_eq!(
                    leading(&cells) as u32,
                    first.weekday().num_days_from_sunday(),
                    "{year}-{month0}"
                );
            }
        }
    }

    #[test]
    fn test_october_2024_layout() {
        let cells = generate_days(2024, 9, &mut EmptyLookup);
        assert_eq!(leading(&cells), 2);
        assert_eq!(cells[0].label, "-2");
        assert_eq!(cells[1].label, "-1");
        assert_eq!(cells[2].label, "01");
        assert_eq!(cells[32].label, "31");
        assert_eq!(cells[33].label, "+1");
        assert_eq!(cells[41].label, "+9");
        assert_eq!(cells.iter().filter(|c| c.label.starts_with('+')).count(), 9);
        assert!(cells.iter().filter(|c| c.is_placeholder()).all(|c| c.style_class == PLACEHOLDER_CLASS));
        assert!(cells.iter().filter(|c| !c.is_placeholder()).all(|c| c.style_class == DAY_CLASS));
    }

    #[test]
    fn test_six_full_weeks_month() {
        // August 2026 starts on a Saturday and has 31 days.
        let cells = generate_days(2026, 7, &mut EmptyLookup);
        assert_eq!(leading(&cells), 6);
        assert_eq!(cells.iter().filter(|c| c.label.starts_with('+')).count(), 5);
        // February 2015 starts on a Sunday and has 28 days.
        let cells = generate_days(2015, 1, &mut EmptyLookup);
        assert_eq!(leading(&cells), 0);
        assert_eq!(cells.iter().filter(|c| c.label.starts_with('+')).count(), 14);
    }

    #[test]
    fn test_reports_come_from_matching_entry_only() {
        let reports = vec![
            Report { name: "A".into(), ..Default::default() },
            Report { name: "B".into(), ..Default::default() },
        ];
        let mut index = EntryIndex::new(vec![CalendarDataEntry {
            date: "2024-10-15".into(),
            count: Some(2),
            details: reports.clone(),
        }]);
        let cells = generate_days(2024, 9, &mut index);
        for cell in &cells {
            if cell.label == "15" {
                assert_eq!(cell.reports, reports);
            } else {
                assert!(cell.reports.is_empty(), "{}", cell.label);
            }
        }
    }

    #[test]
    fn test_placeholders_never_carry_reports() {
        let mut synthetic = SyntheticReports::seeded(7).probability(1.0);
        let cells = generate_days(2024, 9, &mut synthetic);
        assert_eq!(cells.len(), GRID_CELLS);
        assert!(cells.iter().filter(|c| c.is_placeholder()).all(|c| c.reports.is_empty()));
        assert!(cells.iter().filter(|c| !c.is_placeholder()).all(|c| c.has_reports()));
    }

    #[test]
    fn test_cursor_wraps_years() {
        let dec = MonthCursor::new(2024, 11);
        assert_eq!(dec.shifted(1), MonthCursor { year: 2025, month0: 0 });
        assert_eq!(dec.shifted(1).shifted(-1), dec);
        assert_eq!(MonthCursor::new(2024, 0).shifted(-1), MonthCursor { year: 2023, month0: 11 });
        assert_eq!(MonthCursor::new(2024, 14), MonthCursor { year: 2025, month0: 2 });
        assert_eq!(dec.shifted(-24), MonthCursor { year: 2022, month0: 11 });
        assert_eq!(dec.months_until(dec.shifted(-24)), -24);
        assert_eq!(MonthCursor::new(2024, 10).months_until(MonthCursor::new(2025, 1)), 3);
    }

    #[test]
    fn test_cursor_names() {
        let oct = MonthCursor::new(2024, 9);
        assert_eq!(oct.file_stem(), "calendar_202410");
        assert_eq!(oct.label(), "October 2024");
        assert_eq!(oct.to_string(), "2024-10");
        assert_eq!(iso_key(oct.date(5).unwrap()), "2024-10-05");
    }
}
