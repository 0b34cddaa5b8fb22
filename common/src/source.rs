//! Where a day's reports come from.
//!
//! The grid generator asks a [`ReportLookup`] for each in-month date. Two
//! strategies exist: [`EntryIndex`] over entries read from a monthly data
//! file, and [`SyntheticReports`] for demos, which is seedable so tests stay
//! deterministic.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::grid::{iso_key, MonthCursor};
use crate::model::{CalendarDataEntry, Report};

/// Supplies the reports announced on a given date.
pub trait ReportLookup {
    fn reports_on(&mut self, date: NaiveDate) -> Vec<Report>;
}

/// A source with no reports at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLookup;

impl ReportLookup for EmptyLookup {
    fn reports_on(&mut self, _date: NaiveDate) -> Vec<Report> {
        Vec::new()
    }
}

// ─── Fetched entries ─────────────────────────────────────────────────────────

/// Reports keyed by the exact ISO date string of their entry.
#[derive(Debug, Clone, Default)]
pub struct EntryIndex {
    by_date: HashMap<String, Vec<Report>>,
}

impl EntryIndex {
    /// Index `entries`. When a date appears twice the first entry wins.
    pub fn new(entries: impl IntoIterator<Item = CalendarDataEntry>) -> Self {
        let mut by_date = HashMap::new();
        for entry in entries {
            match by_date.entry(entry.date) {
                Entry::Occupied(o) => {
                    warn!("Duplicate calendar entry for {} ignored", o.key());
                }
                Entry::Vacant(v) => {
                    v.insert(entry.details);
                }
            }
        }
        Self { by_date }
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

impl ReportLookup for EntryIndex {
    fn reports_on(&mut self, date: NaiveDate) -> Vec<Report> {
        self.by_date.get(&iso_key(date)).cloned().unwrap_or_default()
    }
}

// ─── Synthetic ───────────────────────────────────────────────────────────────

/// Industries drawn from when synthesising reports.
pub const INDUSTRIES: [&str; 7] = [
    "Steel",
    "Pharmaceuticals",
    "Airlines",
    "Automotive",
    "Electronics",
    "Chemicals",
    "Finance",
];

/// Chance that a given day has any reports.
pub const DEFAULT_REPORT_PROBABILITY: f64 = 0.3;
/// Upper bound of reports on a synthetic day.
pub const MAX_REPORTS_PER_DAY: usize = 5;
/// Announcement hour of the first report of a day; each later one is an hour on.
const BASE_HOUR: usize = 13;

/// Random demo reports.
///
/// Each day independently has reports with probability `p`; a day with
/// reports gets 1–5 of them, all from one randomly chosen industry.
#[derive(Debug, Clone)]
pub struct SyntheticReports<R = StdRng> {
    rng: R,
    probability: f64,
}

impl SyntheticReports<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SyntheticReports<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            probability: DEFAULT_REPORT_PROBABILITY,
        }
    }

    /// Override the per-day probability (clamped to 0..=1).
    pub fn probability(mut self, p: f64) -> Self {
        self.probability = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self
    }

    /// A whole month in data-file form, one entry per day that has reports.
    pub fn month_entries(&mut self, cursor: MonthCursor) -> Vec<CalendarDataEntry> {
        (1..=cursor.days())
            .filter_map(|day| cursor.date(day))
            .filter_map(|date| {
                let details = self.reports_on(date);
                (!details.is_empty()).then(|| CalendarDataEntry {
                    date: iso_key(date),
                    count: Some(details.len() as u32),
                    details,
                })
            })
            .collect()
    }
}

impl<R: Rng> ReportLookup for SyntheticReports<R> {
    fn reports_on(&mut self, _date: NaiveDate) -> Vec<Report> {
        if !self.rng.random_bool(self.probability) {
            return Vec::new();
        }
        let count = self.rng.random_range(1..=MAX_REPORTS_PER_DAY);
        let industry = INDUSTRIES[self.rng.random_range(0..INDUSTRIES.len())];

        (0..count)
            .map(|i| Report {
                name: format!("{industry} Corp {}", i + 1),
                industry: industry.to_string(),
                time: format!("{}:00", BASE_HOUR + i),
                ..Default::default()
            })
            .collect()
    }
}

// ─── tests ───────────────────────────────────────────────────────────────
