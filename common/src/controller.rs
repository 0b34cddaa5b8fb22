//! Calendar view state: month cursor, selection, hover and the pending hover
//! dismissal.
//!
//! The controller is framework-free. The web front-end keeps one inside a
//! reactive signal and forwards pointer events to it; everything it renders
//! (`days`, `preview`, `detail`) is read back from here.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::{generate_days, MonthCursor};
use crate::model::{CalendarDataEntry, DayCell};
use crate::source::EntryIndex;
use crate::timer::{DebounceTimer, DismissToken};

/// Default delay before a hover preview closes.
pub const DEFAULT_DISMISS_DELAY_MS: u64 = 100;

/// Horizontal gap between a hovered cell and its preview card.
pub const PREVIEW_GAP: f64 = 8.0;

// ─── Geometry ────────────────────────────────────────────────────────────────

/// A bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Position of the preview card relative to the calendar's own box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    pub left: f64,
    pub top: f64,
}

impl Anchor {
    /// Place the card to the right of `cell`, top-aligned with it.
    pub fn beside(cell: Rect, container: Rect, gap: f64) -> Self {
        Self {
            left: cell.left - container.left + cell.width + gap,
            top: cell.top - container.top,
        }
    }
}

// ─── Settings ────────────────────────────────────────────────────────────────

/// Whether the hover card may show while the detail panel is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoverPolicy {
    #[default]
    Coexist,
    SuppressWhileSelected,
}

impl std::str::FromStr for HoverPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coexist" => Ok(Self::Coexist),
            "suppress" | "suppress_while_selected" => Ok(Self::SuppressWhileSelected),
            other => Err(format!("unknown hover policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub dismiss_delay_ms: u64,
    pub policy: HoverPolicy,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            dismiss_delay_ms: DEFAULT_DISMISS_DELAY_MS,
            policy: HoverPolicy::default(),
        }
    }
}

// ─── Controller ──────────────────────────────────────────────────────────────

/// The hovered cell and where its preview goes.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverTarget {
    pub cell: DayCell,
    pub anchor: Anchor,
}

struct PendingDismiss<H> {
    token: DismissToken,
    handle: H,
}

pub struct CalendarController<T: DebounceTimer> {
    cursor: MonthCursor,
    today: NaiveDate,
    index: EntryIndex,
    days: Vec<DayCell>,
    selected: Option<DayCell>,
    hovered: Option<HoverTarget>,
    pending: Option<PendingDismiss<T::Handle>>,
    next_token: u64,
    timer: T,
    settings: ViewSettings,
}

impl<T: DebounceTimer> CalendarController<T> {
    /// Start on the month containing `today`, with no reports yet.
    pub fn new(today: NaiveDate, timer: T, settings: ViewSettings) -> Self {
        let cursor = MonthCursor::of(today);
        let mut index = EntryIndex::default();
        let days = generate_days(cursor.year, cursor.month0, &mut index);
        Self {
            cursor,
            today,
            index,
            days,
            selected: None,
            hovered: None,
            pending: None,
            next_token: 0,
            timer,
            settings,
        }
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn days(&self) -> &[DayCell] {
        &self.days
    }

    pub fn selected(&self) -> Option<&DayCell> {
        self.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<&HoverTarget> {
        self.hovered.as_ref()
    }

    pub fn settings(&self) -> ViewSettings {
        self.settings
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn has_pending_dismiss(&self) -> bool {
        self.pending.is_some()
    }

    pub fn apply_settings(&mut self, settings: ViewSettings) {
        self.settings = settings;
    }

    /// Install the entries fetched for `cursor`.
    ///
    /// Returns `false` (and changes nothing) when the user has already moved
    /// to another month.
    pub fn set_entries(&mut self, cursor: MonthCursor, entries: Vec<CalendarDataEntry>) -> bool {
        if cursor != self.cursor {
            debug!("Dropping late calendar data for {cursor} (showing {})", self.cursor);
            return false;
        }
        self.index = EntryIndex::new(entries);
        self.rebuild();

        // Re-resolve against the fresh cells so stale copies never render.
        self.selected = self
            .selected
            .take()
            .and_then(|s| self.find(s.date))
            .filter(DayCell::has_reports);
        if let Some(h) = self.hovered.take() {
            self.hovered = self.find(h.cell.date).map(|cell| HoverTarget {
                cell,
                anchor: h.anchor,
            });
        }

        self.select_today();
        true
    }

    /// Move `delta` months. Selection and hover never carry over.
    pub fn navigate(&mut self, delta: i32) {
        self.cursor = self.cursor.shifted(delta);
        self.index = EntryIndex::default();
        self.rebuild();
        self.cancel_pending();
        self.selected = None;
        self.hovered = None;
        self.select_today();
    }

    /// Pointer entered a cell (`Some`) or left it (`None`).
    pub fn hover(&mut self, target: Option<(DayCell, Anchor)>) {
        match target {
            Some((cell, anchor)) => {
                self.cancel_pending();
                self.hovered = Some(HoverTarget { cell, anchor });
            }
            None => self.schedule_dismiss(),
        }
    }

    /// Pointer entered the preview card: keep it open.
    pub fn hold_preview(&mut self) {
        self.cancel_pending();
    }

    /// A scheduled dismissal fired.
    pub fn dismiss_elapsed(&mut self, token: DismissToken) {
        if self.pending.as_ref().is_some_and(|p| p.token == token) {
            self.pending = None;
            self.hovered = None;
        } else {
            debug!("Ignoring stale dismissal {token:?}");
        }
    }

    /// Open the detail panel for `cell`. Cells without reports are ignored.
    pub fn click(&mut self, cell: &DayCell) -> bool {
        if !cell.has_reports() {
            return false;
        }
        self.selected = Some(cell.clone());
        self.cancel_pending();
        self.hovered = None;
        true
    }

    /// Close the detail panel.
    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    /// The hover card to show, if any.
    pub fn preview(&self) -> Option<&HoverTarget> {
        let suppressed =
            self.settings.policy == HoverPolicy::SuppressWhileSelected && self.selected.is_some();
        self.hovered
            .as_ref()
            .filter(|h| h.cell.has_reports() && !suppressed)
    }

    /// The day to show in the detail panel, if any.
    pub fn detail(&self) -> Option<&DayCell> {
        self.selected.as_ref().filter(|c| c.has_reports())
    }

    pub fn is_selected(&self, cell: &DayCell) -> bool {
        cell.date.is_some() && self.selected.as_ref().map(|s| s.date) == Some(cell.date)
    }

    /// Only in-month cells can be today; placeholders reuse day numbers.
    pub fn is_today(&self, cell: &DayCell) -> bool {
        cell.date == Some(self.today)
    }

    /// Drop any scheduled dismissal, e.g. when the view unmounts.
    pub fn cancel_pending(&mut self) {
        if let Some(p) = self.pending.take() {
            self.timer.cancel(p.handle);
        }
    }

    fn schedule_dismiss(&mut self) {
        self.cancel_pending();
        if self.hovered.is_none() {
            return;
        }
        self.next_token += 1;
        let token = DismissToken::new(self.next_token);
        let delay = Duration::from_millis(self.settings.dismiss_delay_ms);
        match self.timer.schedule(delay, token) {
            Some(handle) => self.pending = Some(PendingDismiss { token, handle }),
            None => self.hovered = None,
        }
    }

    fn rebuild(&mut self) {
        self.days = generate_days(self.cursor.year, self.cursor.month0, &mut self.index);
    }

    fn find(&self, date: Option<NaiveDate>) -> Option<DayCell> {
        let date = date?;
        self.days.iter().find(|c| c.date == Some(date)).cloned()
    }

    fn select_today(&mut self) {
        if self.selected.is_some() || !self.cursor.contains(self.today) {
            return;
        }
        self.selected = self.find(Some(self.today)).filter(DayCell::has_reports);
    }
}

impl<T: DebounceTimer> Drop for CalendarController<T> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

// ─── tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Report;
    use crate::timer::ImmediateTimer;

    /// Records what the controller asked for; nothing fires on its own.
    #[derive(Default)]
    struct ManualTimer {
        scheduled: Vec<(Duration, DismissToken, u32)>,
        cancelled: Vec<u32>,
        next_handle: u32,
    }

    impl ManualTimer {
        fn last_token(&self) -> DismissToken {
            self.scheduled.last().unwrap().1
        }
    }

    impl DebounceTimer for ManualTimer {
        type Handle = u32;

        fn schedule(&mut self, delay: Duration, token: DismissToken) -> Option<u32> {
            self.next_handle += 1;
            self.scheduled.push((delay, token, self.next_handle));
            Some(self.next_handle)
        }

        fn cancel(&mut self, handle: u32) {
            self.cancelled.push(handle);
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(day: &str, n: usize) -> CalendarDataEntry {
        CalendarDataEntry {
            date: day.into(),
            count: Some(n as u32),
            details: (0..n)
                .map(|i| Report { name: format!("Co {i}"), ..Default::default() })
                .collect(),
        }
    }

    fn october() -> CalendarController<ManualTimer> {
        let mut c = CalendarController::new(date(2024, 10, 3), ManualTimer::default(), ViewSettings::default());
        c.set_entries(
            MonthCursor::new(2024, 9),
            vec![entry("2024-10-15", 2), entry("2024-10-20", 1)],
        );
        c
    }

    fn cell(c: &CalendarController<ManualTimer>, label: &str) -> DayCell {
        c.days().iter().find(|d| d.label == label).unwrap().clone()
    }

    #[test]
    fn test_starts_on_todays_month() {
        let c = october();
        assert_eq!(c.cursor(), MonthCursor::new(2024, 9));
        assert_eq!(c.days().len(), 42);
        assert_eq!(cell(&c, "15").report_count(), 2);
        assert!(c.selected().is_none());
    }

    #[test]
    fn test_click_without_reports_is_noop() {
        let mut c = october();
        assert!(!c.click(&cell(&c, "14")));
        assert!(c.selected().is_none());

        c.click(&cell(&c, "15"));
        assert!(!c.click(&cell(&c, "16")));
        assert_eq!(c.selected().unwrap().label, "15");
        assert!(!c.click(&cell(&c, "+1")));
        assert_eq!(c.selected().unwrap().label, "15");
    }

    #[test]
    fn test_click_selects_and_clears_hover_immediately() {
        let mut c = october();
        let fifteenth = cell(&c, "15");
        c.hover(Some((fifteenth.clone(), Anchor::default())));
        c.hover(None);
        assert!(c.has_pending_dismiss());

        assert!(c.click(&fifteenth));
        assert!(c.hovered().is_none());
        assert!(!c.has_pending_dismiss());
        assert_eq!(c.timer().cancelled, vec![1]);
        assert!(c.is_selected(&fifteenth));
        assert!(!c.is_selected(&cell(&c, "20")));

        c.click(&cell(&c, "20"));
        assert!(!c.is_selected(&fifteenth));
        assert_eq!(c.detail().unwrap().label, "20");
    }

    #[test]
    fn test_new_hover_cancels_stale_dismissal() {
        let mut c = october();
        c.hover(Some((cell(&c, "15"), Anchor::default())));
        c.hover(None);
        let stale = c.timer().last_token();

        c.hover(Some((cell(&c, "20"), Anchor { left: 10.0, top: 20.0 })));
        assert_eq!(c.timer().cancelled, vec![1]);
        assert!(!c.has_pending_dismiss());

        c.dismiss_elapsed(stale);
        assert_eq!(c.hovered().unwrap().cell.label, "20");
        assert_eq!(c.preview().unwrap().anchor, Anchor { left: 10.0, top: 20.0 });
    }

    #[test]
    fn test_dismissal_fires_after_delay() {
        let mut c = october();
        c.hover(Some((cell(&c, "15"), Anchor::default())));
        c.hover(None);
        assert!(c.hovered().is_some());
        let (delay, token, _) = c.timer().scheduled[0];
        assert_eq!(delay, Duration::from_millis(100));

        c.dismiss_elapsed(token);
        assert!(c.hovered().is_none());
        assert!(c.preview().is_none());
    }

    #[test]
    fn test_card_hover_holds_preview() {
        let mut c = october();
        c.hover(Some((cell(&c, "15"), Anchor::default())));
        c.hover(None);
        let token = c.timer().last_token();
        c.hold_preview();
        c.dismiss_elapsed(token);
        assert!(c.preview().is_some());

        // Leaving the card goes through the normal dismissal path.
        c.hover(None);
        c.dismiss_elapsed(c.timer().last_token());
        assert!(c.preview().is_none());
    }

    #[test]
    fn test_leave_without_hover_schedules_nothing() {
        let mut c = october();
        c.hover(None);
        assert!(c.timer().scheduled.is_empty());
    }

    #[test]
    fn test_preview_requires_reports() {
        let mut c = october();
        c.hover(Some((cell(&c, "14"), Anchor::default())));
        assert!(c.hovered().is_some());
        assert!(c.preview().is_none());
    }

    #[test]
    fn test_hover_policy() {
        let mut c = october();
        c.click(&cell(&c, "20"));
        c.hover(Some((cell(&c, "15"), Anchor::default())));
        assert!(c.preview().is_some());

        c.apply_settings(ViewSettings {
            policy: HoverPolicy::SuppressWhileSelected,
            ..ViewSettings::default()
        });
        assert!(c.preview().is_none());
        c.dismiss();
        assert!(c.preview().is_some());
    }

    #[test]
    fn test_navigate_wraps_and_clears_state() {
        let mut c = CalendarController::new(date(2024, 12, 1), ManualTimer::default(), ViewSettings::default());
        c.set_entries(MonthCursor::new(2024, 11), vec![entry("2024-12-10", 1)]);
        let tenth = cell(&c, "10");
        c.click(&tenth);
        c.hover(Some((tenth.clone(), Anchor::default())));
        c.hover(None);

        c.navigate(1);
        assert_eq!(c.cursor(), MonthCursor { year: 2025, month0: 0 });
        assert!(c.selected().is_none());
        assert!(c.hovered().is_none());
        assert!(!c.has_pending_dismiss());
        assert!(c.days().iter().all(|d| d.reports.is_empty()));

        c.navigate(-2);
        assert_eq!(c.cursor(), MonthCursor { year: 2024, month0: 10 });
    }

    #[test]
    fn test_late_entries_are_dropped() {
        let mut c = october();
        c.navigate(1);
        assert!(!c.set_entries(MonthCursor::new(2024, 9), vec![entry("2024-10-01", 3)]));
        assert!(c.days().iter().all(|d| d.reports.is_empty()));
    }

    #[test]
    fn test_today_auto_selected_when_it_has_reports() {
        let mut c = CalendarController::new(date(2024, 10, 15), ManualTimer::default(), ViewSettings::default());
        assert!(c.selected().is_none());
        c.set_entries(MonthCursor::new(2024, 9), vec![entry("2024-10-15", 2)]);
        assert_eq!(c.detail().unwrap().label, "15");

        c.dismiss();
        c.navigate(1);
        assert!(c.selected().is_none());
        c.navigate(-1);
        c.set_entries(MonthCursor::new(2024, 9), vec![entry("2024-10-15", 2)]);
        assert_eq!(c.detail().unwrap().label, "15");
    }

    #[test]
    fn test_today_only_matches_current_month() {
        let mut c = october();
        assert!(c.is_today(&cell(&c, "03")));
        assert!(!c.is_today(&cell(&c, "04")));
        c.navigate(1);
        // November 3rd shares the label but is not today.
        assert!(!c.is_today(&cell(&c, "03")));
        assert!(c.days().iter().all(|d| !c.is_today(d)));
    }

    #[test]
    fn test_refetch_refreshes_selection() {
        let mut c = october();
        c.click(&cell(&c, "15"));
        c.set_entries(MonthCursor::new(2024, 9), vec![entry("2024-10-15", 4)]);
        assert_eq!(c.detail().unwrap().report_count(), 4);
        c.set_entries(MonthCursor::new(2024, 9), vec![]);
        assert!(c.detail().is_none());
    }

    #[test]
    fn test_cancel_pending_clears_timer() {
        let mut c = october();
        c.hover(Some((cell(&c, "15"), Anchor::default())));
        c.hover(None);
        c.cancel_pending();
        assert_eq!(c.timer().cancelled, vec![1]);
    }

    #[test]
    fn test_immediate_timer_dismisses_at_once() {
        let mut c = CalendarController::new(date(2024, 10, 3), ImmediateTimer, ViewSettings::default());
        c.set_entries(MonthCursor::new(2024, 9), vec![entry("2024-10-15", 1)]);
        let fifteenth = c.days().iter().find(|d| d.label == "15").unwrap().clone();
        c.hover(Some((fifteenth, Anchor::default())));
        c.hover(None);
        assert!(c.hovered().is_none());
        assert!(!c.has_pending_dismiss());
    }

    #[test]
    fn test_anchor_beside_cell() {
        let container = Rect { left: 100.0, top: 50.0, width: 400.0, height: 400.0 };
        let cell = Rect { left: 160.0, top: 110.0, width: 48.0, height: 48.0 };
        assert_eq!(
            Anchor::beside(cell, container, PREVIEW_GAP),
            Anchor { left: 116.0, top: 60.0 }
        );
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Coexist".parse::<HoverPolicy>(), Ok(HoverPolicy::Coexist));
        assert_eq!("suppress".parse::<HoverPolicy>(), Ok(HoverPolicy::SuppressWhileSelected));
        assert!("sometimes".parse::<HoverPolicy>().is_err());
    }
}
