//! Monthly calendar grid: 6 rows × 7 days, Sunday first.

use chrono::NaiveDate;
use earnings_common::controller::Rect;
use earnings_common::model::DayCell;
use leptos::prelude::*;

use super::day::Day;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Lays out the 42 cells of a month in reading order.
#[component]
pub fn CalendarGrid(
    /// The 42 cells of the displayed month.
    #[prop(into)]
    days: Signal<Vec<DayCell>>,
    /// Date of the selected day, if any.
    #[prop(into)]
    selected: Signal<Option<NaiveDate>>,
    today: NaiveDate,
    on_hover: Callback<Option<(DayCell, Rect)>>,
    on_click: Callback<DayCell>,
) -> impl IntoView {
    let cells = move || {
        days.get()
            .into_iter()
            .map(|cell| {
                let date = cell.date;
                let is_selected = Signal::derive(move || date.is_some() && selected.get() == date);
                let is_today = date == Some(today);
                view! {
                    <Day
                        cell=cell
                        selected=is_selected
                        today=is_today
                        on_hover=on_hover
                        on_click=on_click
                    />
                }
            })
            .collect_view()
    };

    view! {
        <div class="cal-weekdays">
            {WEEKDAYS.iter().map(|d| view! { <span>{*d}</span> }).collect_view()}
        </div>
        <div class="cal-grid">
            {cells}
        </div>
    }
}
