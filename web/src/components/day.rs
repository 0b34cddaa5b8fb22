//! A single square of the month grid.

use earnings_common::controller::Rect;
use earnings_common::model::DayCell;
use leptos::html::Div;
use leptos::prelude::*;

use super::bounding_rect;

/// Renders one day with its report-count badge.
///
/// Pointer-enter reports the cell and its on-screen box through `on_hover`,
/// pointer-leave reports `None`. Clicks on days without reports are dropped.
#[component]
pub fn Day(
    cell: DayCell,
    /// Whether this day is open in the detail panel.
    #[prop(into)]
    selected: Signal<bool>,
    /// Whether this day is the real current date.
    today: bool,
    on_hover: Callback<Option<(DayCell, Rect)>>,
    on_click: Callback<DayCell>,
) -> impl IntoView {
    let node = NodeRef::<Div>::new();
    let count = cell.report_count();
    let label = (!cell.is_placeholder()).then(|| cell.label.clone());

    let mut base_class = cell.style_class.clone();
    if count > 0 {
        base_class.push_str(" has-reports");
    }
    if today {
        base_class.push_str(" today");
    }
    let class = move || {
        if selected.get() {
            format!("{base_class} selected")
        } else {
            base_class.clone()
        }
    };

    let id = format!("day-{}", cell.label);
    let hovered = cell.clone();
    let on_enter = move |_| {
        let rect = node
            .get_untracked()
            .map(|el| bounding_rect(&el))
            .unwrap_or_default();
        on_hover.run(Some((hovered.clone(), rect)));
    };
    let on_cell_click = move |_| {
        if cell.has_reports() {
            on_click.run(cell.clone());
        }
    };

    view! {
        <div
            node_ref=node
            id=id
            class=class
            on:mouseenter=on_enter
            on:mouseleave=move |_| on_hover.run(None)
            on:click=on_cell_click
        >
            <span class="cal-day-num">{label}</span>
            {(count > 0).then(|| view! { <span class="cal-badge">{count}</span> })}
        </div>
    }
}
