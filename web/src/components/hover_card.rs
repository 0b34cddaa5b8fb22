//! Floating preview of a hovered day's reports.

use earnings_common::controller::HoverTarget;
use leptos::prelude::*;

use super::day_heading;

/// Compact list of the hovered day's reports, placed next to the day.
///
/// Entering the card keeps it open; leaving it starts the usual debounced
/// dismissal.
#[component]
pub fn HoverPreviewCard(
    target: HoverTarget,
    on_enter: Callback<()>,
    on_leave: Callback<()>,
) -> impl IntoView {
    let style = format!(
        "left: {:.0}px; top: {:.0}px;",
        target.anchor.left, target.anchor.top
    );
    let heading = day_heading(target.cell.date, &target.cell.label);
    let items = target
        .cell
        .reports
        .iter()
        .map(|r| {
            let name = r.display_name().to_string();
            let when = r.when().to_string();
            view! {
                <li>
                    <span class="preview-name">{name}</span>
                    {(!when.is_empty()).then(|| view! { <span class="preview-time">{when}</span> })}
                </li>
            }
        })
        .collect_view();

    view! {
        <div
            class="hover-card"
            style=style
            on:mouseenter=move |_| on_enter.run(())
            on:mouseleave=move |_| on_leave.run(())
        >
            <h3>{heading}</h3>
            <ul class="preview-list">{items}</ul>
        </div>
    }
}
