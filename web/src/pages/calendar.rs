//! Calendar page – monthly earnings calendar with hover preview and detail panel.

use chrono::Local;
use earnings_common::controller::{Anchor, CalendarController, Rect, ViewSettings, PREVIEW_GAP};
use earnings_common::grid::MonthCursor;
use earnings_common::model::{CalendarDataEntry, DayCell};
use earnings_common::timer::DismissToken;
use leptos::html::Div;
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::bounding_rect;
use crate::components::calendar_grid::CalendarGrid;
use crate::components::hover_card::HoverPreviewCard;
use crate::components::report_detail::ReportDetailPanel;
use crate::timer::BrowserTimer;

// ─── Server functions ────────────────────────────────────────────────────────

/// Report entries for one month (`month0` is zero-based).
#[server]
pub async fn get_calendar_data(
    year: i32,
    month0: u32,
) -> Result<Vec<CalendarDataEntry>, ServerFnError> {
    let state = use_context::<crate::app::AppState>()
        .ok_or_else(|| ServerFnError::new("Missing AppState"))?;
    Ok(state.data.month_entries(MonthCursor::new(year, month0)).await)
}

#[server]
pub async fn get_view_settings() -> Result<ViewSettings, ServerFnError> {
    let state = use_context::<crate::app::AppState>()
        .ok_or_else(|| ServerFnError::new("Missing AppState"))?;
    Ok(state.data.config().view)
}

// ─── Page component ──────────────────────────────────────────────────────────

/// Month navigation, the day grid, and the preview / detail overlays.
#[component]
pub fn CalendarPage() -> impl IntoView {
    let fired = RwSignal::new(None::<DismissToken>);
    let controller = RwSignal::new(CalendarController::new(
        Local::now().date_naive(),
        BrowserTimer::new(fired),
        ViewSettings::default(),
    ));
    let calendar_ref = NodeRef::<Div>::new();

    // Debounced hover dismissals arrive here from the timer.
    Effect::new(move |_| {
        if let Some(token) = fired.get() {
            controller.update(|c| c.dismiss_elapsed(token));
        }
    });

    // Timing settings, once per mount.
    Effect::new(move |_| {
        spawn_local(async move {
            match get_view_settings().await {
                Ok(settings) => controller.update(|c| c.apply_settings(settings)),
                Err(e) => warn!("Cannot load view settings: {e}"),
            }
        });
    });

    // One data read per displayed month. Failures leave the month empty.
    let cursor = Memo::new(move |_| controller.with(|c| c.cursor()));
    Effect::new(move |_| {
        let month = cursor.get();
        spawn_local(async move {
            let entries = get_calendar_data(month.year, month.month0)
                .await
                .unwrap_or_else(|e| {
                    warn!("Cannot load reports for {month}: {e}");
                    Vec::new()
                });
            controller.try_update(|c| c.set_entries(month, entries));
        });
    });

    on_cleanup(move || {
        controller.try_update(|c| c.cancel_pending());
    });

    let days = Memo::new(move |_| controller.with(|c| c.days().to_vec()));
    let selected = Memo::new(move |_| controller.with(|c| c.selected().and_then(|s| s.date)));
    let preview = Memo::new(move |_| controller.with(|c| c.preview().cloned()));
    let detail = Memo::new(move |_| controller.with(|c| c.detail().cloned()));
    let today = controller.with_untracked(|c| c.today());

    let on_hover = Callback::new(move |target: Option<(DayCell, Rect)>| {
        let container = calendar_ref
            .get_untracked()
            .map(|el| bounding_rect(&el))
            .unwrap_or_default();
        let target = target.map(|(cell, rect)| (cell, Anchor::beside(rect, container, PREVIEW_GAP)));
        controller.update(|c| c.hover(target));
    });
    let on_click = Callback::new(move |cell: DayCell| {
        controller.update(|c| {
            c.click(&cell);
        });
    });
    let hold_preview = Callback::new(move |_: ()| controller.update(|c| c.hold_preview()));
    let leave_preview = Callback::new(move |_: ()| controller.update(|c| c.hover(None)));
    let close_detail = Callback::new(move |_: ()| controller.update(|c| c.dismiss()));

    view! {
        <div class="calendar-page">
            <div class="calendar" class:shifted=move || detail.get().is_some() node_ref=calendar_ref>
                <div class="cal-header">
                    <div class="cal-nav">
                        <button
                            class="cal-nav-btn"
                            aria-label="Previous month"
                            on:click=move |_| controller.update(|c| c.navigate(-1))
                        >
                            "←"
                        </button>
                        <button
                            class="cal-nav-btn"
                            aria-label="Next month"
                            on:click=move |_| controller.update(|c| c.navigate(1))
                        >
                            "→"
                        </button>
                    </div>
                    <h2>{move || cursor.get().label()}</h2>
                </div>

                <CalendarGrid
                    days=days
                    selected=selected
                    today=today
                    on_hover=on_hover
                    on_click=on_click
                />

                {move || preview.get().map(|target| view! {
                    <HoverPreviewCard target=target on_enter=hold_preview on_leave=leave_preview/>
                })}
            </div>

            {move || detail.get().map(|cell| view! {
                <ReportDetailPanel cell=cell on_close=close_detail/>
            })}
        </div>
    }
}
