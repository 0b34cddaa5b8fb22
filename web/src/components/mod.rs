pub mod calendar_grid;
pub mod day;
pub mod hover_card;
pub mod report_detail;

use chrono::NaiveDate;
use earnings_common::controller::Rect;

/// Viewport bounding box of a rendered element.
pub fn bounding_rect(el: &web_sys::Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect {
        left: r.left(),
        top: r.top(),
        width: r.width(),
        height: r.height(),
    }
}

/// Heading for a day, e.g. `October 15, 2024`.
pub fn day_heading(date: Option<NaiveDate>, fallback: &str) -> String {
    date.map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| fallback.to_string())
}
