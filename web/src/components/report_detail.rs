//! Slide-in panel with the full reports of the selected day.

use earnings_common::model::{DayCell, Report};
use leptos::prelude::*;

use super::day_heading;

/// Header, close button and one [`ReportDetail`] per report.
#[component]
pub fn ReportDetailPanel(cell: DayCell, on_close: Callback<()>) -> impl IntoView {
    let heading = day_heading(cell.date, &cell.label);
    let count = cell.report_count();

    view! {
        <aside class="detail-panel">
            <div class="detail-header">
                <div>
                    <h3>{heading}</h3>
                    <span class="detail-count">{count} " reports"</span>
                </div>
                <button class="icon-btn" aria-label="Close" on:click=move |_| on_close.run(())>
                    "×"
                </button>
            </div>
            <div class="detail-list">
                {cell
                    .reports
                    .into_iter()
                    .map(|report| view! { <ReportDetail report=report/> })
                    .collect_view()}
            </div>
        </aside>
    }
}

/// Full record of one announcement.
///
/// The actual-result field may carry markup in the data files; it is shown
/// as plain text.
#[component]
pub fn ReportDetail(report: Report) -> impl IntoView {
    let title = report.display_name().to_string();
    let code = (!report.ticker_code.is_empty()).then(|| report.ticker_code.clone());
    let result = report.result_text();
    let link = filing_link(&report.document_url);

    let rows: Vec<(&'static str, String)> = if report.is_extended() {
        vec![
            ("Announced", report.announcement_date),
            ("Period", report.fiscal_period),
            ("Category", report.category),
            ("Forecast", report.forecast),
            ("Progress", report.progress),
            ("Status", report.status),
        ]
    } else {
        vec![("Industry", report.industry), ("Time", report.time)]
    };

    view! {
        <div class="report-card">
            <h4 class="report-name">
                {title}
                {code.map(|c| view! { <span class="ticker-code">{c}</span> })}
            </h4>
            <dl class="report-fields">
                {rows
                    .into_iter()
                    .filter(|(_, v)| !v.is_empty())
                    .map(|(k, v)| view! { <dt>{k}</dt><dd>{v}</dd> })
                    .collect_view()}
            </dl>
            {(!result.is_empty()).then(|| view! { <p class="report-result">{result}</p> })}
            {link.map(|href| view! {
                <a class="report-link" href=href target="_blank" rel="noopener noreferrer">
                    "Filing document"
                </a>
            })}
        </div>
    }
}

/// Only plain web links and same-site paths are rendered; anything else
/// (`javascript:`, protocol-relative `//host`) is dropped.
fn filing_link(url: &str) -> Option<String> {
    let url = url.trim();
    let same_site = url.starts_with('/') && !url.starts_with("//");
    (url.starts_with("https://") || url.starts_with("http://") || same_site)
        .then(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filing_link() {
        assert_eq!(
            filing_link(" https://example.com/doc.pdf "),
            Some("https://example.com/doc.pdf".into())
        );
        assert_eq!(filing_link("/files/7203.pdf"), Some("/files/7203.pdf".into()));
        assert_eq!(filing_link("javascript:alert(1)"), None);
        assert_eq!(filing_link("//evil.example/x"), None);
        assert_eq!(filing_link("/"), Some("/".into()));
        assert_eq!(filing_link(""), None);
    }
}
