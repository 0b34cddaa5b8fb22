//! Report records and calendar cells, shared by the server and the browser.
//!
//! Report data comes from hand-maintained JSON files, so deserialisation is
//! deliberately forgiving: every field has a default, scalars of the wrong
//! type are stringified, and a broken report inside `details` is dropped
//! rather than failing the whole day.

use chrono::NaiveDate;
use scraper::{Html, Node};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ─── Report ──────────────────────────────────────────────────────────────────

/// One company's earnings announcement.
///
/// Covers both shapes found in the data files: the minimal
/// `{name, industry, time}` form and the extended form carrying ticker,
/// fiscal period, forecast and filing link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub industry: String,
    #[serde(deserialize_with = "lenient_string")]
    pub time: String,

    #[serde(alias = "tickerName", deserialize_with = "lenient_string")]
    pub ticker_name: String,
    #[serde(alias = "tickerCode", alias = "code", deserialize_with = "lenient_string")]
    pub ticker_code: String,
    #[serde(alias = "announcementDate", deserialize_with = "lenient_string")]
    pub announcement_date: String,
    #[serde(alias = "fiscalPeriod", alias = "period", deserialize_with = "lenient_string")]
    pub fiscal_period: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    /// Full-year forecast as published.
    #[serde(alias = "fullYearForecast", deserialize_with = "lenient_string")]
    pub forecast: String,
    /// Actual result. May contain HTML markup; see [`Report::result_text`].
    #[serde(alias = "actual", alias = "actualResult", deserialize_with = "lenient_string")]
    pub result: String,
    /// Progress of the actual result against the forecast.
    #[serde(alias = "progressRate", deserialize_with = "lenient_string")]
    pub progress: String,
    #[serde(alias = "documentUrl", alias = "url", deserialize_with = "lenient_string")]
    pub document_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
}

impl Report {
    /// Company name: ticker name for extended records, `name` otherwise.
    pub fn display_name(&self) -> &str {
        if self.ticker_name.is_empty() {
            &self.name
        } else {
            &self.ticker_name
        }
    }

    /// Whether this record uses the extended schema.
    pub fn is_extended(&self) -> bool {
        !self.ticker_code.is_empty() || !self.ticker_name.is_empty()
    }

    /// Announcement time for the compact preview line.
    pub fn when(&self) -> &str {
        if self.time.is_empty() {
            &self.announcement_date
        } else {
            &self.time
        }
    }

    /// The actual-result field with markup stripped. Never render
    /// [`Report::result`] as raw HTML.
    pub fn result_text(&self) -> String {
        strip_markup(&self.result)
    }
}

// ─── Calendar data file ──────────────────────────────────────────────────────

/// One per-day record of a monthly data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarDataEntry {
    /// ISO `YYYY-MM-DD`; must match the grid key exactly to be used.
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,
    /// Count as published. Informational only, `details` is authoritative.
    #[serde(deserialize_with = "lenient_count")]
    pub count: Option<u32>,
    #[serde(deserialize_with = "lenient_reports")]
    pub details: Vec<Report>,
}

impl CalendarDataEntry {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }
}

// ─── Calendar cell ───────────────────────────────────────────────────────────

/// One of the 42 squares of a month grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCell {
    /// Zero-padded day of month, or `-N` / `+N` for adjacent-month placeholders.
    pub label: String,
    pub style_class: String,
    /// Set for in-month cells only.
    pub date: Option<NaiveDate>,
    pub reports: Vec<Report>,
}

impl DayCell {
    pub fn is_placeholder(&self) -> bool {
        self.label.starts_with('+') || self.label.starts_with('-')
    }

    pub fn has_reports(&self) -> bool {
        !self.reports.is_empty()
    }

    pub fn report_count(&self) -> usize {
        self.reports.len()
    }
}

// ─── Markup ──────────────────────────────────────────────────────────────────

/// Elements whose start begins a new line of text.
const BLOCK_ELEMENTS: [&str; 8] = ["br", "p", "div", "li", "tr", "h1", "h2", "h3"];

/// Reduce an HTML fragment to plain text: tags are dropped, block-level
/// elements start a new line, entities are decoded by the HTML parser and
/// script/style contents are discarded.
fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());

    for node in fragment.tree.root().descendants() {
        match node.value() {
            Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => text.push('\n'),
            Node::Text(t) => {
                let hidden = node
                    .parent()
                    .and_then(|p| p.value().as_element().map(|el| el.name()))
                    .is_some_and(|name| matches!(name, "script" | "style"));
                if !hidden {
                    text.push_str(t);
                }
            }
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── Lenient field decoding ──────────────────────────────────────────────────

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

fn lenient_count<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u32>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_reports<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<Report>, D::Error> {
    let items = match Value::deserialize(de)? {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|v| match Report::deserialize(v) {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::warn!("Skipping malformed report: {e}");
                None
            }
        })
        .collect())
}

// ─── tests ───────────────────────────────────────────────────────────────
