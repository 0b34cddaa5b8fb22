//! Configuration parsing – reads a `KEY=VALUE` file (`calendar.conf`).
//!
//! ```text
//! # where calendar_YYYYMM.json files live
//! DATA_DIR=/srv/earnings/data
//! # optional: fetch the files from another host instead
//! DATA_URL=https://static.example.com/data
//! REPORT_SOURCE=fetched        # or: synthetic
//! SYNTHETIC_SEED=42
//! REPORT_PROBABILITY=0.3
//! HOVER_DISMISS_MS=100
//! HOVER_POLICY=coexist         # or: suppress
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::controller::{HoverPolicy, ViewSettings, DEFAULT_DISMISS_DELAY_MS};
use crate::source::DEFAULT_REPORT_PROBABILITY;

/// Where monthly report data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// Read `calendar_YYYYMM.json` once per month.
    #[default]
    Fetched,
    /// Generate random demo data.
    Synthetic,
}

/// Server-side configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // ── data ─────────────────────────────────────────────────────────
    pub data_dir: PathBuf,
    /// Base URL the monthly files are fetched from. Overrides `data_dir`.
    pub data_url: Option<String>,
    pub source: SourceKind,

    // ── synthetic demo data ──────────────────────────────────────────
    /// Fixed seed; a time-based one is used when unset.
    pub synthetic_seed: Option<u64>,
    pub report_probability: f64,

    // ── view ─────────────────────────────────────────────────────────
    pub view: ViewSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            data_url: None,
            source: SourceKind::Fetched,
            synthetic_seed: None,
            report_probability: DEFAULT_REPORT_PROBABILITY,
            view: ViewSettings::default(),
        }
    }
}

impl Config {
    /// Default config path.
    pub fn default_path() -> &'static str {
        "/etc/earnings-calendar/calendar.conf"
    }
}

/// Parse a `KEY=VALUE` configuration file.
///
/// Lines starting with `#` are comments.  Values may be optionally
/// double-quoted.  Unknown keys are silently ignored.
pub fn load(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read config: {}", path.display()))?;

    let config = from_map(&parse_conf(&text));
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Like [`load`], but a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load(path)
    } else {
        info!("No config at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

fn from_map(map: &HashMap<String, String>) -> Config {
    let defaults = Config::default();
    let get = |key: &str| -> Option<String> { map.get(key).cloned().filter(|s| !s.is_empty()) };

    let source = match get("REPORT_SOURCE").as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("fetched") => SourceKind::Fetched,
        Some("synthetic") => SourceKind::Synthetic,
        Some(other) => {
            warn!("Unknown REPORT_SOURCE '{other}', using fetched");
            SourceKind::Fetched
        }
    };

    let policy = get("HOVER_POLICY")
        .map(|v| {
            v.parse().unwrap_or_else(|e| {
                warn!("{e}, using coexist");
                HoverPolicy::Coexist
            })
        })
        .unwrap_or_default();

    Config {
        data_dir: get("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
        data_url: get("DATA_URL").map(|u| u.trim_end_matches('/').to_string()),
        source,
        synthetic_seed: get("SYNTHETIC_SEED").and_then(|v| v.parse().ok()),
        report_probability: get("REPORT_PROBABILITY")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.report_probability),
        view: ViewSettings {
            dismiss_delay_ms: get("HOVER_DISMISS_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DISMISS_DELAY_MS),
            policy,
        },
    }
}

/// Parse `KEY=VALUE` lines into a map, stripping optional double-quotes
/// and trailing `#` comments.
fn parse_conf(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            let key = key.trim();
            let val = val.split(" #").next().unwrap_or("").trim().trim_matches('"');
            map.insert(key.to_string(), val.to_string());
        }
    }
    map
}

// ─── tests ───────────────────────────────────────────────────────────────
