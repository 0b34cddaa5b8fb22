//! Monthly report data with an in-memory cache.
//!
//! Each month near the current one is loaded at most once per process, even
//! under concurrent requests: from `DATA_DIR`, from `DATA_URL` over HTTP, or
//! generated when the synthetic source is configured. Failures are logged
//! and cached as an empty month. Months outside the cache window are loaded
//! on every request and never stored.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;
use earnings_common::config::{Config, SourceKind};
use earnings_common::error::DataError;
use earnings_common::grid::MonthCursor;
use earnings_common::model::CalendarDataEntry;
use earnings_common::payload;
use earnings_common::source::SyntheticReports;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Months either side of the current month whose data is cached.
pub const CACHE_WINDOW_MONTHS: i64 = 24;

/// One month's entries, filled by whichever request gets there first.
type MonthSlot = Arc<OnceCell<Vec<CalendarDataEntry>>>;

/// Thread-safe cache shared across requests.
pub type MonthCache = Arc<Mutex<HashMap<MonthCursor, MonthSlot>>>;

/// Create an empty cache.
pub fn new_cache() -> MonthCache {
    Arc::new(Mutex::new(HashMap::new()))
}

/// Everything the server needs to answer `get_calendar_data`.
#[derive(Clone, Debug)]
pub struct CalendarData {
    config: Arc<Config>,
    http: reqwest::Client,
    cache: MonthCache,
}

impl CalendarData {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
            cache: new_cache(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Entries for `cursor`. Concurrent callers for the same uncached month
    /// share a single load; the answer is kept even when it is empty.
    pub async fn month_entries(&self, cursor: MonthCursor) -> Vec<CalendarDataEntry> {
        let current = MonthCursor::of(Local::now().date_naive());
        if current.months_until(cursor).abs() > CACHE_WINDOW_MONTHS {
            debug!("{cursor} is outside the cache window of {current}");
            return self.load(cursor).await;
        }

        let slot = {
            let mut guard = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            guard.entry(cursor).or_default().clone()
        };
        slot.get_or_init(|| self.load(cursor)).await.clone()
    }

    async fn load(&self, cursor: MonthCursor) -> Vec<CalendarDataEntry> {
        match self.config.source {
            SourceKind::Synthetic => self.synthesize(cursor),
            SourceKind::Fetched => match self.fetch(cursor).await {
                Ok(entries) => {
                    info!("Loaded {} calendar entries for {cursor}", entries.len());
                    entries
                }
                Err(e) => {
                    warn!("Calendar data for {cursor} unavailable: {e}");
                    Vec::new()
                }
            },
        }
    }

    async fn fetch(&self, cursor: MonthCursor) -> Result<Vec<CalendarDataEntry>, DataError> {
        let text = match &self.config.data_url {
            Some(base) => self.download(base, cursor).await?,
            None => read_month_file(&self.config.data_dir, cursor).await?,
        };
        Ok(payload::normalize(&text))
    }

    async fn download(&self, base: &str, cursor: MonthCursor) -> Result<String, DataError> {
        let url = format!("{base}/{}", payload::file_name(cursor));
        let http_err = |e: reqwest::Error| DataError::Http {
            url: url.clone(),
            message: e.to_string(),
        };

        let resp = self.http.get(&url).send().await.map_err(http_err)?;
        if !resp.status().is_success() {
            return Err(DataError::Status {
                url: url.clone(),
                status: resp.status().as_u16(),
            });
        }
        resp.text().await.map_err(http_err)
    }

    fn synthesize(&self, cursor: MonthCursor) -> Vec<CalendarDataEntry> {
        let seed = self
            .config
            .synthetic_seed
            .unwrap_or_else(|| chrono::Utc::now().timestamp_micros() as u64);
        // Distinct but reproducible months for a fixed seed.
        let month_key = (i64::from(cursor.year) * 12 + i64::from(cursor.month0)) as u64;
        SyntheticReports::seeded(seed ^ month_key.wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .probability(self.config.report_probability)
            .month_entries(cursor)
    }
}

/// Body of the data file for `cursor` under `dir`.
async fn read_month_file(dir: &Path, cursor: MonthCursor) -> Result<String, DataError> {
    let path = payload::month_file(dir, cursor);
    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| DataError::Io {
            path: path.clone(),
            source,
        })?;
    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}
