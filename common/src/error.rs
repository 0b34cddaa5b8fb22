//! Errors raised while loading monthly calendar data.
//!
//! Callers on the rendering path never surface these; they log and fall back
//! to an empty month.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
}
