use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by journal persistence.
///
/// Load-side variants (`Read`, `Decode`, `Timestamp`) are handled inside
/// [`crate::Journal::load`] by falling back to a clean journal. Save-side
/// variants always propagate: a journal that cannot be written durably
/// cannot protect a commit.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("failed to read journal {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode journal {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("journal {path} carries an unrepresentable timestamp {seconds}")]
    Timestamp { path: PathBuf, seconds: f64 },
    #[error("failed to encode journal: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write journal {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to replace journal {path}: {source}")]
    Replace {
        path: PathBuf,
        source: std::io::Error,
    },
}
