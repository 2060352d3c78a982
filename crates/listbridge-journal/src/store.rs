//! On-disk form of the journal and the atomic-replacement write path.
//!
//! The file is a single JSON object `{dirty, last_update_time, data}` with
//! `last_update_time` as fractional unix seconds. Journals written by the
//! existing deployment load unchanged; unknown bucket names or an
//! unrepresentable timestamp are decode errors, which the loader treats as
//! a clean journal.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use listbridge_types::Bucket;
use serde::{Deserialize, Serialize};

use crate::error::JournalError;

/// Persistence-level journal struct. Field names are the on-disk spelling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Persisted {
    pub(crate) dirty: bool,
    pub(crate) last_update_time: f64,
    pub(crate) data: BTreeMap<Bucket, Vec<String>>,
}

/// Read and decode the journal file at `path`, returning the decoded form
/// together with its parsed timestamp.
///
/// `Ok(None)` means there is no file yet, which is a clean journal, not an
/// error.
pub(crate) fn read(path: &Path) -> Result<Option<(Persisted, DateTime<Utc>)>, JournalError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(JournalError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let persisted: Persisted =
        serde_json::from_slice(&bytes).map_err(|source| JournalError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    let last_update_time =
        from_unix_seconds(persisted.last_update_time).ok_or(JournalError::Timestamp {
            path: path.to_path_buf(),
            seconds: persisted.last_update_time,
        })?;
    Ok(Some((persisted, last_update_time)))
}

/// Write `persisted` to `path` via a sibling temp file and a rename, so a
/// crash never leaves a half-written journal.
pub(crate) fn write_atomic(path: &Path, persisted: &Persisted) -> Result<(), JournalError> {
    let bytes = serde_json::to_vec_pretty(persisted).map_err(JournalError::Encode)?;

    let tmp = tmp_path(path);
    let write_err = |source| JournalError::Write {
        path: tmp.clone(),
        source,
    };
    let mut file = File::create(&tmp).map_err(write_err)?;
    file.write_all(&bytes).map_err(write_err)?;
    // Rename is only atomic for data that has reached the disk.
    file.sync_all().map_err(write_err)?;
    drop(file);

    fs::rename(&tmp, path).map_err(|source| JournalError::Replace {
        path: path.to_path_buf(),
        source,
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    tmp.into()
}

/// Fractional unix seconds for the persisted `last_update_time` field.
pub(crate) fn to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp() as f64 + f64::from(time.timestamp_subsec_micros()) / 1e6
}

/// Inverse of [`to_unix_seconds`], at millisecond precision. `None` for
/// non-finite or out-of-range values.
pub(crate) fn from_unix_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1e3).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}
