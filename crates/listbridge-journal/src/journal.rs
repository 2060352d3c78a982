//! Durable change-bucket store for in-flight reconciliations.
//!
//! A journal is clean (committed state) or dirty (exactly one in-flight
//! batch). Buckets are populated between `reset()` and `save()` at prepare
//! time; a successful commit ends with another `reset()` + `save()` so the
//! on-disk form encodes the clean state again. A dirty file found at
//! startup is the crash-recovery signal.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use listbridge_types::Bucket;
use tracing::{debug, warn};

use crate::error::JournalError;
use crate::store::{self, Persisted};

#[derive(Clone, Debug)]
pub struct Journal {
    data: BTreeMap<Bucket, Vec<String>>,
    dirty: bool,
    last_update_time: DateTime<Utc>,
    path: Option<PathBuf>,
}

impl Journal {
    /// A journal with no file backing. `save()` is a no-op.
    pub fn in_memory() -> Self {
        Self {
            data: BTreeMap::new(),
            dirty: false,
            last_update_time: Utc::now(),
            path: None,
        }
    }

    /// Load the journal backed by `path`.
    ///
    /// A missing file is a clean journal. An unreadable or undecodable file
    /// is logged and also treated as clean: replaying a journal we cannot
    /// trust is worse than re-deriving the delta from fresh snapshots.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut journal = Self {
            path: Some(path.clone()),
            ..Self::in_memory()
        };

        match store::read(&path) {
            Ok(Some((persisted, last_update_time))) => {
                journal.dirty = persisted.dirty;
                journal.last_update_time = last_update_time;
                journal.data = persisted.data;
            }
            Ok(None) => debug!(path = %path.display(), "no journal file, starting clean"),
            Err(error) => warn!(%error, "could not load journal, starting clean"),
        }
        journal
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Clear all buckets and mark the journal clean.
    pub fn reset(&mut self) {
        self.data.clear();
        self.dirty = false;
        self.last_update_time = Utc::now();
    }

    /// Append `entry` to `bucket`, marking the journal dirty.
    pub fn add(&mut self, bucket: Bucket, entry: impl Into<String>) {
        self.dirty = true;
        self.last_update_time = Utc::now();
        self.data.entry(bucket).or_default().push(entry.into());
    }

    /// Entries of `bucket`, copied. Mutating the result never touches the
    /// journal.
    pub fn get(&self, bucket: Bucket) -> Vec<String> {
        self.data.get(&bucket).cloned().unwrap_or_default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_entries(&self) -> bool {
        self.data.values().any(|entries| !entries.is_empty())
    }

    pub fn last_update_time(&self) -> DateTime<Utc> {
        self.last_update_time
    }

    /// Time elapsed since the last `reset()` or `add()`.
    pub fn age(&self) -> TimeDelta {
        Utc::now() - self.last_update_time
    }

    /// Whether a dirty journal is still young enough to replay. A journal
    /// older than `horizon` is assumed stale; replaying it would re-apply
    /// intent the user has likely since revised.
    pub fn is_replayable(&self, horizon: Duration) -> bool {
        let horizon = TimeDelta::from_std(horizon).unwrap_or(TimeDelta::MAX);
        self.dirty && self.age() < horizon
    }

    /// Persist the current state atomically. No-op without file backing;
    /// failures propagate.
    pub fn save(&self) -> Result<(), JournalError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let persisted = Persisted {
            dirty: self.dirty,
            last_update_time: store::to_unix_seconds(self.last_update_time),
            data: self.data.clone(),
        };
        store::write_atomic(path, &persisted)
    }
}
