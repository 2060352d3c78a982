//! The polling loop that drives poll -> diff -> journal -> commit cycles.
//!
//! The loop is the sole mutator of its state: previous/current snapshots
//! and the journal live here, and every call into the clients happens on
//! this task. Calls into either side may block on network or UI automation
//! for seconds; there is no internal locking because nothing else touches
//! the state.

use std::time::Duration;

use listbridge_journal::Journal;
use listbridge_types::Snapshot;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::client::{PrimaryClient, SecondaryDriver};
use crate::diff::diff;
use crate::error::{FatalError, SyncError};
use crate::reconcile;

#[derive(Clone, Copy, Debug)]
pub struct SyncOptions {
    /// Pause between cycles.
    pub poll_interval: Duration,
    /// Maximum age of a dirty journal that may still be replayed on
    /// startup.
    pub recovery_horizon: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            recovery_horizon: Duration::from_secs(600),
        }
    }
}

pub struct Synchronizer<P, S> {
    primary: P,
    secondary: S,
    journal: Journal,
    options: SyncOptions,
    prev: Snapshot,
    cur: Snapshot,
}

impl<P, S> Synchronizer<P, S>
where
    P: PrimaryClient,
    S: SecondaryDriver,
{
    /// Run the startup protocol and return a synchronizer ready to cycle.
    ///
    /// 1. Snapshot both sides.
    /// 2. If the journal is dirty and younger than the recovery horizon,
    ///    replay the interrupted commit; if dirty but older, discard it.
    /// 3. If the sides still disagree, overwrite the secondary
    ///    ([`reconcile::clobber`]).
    pub async fn start(
        primary: P,
        secondary: S,
        journal: Journal,
        options: SyncOptions,
    ) -> Result<Self, FatalError> {
        Self::start_inner(primary, secondary, journal, options)
            .await
            .map_err(FatalError::Startup)
    }

    async fn start_inner(
        mut primary: P,
        mut secondary: S,
        journal: Journal,
        options: SyncOptions,
    ) -> Result<Self, SyncError> {
        info!("fetching fresh lists");
        let cur = Snapshot::new(primary.snapshot().await?, secondary.snapshot().await?);

        let mut sync = Self {
            primary,
            secondary,
            journal,
            options,
            prev: Snapshot::default(),
            cur,
        };

        if sync.journal.is_dirty() {
            if sync.journal.is_replayable(sync.options.recovery_horizon) {
                warn!("found a dirty journal, replaying the interrupted commit");
                reconcile::commit(
                    &mut sync.journal,
                    &sync.prev,
                    &mut sync.cur,
                    &mut sync.primary,
                    &mut sync.secondary,
                )
                .await?;
            } else {
                warn!(
                    age_seconds = sync.journal.age().num_seconds(),
                    "found a dirty journal, but it is too old to replay; discarding"
                );
                sync.journal.reset();
                sync.journal.save()?;
            }
        } else {
            debug!("journal is clean, nothing to replay");
        }

        if !sync.cur.in_sync() {
            info!("lists are out of sync, overwriting the secondary");
            reconcile::clobber(&mut sync.cur, &mut sync.secondary).await?;
        }

        sync.prev = sync.cur.clone();
        Ok(sync)
    }

    /// One synchronization cycle: snapshot, diff, prepare, commit, adopt.
    pub async fn sync_once(&mut self) -> Result<(), SyncError> {
        info!("syncing lists");
        self.cur = Snapshot::new(
            self.primary.snapshot().await?,
            self.secondary.snapshot().await?,
        );
        debug!(
            primary = self.cur.primary.len(),
            secondary = self.cur.secondary.len(),
            "fresh snapshots"
        );

        let changes = diff(&self.prev, &self.cur);
        reconcile::prepare(&mut self.journal, &changes)?;
        reconcile::commit(
            &mut self.journal,
            &self.prev,
            &mut self.cur,
            &mut self.primary,
            &mut self.secondary,
        )
        .await?;

        self.prev = self.cur.clone();
        info!("sync complete");
        Ok(())
    }

    /// Cycle until the first fatal error, which is returned for exit-code
    /// mapping. The journal's last-saved state stays on disk, so the next
    /// start can decide whether to replay it.
    pub async fn run(mut self) -> FatalError {
        loop {
            if let Err(cause) = self.sync_once().await {
                error!(error = %cause, "sync cycle failed, terminating");
                return FatalError::Cycle(cause);
            }
            sleep(self.options.poll_interval).await;
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// The snapshot the next cycle will diff against.
    pub fn previous(&self) -> &Snapshot {
        &self.prev
    }
}
