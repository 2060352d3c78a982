//! Applying a change set to both sides, primary authoritative on conflict.
//!
//! Every intended mutation is journaled by [`prepare`] before [`commit`]
//! executes any of it. Commit applies primary-originated buckets first
//! (authority pushes to the secondary), then secondary-originated buckets
//! (user edits reflected back). Each mutation is guarded by a predicate
//! over the current view of the opposite side, so replaying a partially
//! applied journal never double-applies: work already present is a no-op.

use listbridge_journal::Journal;
use listbridge_types::{Bucket, ChangeSet, ItemId, Snapshot};
use tracing::{debug, info, warn};

use crate::client::{PrimaryClient, SecondaryDriver};
use crate::error::{DriverError, SyncError};

/// Record `changes` as the journal's single in-flight batch and persist it.
///
/// An empty change set leaves the journal clean; the on-disk form then
/// already encodes the committed state.
pub fn prepare(journal: &mut Journal, changes: &ChangeSet) -> Result<(), SyncError> {
    journal.reset();
    for (bucket, entries) in changes.iter() {
        for entry in entries {
            journal.add(bucket, entry);
        }
    }
    journal.save()?;
    debug!(?changes, "transaction prepared");
    Ok(())
}

/// Apply the journaled batch, then reset and re-persist the journal.
///
/// `cur` is mutated to mirror every applied change, so the caller can adopt
/// it as the next previous snapshot. Renamed and deleted entries resolve
/// their old names against `prev`; on startup replay `prev` is empty and
/// those entries are skipped with a warning, which the predicates make safe.
pub async fn commit<P, S>(
    journal: &mut Journal,
    prev: &Snapshot,
    cur: &mut Snapshot,
    primary: &mut P,
    secondary: &mut S,
) -> Result<(), SyncError>
where
    P: PrimaryClient,
    S: SecondaryDriver,
{
    if !journal.is_dirty() {
        debug!("journal is clean, nothing to commit");
        return Ok(());
    }

    for name in cur.primary.duplicate_active_names() {
        warn!(%name, "multiple active primary items share this name; the secondary sees one slot");
    }
    debug!("committing transaction");

    for id in journal.get(Bucket::PrimaryNew) {
        let id = ItemId::new(id);
        let Some(item) = cur.primary.item_by_id(&id) else {
            skipped(Bucket::PrimaryNew, &id);
            continue;
        };
        if !cur.secondary.contains(&item.name) {
            debug!(name = %item.name, "adding to secondary");
            secondary.add(&item.name).await?;
            cur.secondary.insert(item.name.clone());
        }
    }

    for id in journal.get(Bucket::PrimaryChecked) {
        let id = ItemId::new(id);
        let Some(item) = cur.primary.item_by_id(&id) else {
            skipped(Bucket::PrimaryChecked, &id);
            continue;
        };
        if cur.secondary.contains(&item.name) {
            debug!(name = %item.name, "removing from secondary");
            secondary.remove(&item.name).await?;
            let name = item.name.clone();
            cur.secondary.remove(&name);
        }
    }

    for id in journal.get(Bucket::PrimaryUnchecked) {
        let id = ItemId::new(id);
        let Some(item) = cur.primary.item_by_id(&id) else {
            skipped(Bucket::PrimaryUnchecked, &id);
            continue;
        };
        if !cur.secondary.contains(&item.name) {
            debug!(name = %item.name, "adding to secondary");
            secondary.add(&item.name).await?;
            cur.secondary.insert(item.name.clone());
        }
    }

    for id in journal.get(Bucket::PrimaryRenamed) {
        let id = ItemId::new(id);
        let Some(item) = cur.primary.item_by_id(&id) else {
            skipped(Bucket::PrimaryRenamed, &id);
            continue;
        };
        let Some(old) = prev.primary.item_by_id(&id) else {
            skipped(Bucket::PrimaryRenamed, &id);
            continue;
        };
        if cur.secondary.contains(&old.name) && !cur.secondary.contains(&item.name) {
            debug!(from = %old.name, to = %item.name, "renaming on secondary");
            secondary.rename(&old.name, &item.name).await?;
            let (from, to) = (old.name.clone(), item.name.clone());
            cur.secondary.rename(&from, to);
        }
    }

    for id in journal.get(Bucket::PrimaryDeleted) {
        let id = ItemId::new(id);
        let Some(item) = prev.primary.item_by_id(&id) else {
            skipped(Bucket::PrimaryDeleted, &id);
            continue;
        };
        if cur.secondary.contains(&item.name) {
            debug!(name = %item.name, "removing from secondary");
            secondary.remove(&item.name).await?;
            let name = item.name.clone();
            cur.secondary.remove(&name);
        }
    }

    for name in journal.get(Bucket::SecondaryNew) {
        let covered = cur
            .primary
            .item_by_name(&name)
            .is_some_and(|item| item.is_active());
        if !covered {
            debug!(%name, "reflecting secondary addition onto primary");
            let item = primary.add_or_uncheck(&name).await?;
            cur.primary.upsert(item);
        }
    }

    for name in journal.get(Bucket::SecondaryDeleted) {
        let Some(item) = cur.primary.item_by_name(&name) else {
            continue;
        };
        let id = item.id.clone();
        debug!(%name, %id, "checking primary item removed from secondary");
        primary.check(&id).await?;
        if let Some(item) = cur.primary.item_by_id_mut(&id) {
            item.checked = true;
        }
    }

    journal.reset();
    journal.save()?;
    debug!("transaction committed");
    Ok(())
}

fn skipped(bucket: Bucket, id: &ItemId) {
    warn!(%bucket, %id, "journaled item no longer resolves in its snapshot, skipping");
}

/// One-shot startup reconciliation: force the secondary to mirror the
/// primary's active names.
///
/// Runs when the two sides disagree after journal replay, on the assumption
/// that startup divergence comes from missed updates rather than deliberate
/// secondary edits. This is the only path that deletes from the secondary
/// without journaling first. `cur` is mutated to mirror every applied
/// change.
pub async fn clobber<S>(cur: &mut Snapshot, secondary: &mut S) -> Result<(), DriverError>
where
    S: SecondaryDriver,
{
    info!("overwriting the secondary with the primary list");

    let items: Vec<_> = cur.primary.iter().cloned().collect();
    for item in items {
        if item.checked && cur.secondary.contains(&item.name) {
            debug!(name = %item.name, "removing from secondary");
            secondary.remove(&item.name).await?;
            cur.secondary.remove(&item.name);
        } else if item.is_active() && !cur.secondary.contains(&item.name) {
            debug!(name = %item.name, "adding to secondary");
            secondary.add(&item.name).await?;
            cur.secondary.insert(item.name.clone());
        }
    }

    let unmatched: Vec<String> = cur
        .secondary
        .iter()
        .filter(|name| cur.primary.item_by_name(name).is_none())
        .cloned()
        .collect();
    for name in unmatched {
        debug!(%name, "removing name with no primary counterpart from secondary");
        secondary.remove(&name).await?;
        cur.secondary.remove(&name);
    }

    Ok(())
}
