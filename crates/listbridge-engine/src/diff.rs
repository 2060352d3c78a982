use listbridge_types::{ChangeSet, Snapshot};

/// Compute the per-side delta between two snapshots.
///
/// Pure and deterministic: no I/O, and equal inputs produce equal change
/// sets. Bucket order follows the traversal order of the source snapshot;
/// consumers must not rely on it.
///
/// Two deliberate asymmetries on the primary side:
/// - A checked-state transition suppresses rename detection for the same
///   item in the same cycle. The checked/unchecked path rewrites secondary
///   presence under the new name anyway, and the next cycle's diff against
///   the updated previous snapshot still surfaces the rename.
/// - An item that is new and already checked is ignored; it cannot affect
///   the secondary.
pub fn diff(prev: &Snapshot, cur: &Snapshot) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for item in cur.primary.iter() {
        match prev.primary.item_by_id(&item.id) {
            Some(old) => {
                if item.checked != old.checked {
                    if item.checked {
                        changes.primary_checked.push(item.id.clone());
                    } else {
                        changes.primary_unchecked.push(item.id.clone());
                    }
                } else if item.name != old.name {
                    changes.primary_renamed.push(item.id.clone());
                }
            }
            None if item.is_active() => changes.primary_new.push(item.id.clone()),
            None => {}
        }
    }
    for old in prev.primary.iter() {
        if !cur.primary.contains_id(&old.id) {
            changes.primary_deleted.push(old.id.clone());
        }
    }

    for name in cur.secondary.names().difference(prev.secondary.names()) {
        changes.secondary_new.push(name.clone());
    }
    for name in prev.secondary.names().difference(cur.secondary.names()) {
        changes.secondary_deleted.push(name.clone());
    }

    changes
}
