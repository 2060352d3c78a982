use serde::{Deserialize, Serialize};

use crate::list::{PrimaryList, SecondaryList};

/// A point-in-time view of both sides.
///
/// Snapshots live one cycle: the "previous" snapshot is whatever was current
/// at the end of the last successful commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub primary: PrimaryList,
    pub secondary: SecondaryList,
}

impl Snapshot {
    pub fn new(primary: PrimaryList, secondary: SecondaryList) -> Self {
        Self { primary, secondary }
    }

    /// The converged condition: the set of active primary names equals the
    /// secondary name set. Duplicate active names collapse to one slot.
    pub fn in_sync(&self) -> bool {
        &self.primary.active_names() == self.secondary.names()
    }
}
