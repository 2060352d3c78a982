use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::item::ItemId;

/// The seven journal buckets.
///
/// Serialized names are the exact strings the journal file has always used;
/// changing them would strand a dirty journal written by an earlier build.
/// Declaration order is the canonical commit order: primary-originated
/// buckets first (authority pushes to the secondary), then the
/// secondary-originated buckets (user edits reflected back).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "anylist_new_items")]
    PrimaryNew,
    #[serde(rename = "anylist_checked_items")]
    PrimaryChecked,
    #[serde(rename = "anylist_unchecked_items")]
    PrimaryUnchecked,
    #[serde(rename = "anylist_renamed_items")]
    PrimaryRenamed,
    #[serde(rename = "anylist_deleted_items")]
    PrimaryDeleted,
    #[serde(rename = "alexa_new_items")]
    SecondaryNew,
    #[serde(rename = "alexa_deleted_items")]
    SecondaryDeleted,
}

impl Bucket {
    /// All buckets in commit order.
    pub const ALL: [Bucket; 7] = [
        Bucket::PrimaryNew,
        Bucket::PrimaryChecked,
        Bucket::PrimaryUnchecked,
        Bucket::PrimaryRenamed,
        Bucket::PrimaryDeleted,
        Bucket::SecondaryNew,
        Bucket::SecondaryDeleted,
    ];

    /// The on-disk bucket name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimaryNew => "anylist_new_items",
            Self::PrimaryChecked => "anylist_checked_items",
            Self::PrimaryUnchecked => "anylist_unchecked_items",
            Self::PrimaryRenamed => "anylist_renamed_items",
            Self::PrimaryDeleted => "anylist_deleted_items",
            Self::SecondaryNew => "alexa_new_items",
            Self::SecondaryDeleted => "alexa_deleted_items",
        }
    }

    /// Whether entries in this bucket are primary item ids (as opposed to
    /// secondary name strings).
    pub fn holds_item_ids(&self) -> bool {
        !matches!(self, Self::SecondaryNew | Self::SecondaryDeleted)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = DomainError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .into_iter()
            .find(|bucket| bucket.as_str() == name)
            .ok_or_else(|| DomainError::UnknownBucket {
                name: name.to_string(),
            })
    }
}

/// Per-cycle delta between the previous and current snapshots.
///
/// Primary buckets carry item ids; secondary buckets carry name strings.
/// Order within a bucket is the traversal order of the source snapshot;
/// consumers must not rely on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Ids added on the primary, unchecked at the time of the diff.
    pub primary_new: Vec<ItemId>,
    /// Ids that transitioned unchecked -> checked.
    pub primary_checked: Vec<ItemId>,
    /// Ids that transitioned checked -> unchecked.
    pub primary_unchecked: Vec<ItemId>,
    /// Ids whose name changed with checked state stable.
    pub primary_renamed: Vec<ItemId>,
    /// Ids that disappeared from the primary.
    pub primary_deleted: Vec<ItemId>,
    /// Names that appeared on the secondary.
    pub secondary_new: Vec<String>,
    /// Names that disappeared from the secondary.
    pub secondary_deleted: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.primary_new.is_empty()
            && self.primary_checked.is_empty()
            && self.primary_unchecked.is_empty()
            && self.primary_renamed.is_empty()
            && self.primary_deleted.is_empty()
            && self.secondary_new.is_empty()
            && self.secondary_deleted.is_empty()
    }

    /// Entries of `bucket` in journal form (ids rendered as strings).
    pub fn entries(&self, bucket: Bucket) -> Vec<String> {
        let ids = |ids: &[ItemId]| ids.iter().map(ToString::to_string).collect();
        match bucket {
            Bucket::PrimaryNew => ids(&self.primary_new),
            Bucket::PrimaryChecked => ids(&self.primary_checked),
            Bucket::PrimaryUnchecked => ids(&self.primary_unchecked),
            Bucket::PrimaryRenamed => ids(&self.primary_renamed),
            Bucket::PrimaryDeleted => ids(&self.primary_deleted),
            Bucket::SecondaryNew => self.secondary_new.clone(),
            Bucket::SecondaryDeleted => self.secondary_deleted.clone(),
        }
    }

    /// `(bucket, entries)` pairs in commit order, empty buckets included.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, Vec<String>)> + '_ {
        Bucket::ALL
            .into_iter()
            .map(|bucket| (bucket, self.entries(bucket)))
    }
}
