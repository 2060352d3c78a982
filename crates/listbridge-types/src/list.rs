use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::item::{ItemId, PrimaryItem};

/// The primary-side list: an ordered collection of items keyed by id.
///
/// Membership is by id; name is a secondary lookup and is not unique. Order
/// is whatever the primary service returned and is preserved so that diffing
/// is deterministic across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryList {
    items: Vec<PrimaryItem>,
}

impl PrimaryList {
    pub fn new(items: Vec<PrimaryItem>) -> Self {
        Self { items }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrimaryItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_id(&self, id: &ItemId) -> bool {
        self.item_by_id(id).is_some()
    }

    pub fn item_by_id(&self, id: &ItemId) -> Option<&PrimaryItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn item_by_id_mut(&mut self, id: &ItemId) -> Option<&mut PrimaryItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// First item carrying `name`, in stored order, regardless of checked
    /// state. With duplicate names this is the slot the secondary side maps
    /// onto.
    pub fn item_by_name(&self, name: &str) -> Option<&PrimaryItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn push(&mut self, item: PrimaryItem) {
        self.items.push(item);
    }

    /// Insert `item`, replacing an existing item with the same id in place.
    pub fn upsert(&mut self, item: PrimaryItem) {
        match self.item_by_id_mut(&item.id) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<PrimaryItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Names of all unchecked items, collapsed to a set.
    pub fn active_names(&self) -> BTreeSet<String> {
        self.items
            .iter()
            .filter(|item| item.is_active())
            .map(|item| item.name.clone())
            .collect()
    }

    /// Names carried by more than one active item. The secondary data model
    /// cannot represent these; they collapse to a single slot there.
    pub fn duplicate_active_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        for item in self.items.iter().filter(|item| item.is_active()) {
            if !seen.insert(item.name.as_str()) && !duplicates.contains(&item.name) {
                duplicates.push(item.name.clone());
            }
        }
        duplicates
    }
}

impl FromIterator<PrimaryItem> for PrimaryList {
    fn from_iter<I: IntoIterator<Item = PrimaryItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The secondary-side list: a set of name strings.
///
/// The secondary service has no identifiers and no checked state; presence
/// of a name is the only bit. Duplicates are not meaningful, so the backing
/// store is a set with deterministic iteration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryList {
    names: BTreeSet<String>,
}

impl SecondaryList {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns false if `name` was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Returns false if `name` was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    /// Replace `old` with `new`. Returns false (and changes nothing) if
    /// `old` was not present.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> bool {
        if !self.names.remove(old) {
            return false;
        }
        self.names.insert(new.into());
        true
    }
}

impl FromIterator<String> for SecondaryList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter)
    }
}
