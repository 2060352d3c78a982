use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque stable identifier for a primary-side item.
///
/// Assigned by the primary service, unique within a list, immutable for the
/// lifetime of the item. The synchronizer treats it as the sole identity of
/// a primary item; it never inspects the contents.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Fields the primary service attaches to an item that the synchronizer
/// carries but never interprets. They must survive round-trips through
/// client implementations unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueFields {
    pub quantity: Option<String>,
    pub details: Option<String>,
    pub category: Option<String>,
}

/// One item on the primary list.
///
/// `checked == false` means the item is active; only active items are
/// representable on the secondary list, which has neither identifiers nor
/// checked state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryItem {
    pub id: ItemId,
    pub name: String,
    pub checked: bool,
    #[serde(default)]
    pub fields: OpaqueFields,
}

impl PrimaryItem {
    /// A new, unchecked item.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            checked: false,
            fields: OpaqueFields::default(),
        }
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_fields(mut self, fields: OpaqueFields) -> Self {
        self.fields = fields;
        self
    }

    /// Whether the item is visible on the secondary side.
    pub fn is_active(&self) -> bool {
        !self.checked
    }
}
