pub mod changeset;
pub mod error;
pub mod item;
pub mod list;
pub mod snapshot;

pub use changeset::{Bucket, ChangeSet};
pub use error::DomainError;
pub use item::{ItemId, OpaqueFields, PrimaryItem};
pub use list::{PrimaryList, SecondaryList};
pub use snapshot::Snapshot;
