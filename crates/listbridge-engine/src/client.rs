//! The two remote-side interfaces and the contracts their implementations
//! share. Concrete clients (HTTP, browser automation) live outside this
//! crate; everything here is what the engine relies on.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use listbridge_types::{ItemId, PrimaryItem, PrimaryList, SecondaryList};
use tracing::warn;

use crate::error::{ClientError, DriverError};

/// The authoritative, id-bearing list service.
///
/// `snapshot` is an eventually-consistent view: implementations may serve a
/// cached list and use a [`crate::ChangeSignal`] raised by their push
/// channel to decide when to refetch. Mutators must recover transient auth
/// failures with one reauthentication and one retry (see [`retried`])
/// before surfacing [`ClientError::Auth`].
#[async_trait]
pub trait PrimaryClient: Send {
    async fn snapshot(&mut self) -> Result<PrimaryList, ClientError>;

    /// Create a new, unchecked item. Returns the item as the service
    /// recorded it, including the assigned id.
    async fn add(&mut self, name: &str) -> Result<PrimaryItem, ClientError>;

    async fn remove(&mut self, id: &ItemId) -> Result<(), ClientError>;

    async fn check(&mut self, id: &ItemId) -> Result<(), ClientError>;

    async fn uncheck(&mut self, id: &ItemId) -> Result<(), ClientError>;

    async fn rename(&mut self, id: &ItemId, name: &str) -> Result<(), ClientError>;

    /// Create `name` unchecked if absent, flip it unchecked if present and
    /// checked, otherwise do nothing. Returns the resulting item.
    async fn add_or_uncheck(&mut self, name: &str) -> Result<PrimaryItem, ClientError>;
}

/// The UI-only, names-only list service.
///
/// `snapshot` must return the complete visible list (the driver owns any
/// scrolling or pagination needed to enumerate it) and may take seconds;
/// the engine calls it at most once per cycle. Mutator side effects are
/// observable only through subsequent snapshots.
#[async_trait]
pub trait SecondaryDriver: Send {
    async fn snapshot(&mut self) -> Result<SecondaryList, DriverError>;

    async fn add(&mut self, name: &str) -> Result<(), DriverError>;

    async fn remove(&mut self, name: &str) -> Result<(), DriverError>;

    async fn rename(&mut self, old: &str, new: &str) -> Result<(), DriverError>;
}

/// Credential refresh, the recovery half of the primary client's
/// auth-retry contract.
#[async_trait]
pub trait Reauthenticate {
    async fn reauthenticate(&mut self) -> Result<(), ClientError>;
}

/// Boxed future returned by the operation passed to [`retried`].
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ClientError>> + Send + 'a>>;

/// Run `op`; on an authentication failure, reauthenticate once and run it
/// once more. Any second failure, and every non-auth failure, surfaces
/// unchanged.
///
/// Primary client implementations wrap each mutator in this so that an
/// expired token costs one retry instead of a failed cycle.
pub async fn retried<C, T, F>(client: &mut C, mut op: F) -> Result<T, ClientError>
where
    C: Reauthenticate + Send,
    F: for<'a> FnMut(&'a mut C) -> ClientFuture<'a, T>,
{
    match op(client).await {
        Err(ClientError::Auth(reason)) => {
            warn!(%reason, "primary request failed authentication, refreshing and retrying once");
            client.reauthenticate().await?;
            op(client).await
        }
        result => result,
    }
}
