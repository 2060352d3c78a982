mod client;
mod config;
mod diff;
mod error;
pub mod reconcile;
mod signal;
mod sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{ClientFuture, PrimaryClient, Reauthenticate, SecondaryDriver, retried};
pub use config::Config;
pub use diff::diff;
pub use error::{ClientError, ConfigError, DriverError, FatalError, SyncError};
pub use signal::ChangeSignal;
pub use sync::{SyncOptions, Synchronizer};
