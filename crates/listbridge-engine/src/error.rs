use std::path::PathBuf;

use listbridge_journal::JournalError;
use listbridge_types::ItemId;
use thiserror::Error;

/// Failure talking to the primary service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Authentication rejected. Implementations refresh credentials and
    /// retry once (see [`crate::retried`]) before letting this surface.
    #[error("primary authentication failed: {0}")]
    Auth(String),
    #[error("primary request failed: {0}")]
    Network(String),
    #[error("primary service rejected the request: {0}")]
    Service(String),
    #[error("primary item {id} not found")]
    ItemNotFound { id: ItemId },
}

/// Failure driving the secondary service's UI.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("secondary ui automation failed: {0}")]
    Ui(String),
    #[error("secondary request failed: {0}")]
    Network(String),
}

/// Anything that aborts a sync cycle. The journal on disk keeps the
/// in-flight intent; the next start decides whether to replay it.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Journal(#[from] JournalError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Process-fatal failures and their exit-code mapping.
///
/// Exit code 0 is reserved for clean shutdown, which is unreachable in
/// normal operation; the supervising process restarts on anything else.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("startup failed: {0}")]
    Startup(#[source] SyncError),
    #[error("sync cycle failed: {0}")]
    Cycle(#[source] SyncError),
}

impl FatalError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Startup(_) => 2,
            Self::Cycle(_) => 1,
        }
    }
}
