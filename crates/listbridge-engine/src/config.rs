use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::sync::SyncOptions;

/// Runtime configuration, read from a single JSON object.
///
/// Every credential key is required; a missing key fails deserialization
/// and therefore startup. Only the two interval keys have defaults.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub primary_username: String,
    pub primary_password: String,
    /// Which of the account's lists to synchronize. Startup fails if the
    /// primary service has no list with this name.
    pub primary_list_name: String,
    pub secondary_username: String,
    pub secondary_password: String,
    /// TOTP seed for the secondary login. Stored as the user pasted it;
    /// see [`Config::mfa_secret_padded`].
    pub secondary_mfa_secret: String,
    /// Regional host of the secondary service, e.g. `amazon.co.uk`.
    pub secondary_url: String,
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_journal_recovery_horizon_seconds")]
    pub journal_recovery_horizon_seconds: u64,
}

fn default_poll_interval_seconds() -> u64 {
    10
}

fn default_journal_recovery_horizon_seconds() -> u64 {
    600
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The TOTP seed padded with `=` to a multiple of 8, the length the
    /// base32 decoder requires.
    pub fn mfa_secret_padded(&self) -> String {
        let mut secret = self.secondary_mfa_secret.clone();
        while secret.len() % 8 != 0 {
            secret.push('=');
        }
        secret
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            poll_interval: Duration::from_secs(self.poll_interval_seconds),
            recovery_horizon: Duration::from_secs(self.journal_recovery_horizon_seconds),
        }
    }
}
