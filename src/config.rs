//! Proxy configuration loaded from a YAML file.
//!
//! The file carries a single top-level `printers` sequence; each record
//! names a printer by address and carries the digest-auth credentials for
//! it. Configuration is loaded once at startup and passed into the web
//! state, so it is read-only for the lifetime of the process.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Root of the `prusa.yml` configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub printers: Vec<PrinterRecord>,
}

/// One printer entry. Username and password may be omitted in the file;
/// operations against a printer with empty credentials fail at resolve time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrinterRecord {
    pub address: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Config {
    /// Load and parse the configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Username configured for `address`; empty when the printer is unknown
    /// or has no username set.
    pub fn username(&self, address: &str) -> &str {
        self.record(address).map(|p| p.username.as_str()).unwrap_or("")
    }

    /// Password configured for `address`; empty when the printer is unknown
    /// or has no password set.
    pub fn password(&self, address: &str) -> &str {
        self.record(address).map(|p| p.password.as_str()).unwrap_or("")
    }

    fn record(&self, address: &str) -> Option<&PrinterRecord> {
        self.printers.iter().find(|p| p.address == address)
    }
}
