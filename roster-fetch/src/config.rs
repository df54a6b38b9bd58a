// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Server endpoint configuration.
//!
//! ```
//! use roster_fetch::RosterConfig;
//! use std::time::Duration;
//!
//! let config = RosterConfig::from_json_str(
//!     r#"{"server_address":"http://localhost:8080","connect_timeout_ms":500}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.server_address, "http://localhost:8080");
//! assert_eq!(config.connect_timeout(), Some(Duration::from_millis(500)));
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SERVER_ADDRESS_VAR: &str = "ROSTER_SERVER_ADDRESS";
pub const CONNECT_TIMEOUT_VAR: &str = "ROSTER_CONNECT_TIMEOUT_MS";

/// Failure to load a [`RosterConfig`]. Never reaches stream consumers.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Environment variable {name} has invalid value {value:?}")]
    InvalidVar { name: &'static str, value: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Where the fetch loops find the remote source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Base address; `/existentes` and `/novos` are appended to it.
    #[serde(alias = "enderecoServidor")]
    pub server_address: String,

    /// Connection establishment limit. Requests themselves never time out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,
}

impl RosterConfig {
    pub fn new(server_address: impl Into<String>) -> Self {
        Self {
            server_address: server_address.into(),
            connect_timeout_ms: None,
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or missing fields.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its content is not a valid config.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reads `ROSTER_SERVER_ADDRESS` and the optional `ROSTER_CONNECT_TIMEOUT_MS`.
    ///
    /// # Errors
    ///
    /// See [`RosterConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] without a server address and
    /// [`ConfigError::InvalidVar`] when the timeout is not a whole number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_address =
            lookup(SERVER_ADDRESS_VAR).ok_or(ConfigError::MissingVar(SERVER_ADDRESS_VAR))?;

        let connect_timeout_ms = match lookup(CONNECT_TIMEOUT_VAR) {
            None => None,
            Some(value) => Some(value.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: CONNECT_TIMEOUT_VAR,
                value,
            })?),
        };

        Ok(Self {
            server_address,
            connect_timeout_ms,
        })
    }
}
