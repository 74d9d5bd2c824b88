//! Configuration types for the leave engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every field has a
//! default, so an empty file yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::holidays::DEFAULT_HOLIDAYS_URL;
use crate::models::RosterSeed;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the server listens on.
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
        }
    }
}

/// Where and how the roster document is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// The JSON roster document.
    pub data_file: String,
    /// The local fallback copy read when the store does not answer.
    pub cache_file: String,
    /// Bound on the initial document load, in milliseconds.
    pub load_timeout_ms: u64,
    /// How long foreign snapshots are ignored after a local write, in milliseconds.
    pub echo_window_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: "data/roster.json".to_string(),
            cache_file: "data/roster.cache.json".to_string(),
            load_timeout_ms: 5000,
            echo_window_ms: 500,
        }
    }
}

/// Public holiday calendar settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidaysConfig {
    /// Base URL; `{base_url}/{year}.json` is fetched per year.
    pub base_url: String,
    /// Per-request timeout, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for HolidaysConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HOLIDAYS_URL.to_string(),
            request_timeout_ms: 5000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// The complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Storage settings.
    pub storage: StorageConfig,
    /// Holiday calendar settings.
    pub holidays: HolidaysConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Roster created when the store is empty.
    pub roster: RosterSeed,
}
