//! Configuration loading and management for the leave engine.
//!
//! This module loads the application configuration from a YAML file: the
//! server address, document storage paths and timeouts, the holiday
//! calendar endpoint, the log level and the seed roster.
//!
//! # Example
//!
//! ```no_run
//! use leave_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load_or_default("./config/leave-engine.yaml").unwrap();
//! println!("Roster file: {}", config.storage.data_file);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, HolidaysConfig, LoggingConfig, ServerConfig, StorageConfig};
