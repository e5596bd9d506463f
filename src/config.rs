//! Configuration for the task service.
//!
//! All settings come from environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `TASK_STORE` - Optional. Storage backend, `memory` or `sqlite`. Defaults to `sqlite`.
//! - `TASK_DB_DIR` - Optional. Directory for the sqlite database file. Defaults to `./data`.
//! - `VALIDATE_UPDATES` - Optional. Re-run create-time validation on updates. Defaults to `true`.

use std::path::PathBuf;
use thiserror::Error;

use crate::store::TaskStoreType;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Storage backend selection
    pub store_type: TaskStoreType,

    /// Directory holding the sqlite database file
    pub db_dir: PathBuf,

    /// Whether update re-checks name uniqueness, past dates, and cost.
    /// The system this replaces validated on create only; the toggle keeps
    /// that relaxation reachable while defaulting to the symmetric rules.
    pub validate_updates: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let store_type = std::env::var("TASK_STORE")
            .map(|v| TaskStoreType::from_str(&v))
            .unwrap_or_default();

        let db_dir = std::env::var("TASK_DB_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let validate_updates = std::env::var("VALIDATE_UPDATES")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("VALIDATE_UPDATES".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            host,
            port,
            store_type,
            db_dir,
            validate_updates,
        })
    }
}
