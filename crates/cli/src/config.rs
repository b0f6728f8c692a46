//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TOTE_DATA_DIR` - Directory holding the cart files (default: `.tote`)
//! - `TOTE_STORAGE_KEY` - Storage key for the cart snapshot
//!   (default: `@GoMarketPlace:products`)
//! - `TOTE_LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `RUST_LOG` - Tracing filter (default: `tote=info,tote_store=info`)

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tote_store::DEFAULT_STORAGE_KEY;

const DEFAULT_DATA_DIR: &str = ".tote";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToteConfig {
    /// Root directory of the file storage backend
    pub data_dir: PathBuf,
    /// Key the cart snapshot is stored under
    pub storage_key: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl ToteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(
            lookup("TOTE_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );

        let storage_key =
            lookup("TOTE_STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "TOTE_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let log_format = lookup("TOTE_LOG_FORMAT")
            .map(|value| value.parse::<LogFormat>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("TOTE_LOG_FORMAT".to_string(), e))?
            .unwrap_or_default();

        Ok(Self {
            data_dir,
            storage_key,
            log_format,
        })
    }
}
