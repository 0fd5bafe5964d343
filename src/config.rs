//! Configuration management for midi-trigger
//!
//! Handles loading and parsing of the JSON trigger document. Field values are
//! kept as strings here to stay byte-compatible with the historic config
//! format; validation and type conversion happen when the trigger table is
//! built.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(rename = "Triggers")]
    pub triggers: Vec<TriggerConfig>,
}

/// One trigger entry, as written in the config document.
///
/// `RangeMin`/`RangeMax` are numeric strings and `FlipFlop`/`UpOnly` are
/// string booleans where only the literal `"true"` is true.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TriggerConfig {
    /// Symbolic control token, e.g. "MIDICTRL_MAIN_VOLUME_MSB"
    pub input: String,
    /// Executable / base command
    pub command: String,
    /// Argument template, may embed the injection placeholder
    pub argument: String,
    /// Pattern replaced by the computed value inside the argument
    pub inject: String,
    pub range_min: String,
    pub range_max: String,
    pub flip_flop: String,
    pub up_only: String,
}

impl AppConfig {
    /// Load configuration from file
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).await.map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
