//! Error types for configuration, dispatch, and command execution.
//!
//! Only `ConfigError` is fatal; dispatch and command errors are logged and
//! the event loop keeps running.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

use crate::control::MidiControl;

/// Malformed configuration. Fatal at setup, the process does not proceed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown control token '{0}'")]
    UnknownControlToken(String),

    #[error("invalid {field} '{value}' for control '{token}'")]
    InvalidNumber {
        token: String,
        field: &'static str,
        value: String,
    },

    #[error("invalid range [{min}, {max}] for control '{token}': RangeMax must be greater than RangeMin")]
    InvalidRange { token: String, min: i32, max: i32 },

    #[error("range [{min}, {max}] for control '{token}' is too wide: the span must not exceed {}", i32::MAX)]
    RangeTooWide { token: String, min: i32, max: i32 },

    #[error("invalid inject pattern '{pattern}' for control '{token}': {source}")]
    InvalidInjectPattern {
        token: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Failure while processing a single event. The event is dropped and
/// processing continues.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no runtime state seeded for control {}", .0.token())]
    MissingState(MidiControl),

    #[error("command queue full, dropping command for control {}", .0.token())]
    QueueFull(MidiControl),

    #[error("command queue closed, dropping command for control {}", .0.token())]
    QueueClosed(MidiControl),
}

/// A triggered command could not be started or did not succeed.
/// Logged by the command worker, never fatal.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn command '{line}': {source}")]
    Spawn {
        line: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command '{line}' exited with {status}")]
    Failed { line: String, status: ExitStatus },

    #[error("command '{line}' timed out after {timeout:?}")]
    TimedOut { line: String, timeout: Duration },
}
