//! Error types for hook installation, configuration and the command protocol.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid or unreadable calibration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A hardware axis whose minimum is not below its maximum.
    #[error("hardware {axis} axis range is empty: min {min} >= max {max}")]
    EmptyAxis {
        /// "x" or "y".
        axis: &'static str,
        min: i32,
        max: i32,
    },

    /// Display dimensions must both be positive.
    #[error("display dimensions must be positive, got {width}x{height}")]
    InvalidDisplay { width: i32, height: i32 },

    /// Pressure bounds out of order or default pressure outside them.
    #[error("pressure {pressure} must lie in ({min}, {max}]")]
    InvalidPressure { pressure: i32, min: i32, max: i32 },

    /// The configured FIFO or device path is empty.
    #[error("{0} path is empty")]
    EmptyPath(&'static str),
}

/// One malformed line of the command protocol.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    UnknownVerb(String),

    #[error("{verb}: missing {field}")]
    MissingField {
        verb: &'static str,
        field: &'static str,
    },

    #[error("{verb}: {field} is not an integer: '{value}'")]
    InvalidNumber {
        verb: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{verb}: unexpected trailing input '{rest}'")]
    TrailingInput { verb: &'static str, rest: String },
}

/// Failures that keep the hook from activating.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("real read() could not be resolved: {0}")]
    Symbol(String),

    #[error("failed to create command channel {path}: {source}")]
    ChannelCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} exists but is not a FIFO")]
    ChannelNotFifo { path: PathBuf },

    #[error("failed to spawn command reader: {0}")]
    Spawn(#[source] std::io::Error),
}
