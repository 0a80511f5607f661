//! Error types shared by the core crate

use std::path::PathBuf;
use thiserror::Error;

/// A frame where the orbit-facing update could not derive a rotation.
///
/// These are recovered locally: the frame still applies the new position,
/// only the orientation increment is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumericDegeneracy {
    #[error("point did not move since the previous frame")]
    StationaryPoint,
    #[error("travel direction cancelled the heading")]
    CancelledHeading,
    #[error("heading did not turn")]
    ParallelHeading,
    #[error("heading reversed, rotation axis is undefined")]
    AntiparallelHeading,
}

/// Errors raised while loading mesh assets
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("binary STL is truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("malformed ASCII STL: {0}")]
    Malformed(String),
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
