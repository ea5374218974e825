/// Error types for the compressor
///
/// Errors that travel inside iced messages must be `Clone`, so library
/// errors are flattened to their display strings at the boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by the compression capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressError {
    /// The payload is not in any format the decoder recognises
    #[error("unsupported image format")]
    UnsupportedFormat,

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    /// The blocking encoder task panicked or was cancelled
    #[error("compression task failed: {0}")]
    Worker(String),
}

/// Failures while reading a picked or dropped file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

/// Failures while writing the compressed result to disk
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("failed to write {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

/// Failures while loading settings.json
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl SaveError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
