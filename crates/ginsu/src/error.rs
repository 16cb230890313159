//! Error types for grid slicing and merging

use thiserror::Error;

/// Errors that can occur while slicing, merging or storing geometries
#[derive(Debug, Error)]
pub enum GinsuError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid cell index: ({x}, {y}) outside {width}x{height}")]
    InvalidIndex {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Knives must be strictly increasing: {0}")]
    InvalidSequence(String),

    #[error("Invalid grid size: expected {expected_width}x{expected_height}, got {width}x{height}")]
    InvalidGridSize {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    #[error("Cell ({x}, {y}) was never stored")]
    MissingCell { x: usize, y: usize },

    #[error("Topology error: {0}")]
    Topology(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("WKT parse error at {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for GinsuError {
    fn from(error: bincode::Error) -> Self {
        GinsuError::Serialization(error.to_string())
    }
}

impl From<serde_json::Error> for GinsuError {
    fn from(error: serde_json::Error) -> Self {
        GinsuError::Serialization(error.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, GinsuError>;
