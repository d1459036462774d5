//! Error types for media triage

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for media triage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media triage
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read staging folder {path}: {source}")]
    StagingRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Validation(String),

    #[error("A scan is already running")]
    ScanInProgress,

    #[error("Failed to create folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to move {source_path} to {destination}: {source}")]
    Move {
        source_path: PathBuf,
        destination: PathBuf,
        source: std::io::Error,
    },

    #[error("No free file name left for {name} in {folder}")]
    CollisionExhausted { name: String, folder: PathBuf },

    #[error("Invalid file name: {path}")]
    InvalidFileName { path: PathBuf },

    #[error("Scan worker stopped unexpectedly")]
    WorkerPanicked,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
