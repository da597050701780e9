//! Error types for artifact storage

use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while persisting an upload
#[derive(Debug, Error)]
pub enum StoreError {
    /// The upload directory is missing and could not be created
    #[error("Unable to create upload directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination file could not be opened for writing
    #[error("Unable to create file {}: {source}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing the destination file failed
    #[error("Unable to save file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unrecognised naming scheme in configuration
    #[error("Unknown naming scheme: {0}")]
    UnknownNamingScheme(String),
}
