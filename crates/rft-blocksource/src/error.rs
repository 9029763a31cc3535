//! Error types for block sources.

use std::path::PathBuf;

use rft_basics::AllocError;
use thiserror::Error;

/// Errors that can occur while binding or reading a block source.
#[derive(Debug, Error)]
pub enum BlockSourceError {
    /// The backing file does not exist.
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Opening, inspecting, or mapping the backing file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A block or backend allocation failed.
    #[error(transparent)]
    OutOfMemory(#[from] AllocError),
}

impl BlockSourceError {
    /// `true` for a missing backing file, an expected condition for callers
    /// probing for tables.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlockSourceError::NotFound { .. })
    }
}

/// Convenience type alias for block source operations.
pub type Result<T> = std::result::Result<T, BlockSourceError>;
