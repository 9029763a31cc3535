//! Error types for the reftable foundations.

use thiserror::Error;

/// Allocation failures reported by the allocator indirection.
///
/// Both variants belong to the out-of-memory class: callers recover by
/// releasing what they hold and propagating, never by retrying.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The allocator (or an installed hook) could not provide the bytes.
    #[error("out of memory: failed to allocate {requested} bytes")]
    OutOfMemory { requested: usize },

    /// `count * elem_size` does not fit in `usize`.
    #[error("out of memory: {count} elements of {elem_size} bytes overflows usize")]
    CapacityOverflow { count: usize, elem_size: usize },
}

impl AllocError {
    /// Always `true`; both variants are out-of-memory conditions.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(
            self,
            AllocError::OutOfMemory { .. } | AllocError::CapacityOverflow { .. }
        )
    }
}

/// Errors from the foundation utilities.
#[derive(Debug, Error)]
pub enum BasicsError {
    /// An allocation failed.
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// A hash format identifier from outside the process is not recognized.
    #[error("unknown hash format id: {0:#010x}")]
    UnknownHashFormat(u32),

    /// A hash format name could not be parsed.
    #[error("invalid hash format: {0}")]
    InvalidHashFormat(String),
}

/// Convenience type alias for foundation operations.
pub type Result<T> = std::result::Result<T, BasicsError>;
