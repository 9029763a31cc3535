//! The [`BlockSource`] trait defining where table bytes come from.

use std::fmt;

use crate::block::Block;
use crate::error::Result;

/// A fixed-size range of bytes that table readers fetch in blocks.
///
/// Implementations are not internally synchronized; concurrent use of one
/// source needs external locking. Distinct sources are independent.
///
/// Every block returned by [`read_block`](BlockSource::read_block) must be
/// passed back to [`return_block`](BlockSource::return_block) of the same
/// source exactly once. Blocks borrow the source, so they cannot outlive it
/// or survive [`close`](BlockSource::close).
pub trait BlockSource: fmt::Debug {
    /// Total number of bytes available.
    fn size(&self) -> u64;

    /// Fetch `len` bytes starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds [`size`](BlockSource::size). Range
    /// errors are bugs in the caller and are never clamped.
    fn read_block(&self, offset: u64, len: u32) -> Result<Block<'_>>;

    /// Release whatever the source allocated for `block`.
    fn return_block(&self, block: Block<'_>);

    /// Release backend resources.
    fn close(self: Box<Self>);
}

/// Assert that `[offset, offset + len)` lies within a source of `size` bytes.
pub(crate) fn check_range(offset: u64, len: u32, size: u64) {
    let in_range = offset
        .checked_add(u64::from(len))
        .is_some_and(|end| end <= size);
    assert!(
        in_range,
        "block read out of range: offset {offset} + length {len} exceeds source size {size}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_within_size_pass() {
        check_range(0, 0, 0);
        check_range(0, 10, 10);
        check_range(10, 0, 10);
        check_range(3, 4, 10);
    }

    #[test]
    #[should_panic(expected = "block read out of range")]
    fn range_past_end_panics() {
        check_range(8, 3, 10);
    }

    #[test]
    #[should_panic(expected = "block read out of range")]
    fn offset_overflow_panics() {
        check_range(u64::MAX, 1, u64::MAX);
    }
}
