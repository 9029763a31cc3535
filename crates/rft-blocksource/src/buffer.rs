//! Block source over an in-memory byte buffer.

use std::fmt;
use std::sync::Arc;

use rft_basics::{default_allocator, Allocator};

use crate::block::Block;
use crate::error::Result;
use crate::traits::{check_range, BlockSource};

/// Fill byte written over returned blocks.
pub const POISON_BYTE: u8 = 0xFF;

/// Serves blocks out of a borrowed byte buffer.
///
/// Each [`read_block`](BlockSource::read_block) hands out a fresh copy of the
/// requested range. [`return_block`](BlockSource::return_block) overwrites the
/// copy with [`POISON_BYTE`] before releasing it, so a use-after-return shows
/// up as a run of `0xFF` instead of plausible data. The buffer itself is
/// never modified and is not released on close.
pub struct BufferBlockSource<'a> {
    buf: &'a [u8],
    allocator: Arc<dyn Allocator>,
}

impl<'a> BufferBlockSource<'a> {
    /// Wrap `buf`, allocating blocks through the global allocator hooks.
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_allocator(buf, default_allocator())
    }

    /// Wrap `buf`, allocating blocks through `allocator`.
    pub fn with_allocator(buf: &'a [u8], allocator: Arc<dyn Allocator>) -> Self {
        Self { buf, allocator }
    }
}

impl fmt::Debug for BufferBlockSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferBlockSource")
            .field("len", &self.buf.len())
            .field("allocator", &self.allocator)
            .finish()
    }
}

impl BlockSource for BufferBlockSource<'_> {
    fn size(&self) -> u64 {
        self.buf.len() as u64
    }

    fn read_block(&self, offset: u64, len: u32) -> Result<Block<'_>> {
        check_range(offset, len, self.size());
        // Both bounds fit in usize: they are at most buf.len().
        let start = offset as usize;
        let end = start + len as usize;

        let mut data = self.allocator.allocate_zeroed(len as usize, 1)?;
        data.copy_from_slice(&self.buf[start..end]);
        Ok(Block::owned(data))
    }

    fn return_block(&self, block: Block<'_>) {
        if let Some(mut data) = block.into_buffer() {
            data.fill(POISON_BYTE);
            self.allocator.release(data);
        }
    }

    fn close(self: Box<Self>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use rft_basics::{AllocError, AllocResult, SystemAllocator};
    use std::sync::Mutex;

    /// Keeps released buffers around so tests can inspect them.
    #[derive(Debug, Default)]
    struct RecordingAllocator {
        released: Mutex<Vec<Vec<u8>>>,
    }

    impl Allocator for RecordingAllocator {
        fn allocate(&self, size: usize) -> AllocResult<Vec<u8>> {
            SystemAllocator.allocate(size)
        }

        fn reallocate(&self, buf: Vec<u8>, size: usize) -> AllocResult<Vec<u8>> {
            SystemAllocator.reallocate(buf, size)
        }

        fn release(&self, buf: Vec<u8>) {
            self.released.lock().unwrap().push(buf);
        }
    }

    #[derive(Debug)]
    struct ExhaustedAllocator;

    impl Allocator for ExhaustedAllocator {
        fn allocate(&self, size: usize) -> AllocResult<Vec<u8>> {
            Err(AllocError::OutOfMemory { requested: size })
        }

        fn reallocate(&self, _buf: Vec<u8>, size: usize) -> AllocResult<Vec<u8>> {
            Err(AllocError::OutOfMemory { requested: size })
        }

        fn release(&self, _buf: Vec<u8>) {}
    }

    #[test]
    fn size_is_buffer_length() {
        let data = b"hello reftable".to_vec();
        let src = BufferBlockSource::new(&data);
        assert_eq!(src.size(), 14);
        assert_eq!(BufferBlockSource::new(&[]).size(), 0);
    }

    #[test]
    fn whole_buffer_read_matches() {
        let data: Vec<u8> = (0..=255).collect();
        let src = BufferBlockSource::new(&data);
        let block = src.read_block(0, data.len() as u32).unwrap();
        assert!(block.is_owned());
        assert_eq!(block.as_bytes(), &data[..]);
        src.return_block(block);
    }

    #[test]
    fn sub_range_read_is_a_copy() {
        let data = b"0123456789".to_vec();
        let src = BufferBlockSource::new(&data);
        let block = src.read_block(3, 4).unwrap();
        assert_eq!(block.as_bytes(), b"3456");
        assert_ne!(block.as_ptr(), data[3..].as_ptr());
        src.return_block(block);
    }

    #[test]
    fn returned_block_is_poisoned() {
        let data = b"refs/heads/main".to_vec();
        let allocator = Arc::new(RecordingAllocator::default());
        let src = BufferBlockSource::with_allocator(&data, allocator.clone());

        let block = src.read_block(0, data.len() as u32).unwrap();
        assert_eq!(block.as_bytes(), &data[..]);
        src.return_block(block);

        let released = allocator.released.lock().unwrap();
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].len(), data.len());
        assert!(released[0].iter().all(|&b| b == POISON_BYTE));
        assert_ne!(released[0], data);
        assert_eq!(data, b"refs/heads/main");
    }

    #[test]
    fn empty_block_round_trip() {
        let data = b"abc".to_vec();
        let allocator = Arc::new(RecordingAllocator::default());
        let src = BufferBlockSource::with_allocator(&data, allocator.clone());
        let block = src.read_block(3, 0).unwrap();
        assert!(block.is_empty());
        src.return_block(block);
        assert_eq!(allocator.released.lock().unwrap().len(), 1);
    }

    #[test]
    fn allocation_failure_is_reported() {
        let data = b"abc".to_vec();
        let src = BufferBlockSource::with_allocator(&data, Arc::new(ExhaustedAllocator));
        let err = src.read_block(0, 3).unwrap_err();
        assert!(matches!(
            err,
            crate::BlockSourceError::OutOfMemory(AllocError::OutOfMemory { requested: 3 })
        ));
    }

    #[test]
    #[should_panic(expected = "block read out of range")]
    fn read_past_end_panics() {
        let data = b"abc".to_vec();
        let src = BufferBlockSource::new(&data);
        let _ = src.read_block(1, 3);
    }

    #[test]
    fn close_leaves_buffer_intact() {
        let data = b"still here".to_vec();
        Box::new(BufferBlockSource::new(&data)).close();
        assert_eq!(data, b"still here");
    }
}
