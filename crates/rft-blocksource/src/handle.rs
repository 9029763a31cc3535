//! A block source slot that is bound to one backend exactly once.

use std::path::Path;

use crate::block::Block;
use crate::buffer::BufferBlockSource;
use crate::config::FileSourceConfig;
use crate::error::Result;
use crate::file::FileBlockSource;
use crate::traits::BlockSource;

/// Holds at most one [`BlockSource`] for its whole life.
///
/// A handle starts unbound. Binding it a second time, or using it before it
/// is bound, is a programming error and panics.
#[derive(Debug, Default)]
pub struct BlockSourceHandle<'a> {
    source: Option<Box<dyn BlockSource + 'a>>,
}

impl<'a> BlockSourceHandle<'a> {
    /// An unbound handle.
    pub fn new() -> Self {
        Self { source: None }
    }

    pub fn is_bound(&self) -> bool {
        self.source.is_some()
    }

    /// Bind to an arbitrary backend.
    ///
    /// # Panics
    ///
    /// Panics if the handle is already bound.
    pub fn bind(&mut self, source: impl BlockSource + 'a) {
        self.assert_unbound();
        self.source = Some(Box::new(source));
    }

    /// Bind to a borrowed in-memory buffer.
    pub fn bind_buffer(&mut self, buf: &'a [u8]) {
        self.bind(BufferBlockSource::new(buf));
    }

    /// Bind to a mapped file.
    ///
    /// On error the handle stays unbound.
    pub fn bind_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.bind_file_with(path, &FileSourceConfig::default())
    }

    /// Bind to a mapped file with explicit options.
    pub fn bind_file_with(
        &mut self,
        path: impl AsRef<Path>,
        config: &FileSourceConfig,
    ) -> Result<()> {
        self.assert_unbound();
        let source = FileBlockSource::open_with(path, config)?;
        self.bind(source);
        Ok(())
    }

    pub fn size(&self) -> u64 {
        self.bound().size()
    }

    pub fn read_block(&self, offset: u64, len: u32) -> Result<Block<'_>> {
        self.bound().read_block(offset, len)
    }

    pub fn return_block(&self, block: Block<'_>) {
        self.bound().return_block(block)
    }

    /// Release the bound backend. Closing an unbound handle does nothing.
    pub fn close(self) {
        if let Some(source) = self.source {
            source.close();
        }
    }

    fn assert_unbound(&self) {
        assert!(self.source.is_none(), "block source handle is already bound");
    }

    fn bound(&self) -> &(dyn BlockSource + 'a) {
        match self.source.as_deref() {
            Some(source) => source,
            None => panic!("block source handle is not bound"),
        }
    }
}
