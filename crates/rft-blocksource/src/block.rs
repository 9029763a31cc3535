//! Byte ranges handed out by a block source.

use std::fmt;
use std::ops::Deref;

/// A byte range obtained from [`BlockSource::read_block`].
///
/// Depending on the backend the bytes are either a private copy or a view
/// into the source's own storage. Either way the block borrows the source it
/// came from and must be handed back with
/// [`BlockSource::return_block`] exactly once.
///
/// [`BlockSource::read_block`]: crate::BlockSource::read_block
/// [`BlockSource::return_block`]: crate::BlockSource::return_block
pub struct Block<'a> {
    data: BlockData<'a>,
}

enum BlockData<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a [u8]),
}

impl<'a> Block<'a> {
    /// A block that owns a copy of its bytes.
    pub fn owned(data: Vec<u8>) -> Self {
        Self {
            data: BlockData::Owned(data),
        }
    }

    /// A zero-copy view into storage owned by the source.
    pub fn borrowed(data: &'a [u8]) -> Self {
        Self {
            data: BlockData::Borrowed(data),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.data {
            BlockData::Owned(buf) => buf,
            BlockData::Borrowed(view) => view,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// `true` if the block carries its own copy of the bytes.
    pub fn is_owned(&self) -> bool {
        matches!(self.data, BlockData::Owned(_))
    }

    /// The owned buffer, or `None` for a borrowed view.
    pub fn into_buffer(self) -> Option<Vec<u8>> {
        match self.data {
            BlockData::Owned(buf) => Some(buf),
            BlockData::Borrowed(_) => None,
        }
    }
}

impl Deref for Block<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Block<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("len", &self.len())
            .field("owned", &self.is_owned())
            .finish()
    }
}
