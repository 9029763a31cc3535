//! Block source over a read-only memory-mapped file.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapOptions};
use tracing::{debug, warn};

use crate::block::Block;
use crate::config::FileSourceConfig;
use crate::error::{BlockSourceError, Result};
use crate::traits::{check_range, BlockSource};

/// Serves zero-copy blocks out of a file mapped in full at open time.
///
/// Opening performs all the blocking I/O (open, stat, mmap). Afterwards a
/// read is a slice into the mapping: nothing is allocated or copied, and
/// returning a block is a no-op. The file descriptor is closed once the
/// mapping exists; the mapping is released on [`close`](BlockSource::close)
/// or drop.
///
/// Reftable files are written once and never modified in place. Truncating
/// a file while it is mapped makes later reads fault.
#[derive(Debug)]
pub struct FileBlockSource {
    path: PathBuf,
    size: u64,
    /// `None` for an empty file, which has nothing to map.
    map: Option<Mmap>,
}

impl FileBlockSource {
    /// Map `path` with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &FileSourceConfig::default())
    }

    /// Map `path` read-only.
    ///
    /// A missing file yields [`BlockSourceError::NotFound`]; any other open,
    /// stat or mapping failure, or a path that is not a regular file, yields
    /// [`BlockSourceError::Io`].
    pub fn open_with(path: impl AsRef<Path>, config: &FileSourceConfig) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                debug!(path = %path.display(), "block source file does not exist");
                BlockSourceError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                io_error(path, e)
            }
        })?;

        let metadata = file.metadata().map_err(|e| io_error(path, e))?;
        if !metadata.is_file() {
            return Err(io_error(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        let size = metadata.len();

        let map = if size == 0 {
            None
        } else {
            let len = usize::try_from(size).map_err(|_| {
                io_error(
                    path,
                    io::Error::new(io::ErrorKind::InvalidInput, "file too large to map"),
                )
            })?;
            let mut options = MmapOptions::new();
            options.len(len);
            if config.populate {
                options.populate();
            }
            // SAFETY: the mapping is read-only and private to this source.
            // Table files are immutable once written; see the type docs for
            // the truncation caveat shared by every file mapping.
            let map = unsafe { options.map(&file) }.map_err(|e| io_error(path, e))?;
            Some(map)
        };

        debug!(path = %path.display(), size, populate = config.populate, "mapped block source");
        Ok(Self {
            path: path.to_path_buf(),
            size,
            map,
        })
    }

    /// Path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }
}

fn io_error(path: &Path, source: io::Error) -> BlockSourceError {
    warn!(path = %path.display(), error = %source, "failed to bind block source");
    BlockSourceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl BlockSource for FileBlockSource {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_block(&self, offset: u64, len: u32) -> Result<Block<'_>> {
        check_range(offset, len, self.size);
        let start = offset as usize;
        let end = start + len as usize;
        Ok(Block::borrowed(&self.bytes()[start..end]))
    }

    fn return_block(&self, _block: Block<'_>) {}

    fn close(self: Box<Self>) {
        debug!(path = %self.path.display(), size = self.size, "unmapping block source");
        drop(self);
    }
}
