//! Block sources for the reftable format.
//!
//! Table readers fetch raw bytes through the [`BlockSource`] trait without
//! knowing whether they live in memory or on disk.
//!
//! # Backends
//!
//! - [`BufferBlockSource`] — wraps a borrowed byte buffer; every block is a
//!   fresh copy that is poisoned when returned
//! - [`FileBlockSource`] — maps a file read-only at open time; every block
//!   is a zero-copy view into the mapping
//!
//! [`BlockSourceHandle`] holds one backend and enforces bind-once.
//!
//! # Lifecycle
//!
//! ```text
//! open/bind ──► read_block ──► return_block ──► ... ──► close
//!                  │                ▲
//!                  └──── Block ─────┘
//! ```
//!
//! Blocks borrow their source, so the compiler rejects a block that outlives
//! `close`. Reads outside `[0, size)` panic.

pub mod block;
pub mod buffer;
pub mod config;
pub mod error;
pub mod file;
pub mod handle;
pub mod traits;

pub use block::Block;
pub use buffer::{BufferBlockSource, POISON_BYTE};
pub use config::FileSourceConfig;
pub use error::{BlockSourceError, Result};
pub use file::FileBlockSource;
pub use handle::BlockSourceHandle;
pub use traits::BlockSource;

#[cfg(test)]
mod tests {
    use super::*;
    use rft_basics::{decode_be24, find_first_true, get_be32, Probe};
    use std::io::Write;

    /// A toy table: 4-byte magic, 3-byte record count, then fixed 8-byte
    /// records sorted by key.
    fn make_table() -> Vec<u8> {
        let mut table = b"REFT".to_vec();
        table.extend_from_slice(&rft_basics::encode_be24(5));
        for key in [10u32, 20, 30, 40, 50] {
            table.extend_from_slice(&key.to_be_bytes());
            table.extend_from_slice(&(key * 100).to_be_bytes());
        }
        table
    }

    fn lookup(source: &dyn BlockSource, key: u32) -> Option<u32> {
        let header = source.read_block(4, 3).unwrap();
        let count = decode_be24([header[0], header[1], header[2]]) as usize;
        source.return_block(header);

        let idx = find_first_true(count, |i| {
            let rec = source.read_block(7 + 8 * i as u64, 4).unwrap();
            let probe = Probe::from(get_be32(&rec) >= key);
            source.return_block(rec);
            probe
        });
        if idx == count {
            return None;
        }

        let rec = source.read_block(7 + 8 * idx as u64, 8).unwrap();
        let found = (get_be32(&rec) == key).then(|| get_be32(&rec[4..]));
        source.return_block(rec);
        found
    }

    #[test]
    fn backends_serve_identical_bytes() {
        let table = make_table();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&table).unwrap();
        file.flush().unwrap();

        let buffer = BufferBlockSource::new(&table);
        let mapped = FileBlockSource::open(file.path()).unwrap();
        assert_eq!(buffer.size(), mapped.size());

        for (offset, len) in [(0u64, 4u32), (4, 3), (7, 8), (0, table.len() as u32)] {
            let a = buffer.read_block(offset, len).unwrap();
            let b = mapped.read_block(offset, len).unwrap();
            assert_eq!(a.as_bytes(), b.as_bytes(), "range {offset}+{len}");
            buffer.return_block(a);
            mapped.return_block(b);
        }
    }

    #[test]
    fn keyed_lookup_through_either_backend() {
        let table = make_table();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&table).unwrap();
        file.flush().unwrap();

        let buffer = BufferBlockSource::new(&table);
        let mapped = FileBlockSource::open(file.path()).unwrap();
        for source in [&buffer as &dyn BlockSource, &mapped] {
            assert_eq!(lookup(source, 30), Some(3000));
            assert_eq!(lookup(source, 10), Some(1000));
            assert_eq!(lookup(source, 50), Some(5000));
            assert_eq!(lookup(source, 35), None);
            assert_eq!(lookup(source, 99), None);
        }
    }

    #[test]
    fn boxed_sources_close_through_the_trait() {
        let table = make_table();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&table).unwrap();
        file.flush().unwrap();

        let sources: Vec<Box<dyn BlockSource + '_>> = vec![
            Box::new(BufferBlockSource::new(&table)),
            Box::new(FileBlockSource::open(file.path()).unwrap()),
        ];
        for source in sources {
            assert_eq!(source.size(), table.len() as u64);
            source.close();
        }
    }
}
