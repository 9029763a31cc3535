//! Newline-delimited name lists and small byte-buffer helpers.
//!
//! A name list is the text form of a stack of table names (one per line, as
//! in `tables.list`). Lines are opaque byte strings; they are never
//! validated as UTF-8.

use std::fmt;

use crate::alloc::{AllocResult, Allocator, HookedAllocator};
use crate::error::AllocError;

/// Insertion-ordered list of owned names. Duplicates are kept.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Names {
    entries: Vec<Vec<u8>>,
}

impl Names {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The name at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.entries.get(index).map(Vec::as_slice)
    }

    /// Iterate names in list order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.entries.iter().map(Vec::as_slice)
    }

    /// Take ownership of the underlying names.
    pub fn into_vec(self) -> Vec<Vec<u8>> {
        self.entries
    }
}

impl<T: AsRef<[u8]>> FromIterator<T> for Names {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|n| n.as_ref().to_vec()).collect(),
        }
    }
}

impl fmt::Debug for Names {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|n| String::from_utf8_lossy(n)))
            .finish()
    }
}

/// Split `buf` on `'\n'` and collect the non-empty lines, allocating through
/// the global hooks.
///
/// A final line without a trailing newline is kept.
pub fn parse_names(buf: &[u8]) -> AllocResult<Names> {
    parse_names_with(&HookedAllocator, buf)
}

/// [`parse_names`] with an explicit allocator.
///
/// On allocation failure every name parsed so far is released and the error
/// is returned.
pub fn parse_names_with(allocator: &dyn Allocator, buf: &[u8]) -> AllocResult<Names> {
    let mut entries: Vec<Vec<u8>> = Vec::new();

    for line in buf.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        let name = entries
            .try_reserve(1)
            .map_err(|_| AllocError::OutOfMemory {
                requested: std::mem::size_of::<Vec<u8>>(),
            })
            .and_then(|()| allocator.duplicate(line));
        match name {
            Ok(name) => entries.push(name),
            Err(e) => {
                release_entries(allocator, entries);
                return Err(e);
            }
        }
    }

    Ok(Names { entries })
}

/// Number of names in the list.
pub fn names_length(names: &Names) -> usize {
    names.len()
}

/// `true` iff both lists hold the same names in the same order.
pub fn names_equal(a: &Names, b: &Names) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

/// Release every name through the global hooks. `None` is accepted.
pub fn free_names(names: Option<Names>) {
    free_names_with(&HookedAllocator, names)
}

/// [`free_names`] with an explicit allocator.
pub fn free_names_with(allocator: &dyn Allocator, names: Option<Names>) {
    if let Some(names) = names {
        release_entries(allocator, names.entries);
    }
}

fn release_entries(allocator: &dyn Allocator, entries: Vec<Vec<u8>>) {
    for entry in entries {
        allocator.release(entry);
    }
}

/// Length of the longest common prefix of `a` and `b`.
pub fn common_prefix_size(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::SystemAllocator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Succeeds for the first `budget` allocations, then fails.
    #[derive(Debug)]
    struct BudgetAllocator {
        budget: usize,
        allocated: AtomicUsize,
        released: AtomicUsize,
    }

    impl BudgetAllocator {
        fn new(budget: usize) -> Self {
            Self {
                budget,
                allocated: AtomicUsize::new(0),
                released: AtomicUsize::new(0),
            }
        }
    }

    impl Allocator for BudgetAllocator {
        fn allocate(&self, size: usize) -> AllocResult<Vec<u8>> {
            if self.allocated.load(Ordering::SeqCst) >= self.budget {
                return Err(AllocError::OutOfMemory { requested: size });
            }
            self.allocated.fetch_add(1, Ordering::SeqCst);
            SystemAllocator.allocate(size)
        }

        fn reallocate(&self, buf: Vec<u8>, size: usize) -> AllocResult<Vec<u8>> {
            SystemAllocator.reallocate(buf, size)
        }

        fn release(&self, _buf: Vec<u8>) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn names(list: &[&str]) -> Names {
        list.iter().collect()
    }

    #[test]
    fn parse_skips_empty_lines() {
        let parsed = parse_names(b"a\nb\n\nc").unwrap();
        assert_eq!(parsed, names(&["a", "b", "c"]));
    }

    #[test]
    fn parse_empty_buffer() {
        let parsed = parse_names(b"").unwrap();
        assert!(parsed.is_empty());
        assert_eq!(names_length(&parsed), 0);
    }

    #[test]
    fn parse_without_trailing_newline() {
        assert_eq!(parse_names(b"x").unwrap(), names(&["x"]));
    }

    #[test]
    fn parse_with_trailing_newline() {
        let parsed = parse_names(b"t1.ref\nt2.ref\n").unwrap();
        assert_eq!(parsed, names(&["t1.ref", "t2.ref"]));
    }

    #[test]
    fn parse_keeps_duplicates_and_order() {
        let parsed = parse_names(b"b\na\nb\n").unwrap();
        assert_eq!(parsed, names(&["b", "a", "b"]));
        assert_eq!(parsed.get(2), Some(b"b".as_slice()));
    }

    #[test]
    fn parse_only_newlines() {
        assert!(parse_names(b"\n\n\n").unwrap().is_empty());
    }

    #[test]
    fn parse_treats_lines_as_bytes() {
        let parsed = parse_names(b"\xff\xfe\nok\0mid").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get(0), Some(b"\xff\xfe".as_slice()));
        assert_eq!(parsed.get(1), Some(b"ok\0mid".as_slice()));
    }

    #[test]
    fn parse_failure_releases_partial_entries() {
        let allocator = BudgetAllocator::new(2);
        let err = parse_names_with(&allocator, b"one\ntwo\nthree\n").unwrap_err();
        assert!(err.is_out_of_memory());
        assert_eq!(allocator.allocated.load(Ordering::SeqCst), 2);
        assert_eq!(allocator.released.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn free_releases_every_name() {
        let allocator = BudgetAllocator::new(usize::MAX);
        let parsed = parse_names_with(&allocator, b"a\nb\nc").unwrap();
        free_names_with(&allocator, Some(parsed));
        assert_eq!(allocator.released.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn free_tolerates_none() {
        free_names(None);
        let allocator = BudgetAllocator::new(0);
        free_names_with(&allocator, None);
        assert_eq!(allocator.released.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn equality_rules() {
        assert!(names_equal(&names(&[]), &names(&[])));
        assert!(!names_equal(&names(&["a"]), &names(&["a", "b"])));
        assert!(!names_equal(&names(&["a", "b"]), &names(&["a"])));
        assert!(!names_equal(&names(&["a", "b"]), &names(&["a", "c"])));
        assert!(!names_equal(&names(&["a", "b"]), &names(&["b", "a"])));

        let list = names(&["x", "y"]);
        assert!(names_equal(&list, &list));
    }

    #[test]
    fn common_prefix() {
        assert_eq!(common_prefix_size(b"abcdef", b"abcxyz"), 3);
        assert_eq!(common_prefix_size(b"ab", b"abcdef"), 2);
        assert_eq!(common_prefix_size(b"x", b"y"), 0);
        assert_eq!(common_prefix_size(b"", b"abc"), 0);
        assert_eq!(common_prefix_size(b"same", b"same"), 4);
    }

    #[test]
    fn debug_is_lossy_text() {
        assert_eq!(format!("{:?}", names(&["a", "b"])), r#"["a", "b"]"#);
    }
}
