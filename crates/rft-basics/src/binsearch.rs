//! Smallest-true-index search over a monotonic predicate.
//!
//! Block and index readers locate restart points and records by key through
//! [`find_first_true`]. The predicate may have side effects (decoding a key,
//! recording an error); each index is probed at most once per search.

/// Answer of a search predicate for one index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// The index lies before the boundary.
    No,
    /// The index lies at or after the boundary.
    Yes,
    /// Stop searching immediately.
    Abort,
}

impl From<bool> for Probe {
    fn from(value: bool) -> Self {
        if value {
            Probe::Yes
        } else {
            Probe::No
        }
    }
}

/// Return the smallest `i` in `[0, size)` with `predicate(i) == Yes`, or
/// `size` if there is none.
///
/// The predicate is assumed to be `No` for a prefix and `Yes` for the
/// remaining suffix; this is not checked, and a non-monotonic predicate
/// yields some boundary index. If the predicate returns [`Probe::Abort`] the
/// search stops and returns `size`, so callers that can abort must record
/// the reason themselves (see [`try_find_first_true`]).
///
/// # Examples
///
/// ```
/// use rft_basics::binsearch::{find_first_true, Probe};
///
/// let keys = [10, 20, 30, 40];
/// assert_eq!(find_first_true(keys.len(), |i| Probe::from(keys[i] >= 25)), 2);
/// assert_eq!(find_first_true(keys.len(), |i| Probe::from(keys[i] >= 99)), 4);
/// ```
pub fn find_first_true<F>(size: usize, mut predicate: F) -> usize
where
    F: FnMut(usize) -> Probe,
{
    if size == 0 {
        return 0;
    }

    // Invariants:
    //   hi == size || predicate(hi) == Yes
    //   (lo == 0 && predicate(0) unknown) || predicate(lo) == No
    let mut lo = 0;
    let mut hi = size;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        match predicate(mid) {
            Probe::Abort => return size,
            Probe::Yes => hi = mid,
            Probe::No => lo = mid,
        }
    }

    if lo != 0 {
        return hi;
    }

    match predicate(0) {
        Probe::Abort => size,
        Probe::Yes => 0,
        Probe::No => hi,
    }
}

/// [`find_first_true`] with a fallible predicate.
///
/// The first error aborts the search and is returned.
pub fn try_find_first_true<F, E>(size: usize, mut predicate: F) -> Result<usize, E>
where
    F: FnMut(usize) -> Result<bool, E>,
{
    let mut failure = None;
    let idx = find_first_true(size, |i| match predicate(i) {
        Ok(found) => Probe::from(found),
        Err(e) => {
            failure = Some(e);
            Probe::Abort
        }
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(idx),
    }
}
