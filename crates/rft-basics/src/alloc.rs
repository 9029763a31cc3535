//! Allocator indirection.
//!
//! Every byte buffer the reftable layers hand out is obtained through an
//! [`Allocator`]. Two forms are supported:
//!
//! - **Explicit**: pass an `Arc<dyn Allocator>` into constructors that accept
//!   one (see `parse_names_with` and the buffer block source).
//! - **Global hooks**: an embedding application may install process-wide
//!   [`AllocHooks`] once at startup. [`HookedAllocator`] (the default strategy)
//!   routes through whichever hooks are installed and falls back to
//!   [`SystemAllocator`] for any hook left unset.
//!
//! Hooks must be installed before any concurrent allocation and never
//! reconfigured afterwards. The hook table sits behind a lock so a violation
//! cannot tear the table, but allocations already in flight may observe
//! either configuration.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::AllocError;

/// Result alias for allocation operations.
pub type AllocResult<T> = std::result::Result<T, AllocError>;

/// Allocate a buffer with capacity for at least `size` bytes.
pub type AllocateHook = fn(usize) -> Option<Vec<u8>>;
/// Resize a buffer to hold `size` bytes, preserving its leading content.
pub type ReallocateHook = fn(Vec<u8>, usize) -> Option<Vec<u8>>;
/// Release a buffer previously obtained from the allocate hook.
pub type ReleaseHook = fn(Vec<u8>);

/// Process-wide allocator overrides. Unset hooks use the platform allocator.
#[derive(Clone, Copy, Default)]
pub struct AllocHooks {
    pub allocate: Option<AllocateHook>,
    pub reallocate: Option<ReallocateHook>,
    pub release: Option<ReleaseHook>,
}

impl AllocHooks {
    /// No overrides installed.
    pub const NONE: Self = Self {
        allocate: None,
        reallocate: None,
        release: None,
    };
}

impl fmt::Debug for AllocHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocHooks")
            .field("allocate", &self.allocate.is_some())
            .field("reallocate", &self.reallocate.is_some())
            .field("release", &self.release.is_some())
            .finish()
    }
}

static HOOKS: RwLock<AllocHooks> = RwLock::new(AllocHooks::NONE);

/// Install process-wide allocator hooks.
///
/// Call once during startup, before any thread allocates through the
/// reftable layers.
pub fn set_alloc_hooks(hooks: AllocHooks) {
    *HOOKS.write().unwrap_or_else(PoisonError::into_inner) = hooks;
}

/// Remove all installed hooks, restoring the platform allocator.
pub fn reset_alloc_hooks() {
    set_alloc_hooks(AllocHooks::NONE);
}

/// The currently installed hooks.
pub fn alloc_hooks() -> AllocHooks {
    *HOOKS.read().unwrap_or_else(PoisonError::into_inner)
}

/// Allocation strategy for byte buffers.
///
/// A buffer returned by [`allocate`](Allocator::allocate) is empty with
/// capacity for the requested size; [`allocate_zeroed`](Allocator::allocate_zeroed)
/// and [`duplicate`](Allocator::duplicate) return initialized buffers.
pub trait Allocator: Send + Sync + fmt::Debug {
    /// Obtain an empty buffer with capacity for at least `size` bytes.
    fn allocate(&self, size: usize) -> AllocResult<Vec<u8>>;

    /// Grow or shrink `buf` to hold `size` bytes. Content beyond `size` is
    /// discarded; content below it is preserved.
    fn reallocate(&self, buf: Vec<u8>, size: usize) -> AllocResult<Vec<u8>>;

    /// Give a buffer back.
    fn release(&self, buf: Vec<u8>);

    /// Allocate `count * elem_size` zero bytes.
    ///
    /// The multiplication is overflow-checked before anything is allocated.
    fn allocate_zeroed(&self, count: usize, elem_size: usize) -> AllocResult<Vec<u8>> {
        let size = count
            .checked_mul(elem_size)
            .ok_or(AllocError::CapacityOverflow { count, elem_size })?;
        let mut buf = self.allocate(size)?;
        buf.clear();
        buf.resize(size, 0);
        Ok(buf)
    }

    /// Copy `src` into a freshly allocated buffer.
    fn duplicate(&self, src: &[u8]) -> AllocResult<Vec<u8>> {
        let mut buf = self.allocate(src.len())?;
        buf.clear();
        buf.extend_from_slice(src);
        Ok(buf)
    }
}

/// The platform allocator, with allocation failure surfaced as an error.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    fn allocate(&self, size: usize) -> AllocResult<Vec<u8>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(size)
            .map_err(|_| AllocError::OutOfMemory { requested: size })?;
        Ok(buf)
    }

    fn reallocate(&self, mut buf: Vec<u8>, size: usize) -> AllocResult<Vec<u8>> {
        if size < buf.len() {
            buf.truncate(size);
            buf.shrink_to(size);
        } else {
            buf.try_reserve_exact(size - buf.len())
                .map_err(|_| AllocError::OutOfMemory { requested: size })?;
        }
        Ok(buf)
    }

    fn release(&self, buf: Vec<u8>) {
        drop(buf);
    }
}

/// Routes through the installed [`AllocHooks`], falling back per hook to
/// [`SystemAllocator`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HookedAllocator;

impl Allocator for HookedAllocator {
    fn allocate(&self, size: usize) -> AllocResult<Vec<u8>> {
        match alloc_hooks().allocate {
            Some(hook) => hook(size).ok_or(AllocError::OutOfMemory { requested: size }),
            None => SystemAllocator.allocate(size),
        }
    }

    fn reallocate(&self, buf: Vec<u8>, size: usize) -> AllocResult<Vec<u8>> {
        match alloc_hooks().reallocate {
            Some(hook) => hook(buf, size).ok_or(AllocError::OutOfMemory { requested: size }),
            None => SystemAllocator.reallocate(buf, size),
        }
    }

    fn release(&self, buf: Vec<u8>) {
        match alloc_hooks().release {
            Some(hook) => hook(buf),
            None => SystemAllocator.release(buf),
        }
    }
}

/// The default allocation strategy: the global hooks.
pub fn default_allocator() -> Arc<dyn Allocator> {
    Arc::new(HookedAllocator)
}

/// Allocate through the global hooks.
pub fn allocate(size: usize) -> AllocResult<Vec<u8>> {
    HookedAllocator.allocate(size)
}

/// Reallocate through the global hooks.
pub fn reallocate(buf: Vec<u8>, size: usize) -> AllocResult<Vec<u8>> {
    HookedAllocator.reallocate(buf, size)
}

/// Release through the global hooks.
pub fn release(buf: Vec<u8>) {
    HookedAllocator.release(buf)
}

/// Overflow-checked zeroed allocation through the global hooks.
pub fn allocate_zeroed(count: usize, elem_size: usize) -> AllocResult<Vec<u8>> {
    HookedAllocator.allocate_zeroed(count, elem_size)
}

/// Duplicate a byte string through the global hooks.
pub fn duplicate_string(src: &[u8]) -> AllocResult<Vec<u8>> {
    HookedAllocator.duplicate(src)
}
