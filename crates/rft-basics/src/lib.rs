//! Foundations for the reftable format.
//!
//! Reftable is a block-structured, binary-searchable, key-ordered table
//! format for references. This crate holds the small pieces every layer
//! above it leans on; it never interprets table contents itself.
//!
//! # Modules
//!
//! - [`alloc`] — allocator indirection: global hooks and the [`Allocator`] strategy
//! - [`codec`] — fixed-width big-endian integer fields
//! - [`binsearch`] — smallest-true-index search with an abort signal
//! - [`names`] — newline-delimited name lists and common-prefix length
//! - [`hash`] — hash format ids and digest sizes
//! - [`error`] — error types

pub mod alloc;
pub mod binsearch;
pub mod codec;
pub mod error;
pub mod hash;
pub mod names;

pub use crate::alloc::{
    allocate, allocate_zeroed, default_allocator, duplicate_string, reallocate, release,
    reset_alloc_hooks, set_alloc_hooks, AllocHooks, AllocResult, Allocator, HookedAllocator,
    SystemAllocator,
};
pub use binsearch::{find_first_true, try_find_first_true, Probe};
pub use codec::{
    decode_be16, decode_be24, encode_be16, encode_be24, get_be16, get_be24, get_be32, get_be64,
    put_be16, put_be24, put_be32, put_be64,
};
pub use error::{AllocError, BasicsError, Result};
pub use hash::{hash_size, HashFormat, SHA1_FORMAT_ID, SHA256_FORMAT_ID};
pub use names::{
    common_prefix_size, free_names, free_names_with, names_equal, names_length, parse_names,
    parse_names_with, Names,
};
