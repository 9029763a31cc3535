//! Hash format identifiers and their digest sizes.
//!
//! A table header names its object-id hash by a 32-bit format id. Ids read
//! from disk or the command line are validated with [`HashFormat::try_from`];
//! [`hash_size`] is for ids that already passed validation and treats an
//! unknown id as an internal-consistency fault.

use std::fmt;
use std::str::FromStr;

use crate::error::{BasicsError, Result};

/// Format id of SHA-1, the bytes `"sha1"`.
pub const SHA1_FORMAT_ID: u32 = 0x7368_6131;
/// Format id of SHA-256, the bytes `"s256"`.
pub const SHA256_FORMAT_ID: u32 = 0x7332_3536;

/// Raw SHA-1 digest length.
pub const SHA1_SIZE: usize = 20;
/// Raw SHA-256 digest length.
pub const SHA256_SIZE: usize = 32;

/// Digest byte length for a validated format id.
///
/// `0` is the legacy "unset" id and means SHA-1.
///
/// # Panics
///
/// Panics on any other id. Only corrupted internal configuration can reach
/// that path.
pub fn hash_size(format_id: u32) -> usize {
    match format_id {
        0 | SHA1_FORMAT_ID => SHA1_SIZE,
        SHA256_FORMAT_ID => SHA256_SIZE,
        other => {
            tracing::error!(format_id = other, "unknown hash format id");
            panic!("unknown hash format id {other:#010x}");
        }
    }
}

/// A supported object-id hash algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum HashFormat {
    #[default]
    Sha1,
    Sha256,
}

impl HashFormat {
    /// The on-disk format id.
    pub const fn format_id(self) -> u32 {
        match self {
            HashFormat::Sha1 => SHA1_FORMAT_ID,
            HashFormat::Sha256 => SHA256_FORMAT_ID,
        }
    }

    /// Raw digest length in bytes.
    pub const fn size(self) -> usize {
        match self {
            HashFormat::Sha1 => SHA1_SIZE,
            HashFormat::Sha256 => SHA256_SIZE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            HashFormat::Sha1 => "sha1",
            HashFormat::Sha256 => "sha256",
        }
    }
}

impl TryFrom<u32> for HashFormat {
    type Error = BasicsError;

    fn try_from(format_id: u32) -> Result<Self> {
        match format_id {
            0 | SHA1_FORMAT_ID => Ok(HashFormat::Sha1),
            SHA256_FORMAT_ID => Ok(HashFormat::Sha256),
            other => Err(BasicsError::UnknownHashFormat(other)),
        }
    }
}

impl FromStr for HashFormat {
    type Err = BasicsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sha1" => Ok(HashFormat::Sha1),
            "sha256" => Ok(HashFormat::Sha256),
            other => Err(BasicsError::InvalidHashFormat(other.to_string())),
        }
    }
}

impl fmt::Display for HashFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
