//! Fixed-width big-endian integer fields.
//!
//! On-disk layout:
//! ```text
//! be16: [hi, lo]                (0..=0xFFFF)
//! be24: [b2, b1, b0]            (0..=0xFF_FFFF)
//! be32 / be64: network order, as `u32::to_be_bytes` / `u64::to_be_bytes`
//! ```
//!
//! Encoding keeps only the low bits that fit the field; anything above is
//! silently dropped. That truncation is part of the wire format.
//!
//! The slice-based `put_*` / `get_*` helpers operate on the head of the slice
//! and panic if it is shorter than the field, like slice indexing does.

/// Encode the low 16 bits of `value`.
pub fn encode_be16(value: u32) -> [u8; 2] {
    [(value >> 8) as u8, value as u8]
}

/// Decode a 16-bit big-endian field.
pub fn decode_be16(bytes: [u8; 2]) -> u16 {
    (u16::from(bytes[0]) << 8) | u16::from(bytes[1])
}

/// Encode the low 24 bits of `value`.
pub fn encode_be24(value: u32) -> [u8; 3] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// Decode a 24-bit big-endian field.
pub fn decode_be24(bytes: [u8; 3]) -> u32 {
    (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2])
}

/// Write the low 16 bits of `value` to `out[0..2]`.
pub fn put_be16(out: &mut [u8], value: u32) {
    out[..2].copy_from_slice(&encode_be16(value));
}

/// Read a 16-bit field from `input[0..2]`.
pub fn get_be16(input: &[u8]) -> u16 {
    decode_be16([input[0], input[1]])
}

/// Write the low 24 bits of `value` to `out[0..3]`.
pub fn put_be24(out: &mut [u8], value: u32) {
    out[..3].copy_from_slice(&encode_be24(value));
}

/// Read a 24-bit field from `input[0..3]`.
pub fn get_be24(input: &[u8]) -> u32 {
    decode_be24([input[0], input[1], input[2]])
}

/// Write `value` to `out[0..4]`.
pub fn put_be32(out: &mut [u8], value: u32) {
    out[..4].copy_from_slice(&value.to_be_bytes());
}

/// Read a 32-bit field from `input[0..4]`.
pub fn get_be32(input: &[u8]) -> u32 {
    u32::from_be_bytes([input[0], input[1], input[2], input[3]])
}

/// Write `value` to `out[0..8]`.
pub fn put_be64(out: &mut [u8], value: u64) {
    out[..8].copy_from_slice(&value.to_be_bytes());
}

/// Read a 64-bit field from `input[0..8]`.
pub fn get_be64(input: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&input[..8]);
    u64::from_be_bytes(bytes)
}
