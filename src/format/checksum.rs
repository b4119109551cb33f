//! CRC32 seals for the file header and body
//!
//! The header seal covers the header bytes in front of it; the body seal
//! covers the stored body exactly as written, compressed or not. A mismatch
//! is never repaired; the load fails.

use crc32fast::Hasher;

/// Number of leading header bytes covered by the header seal.
pub const SEALED_HEADER_LEN: usize = 20;

fn crc32(parts: &[&[u8]]) -> u32 {
    let mut hasher = Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()
}

/// Seal over the sealed prefix of an encoded header.
pub fn header_seal(header: &[u8]) -> u32 {
    crc32(&[&header[..SEALED_HEADER_LEN]])
}

/// Seal over the stored body bytes.
pub fn body_seal(body: &[u8]) -> u32 {
    crc32(&[body])
}

/// Checks a body against the seal read from the trailer.
pub fn body_seal_matches(body: &[u8], trailer: [u8; 4]) -> bool {
    body_seal(body) == u32::from_le_bytes(trailer)
}
