//! Fixed-size file header
//!
//! ```text
//! +---------------------+
//! | Magic "RKTD"        | (4 bytes)
//! +---------------------+
//! | Version             | (u32 LE)
//! +---------------------+
//! | Flags               | (u8, bit 0 = gzip body)
//! +---------------------+
//! | Reserved            | (3 bytes, zero)
//! +---------------------+
//! | Body Length         | (u64 LE)
//! +---------------------+
//! | Header Checksum     | (u32 LE, CRC32 of the 20 bytes above)
//! +---------------------+
//! ```
//!
//! The header is self-contained so a reader can learn the version without
//! touching the body. The body follows immediately and is itself followed by
//! a u32 LE CRC32 of the stored body bytes.

use std::io::{self, Read};

use super::checksum::{header_seal, SEALED_HEADER_LEN};
use super::errors::{FormatError, FormatResult};
use crate::version::FileVersion;

pub const MAGIC: [u8; 4] = *b"RKTD";

/// Total encoded header size.
pub const HEADER_LEN: usize = 24;

/// Size of the body checksum that follows the body.
pub const TRAILER_LEN: usize = 4;

pub const FLAG_GZIP: u8 = 0x01;
const KNOWN_FLAGS: u8 = FLAG_GZIP;

/// Decoded file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: FileVersion,
    pub compressed: bool,
    /// Length of the stored (possibly compressed) body.
    pub body_len: u64,
}

impl FileHeader {
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&MAGIC);
        buf[4..8].copy_from_slice(&self.version.as_u32().to_le_bytes());
        buf[8] = if self.compressed { FLAG_GZIP } else { 0 };
        // buf[9..12] reserved, zero
        buf[12..SEALED_HEADER_LEN].copy_from_slice(&self.body_len.to_le_bytes());
        let checksum = header_seal(&buf[..]);
        buf[SEALED_HEADER_LEN..].copy_from_slice(&checksum.to_le_bytes());
        buf
    }

    /// Decodes and validates a header.
    ///
    /// Checks run in order: magic, checksum, flags, version. A well-formed
    /// header from a newer writer therefore fails as unsupported, not
    /// malformed.
    pub fn decode(buf: &[u8; HEADER_LEN]) -> FormatResult<Self> {
        if buf[0..4] != MAGIC {
            return Err(FormatError::malformed_header("bad magic"));
        }

        let mut seal = [0u8; 4];
        seal.copy_from_slice(&buf[SEALED_HEADER_LEN..]);
        let stored = u32::from_le_bytes(seal);
        let computed = header_seal(&buf[..]);
        if stored != computed {
            return Err(FormatError::malformed_header(format!(
                "header checksum mismatch: computed {:08x}, stored {:08x}",
                computed, stored
            )));
        }

        let flags = buf[8];
        if flags & !KNOWN_FLAGS != 0 {
            return Err(FormatError::malformed_header(format!(
                "unknown flags {:02x}",
                flags
            )));
        }
        if buf[9..12] != [0, 0, 0] {
            return Err(FormatError::malformed_header(format!(
                "reserved header bytes not zero: {:02x} {:02x} {:02x}",
                buf[9], buf[10], buf[11]
            )));
        }

        let raw_version = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let version = FileVersion::from_u32(raw_version)
            .ok_or_else(|| FormatError::unsupported_version(raw_version))?;

        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&buf[12..SEALED_HEADER_LEN]);

        Ok(Self {
            version,
            compressed: flags & FLAG_GZIP != 0,
            body_len: u64::from_le_bytes(len_bytes),
        })
    }

    /// Reads exactly one header from `source`.
    pub fn read_from<R: Read>(source: &mut R) -> FormatResult<Self> {
        let mut buf = [0u8; HEADER_LEN];
        source.read_exact(&mut buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                FormatError::malformed_header("file is shorter than its header")
            } else {
                FormatError::io_read("failed to read header", e)
            }
        })?;
        Self::decode(&buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatErrorCode;

    fn header() -> FileHeader {
        FileHeader {
            version: FileVersion::V106,
            compressed: true,
            body_len: 4321,
        }
    }

    fn reseal(buf: &mut [u8; HEADER_LEN]) {
        let checksum = header_seal(&buf[..]);
        buf[SEALED_HEADER_LEN..].copy_from_slice(&checksum.to_le_bytes());
    }

    #[test]
    fn test_encode_decode() {
        let encoded = header().encode();
        assert_eq!(&encoded[0..4], b"RKTD");
        assert_eq!(FileHeader::decode(&encoded).unwrap(), header());
    }

    #[test]
    fn test_bad_magic() {
        let mut buf = header().encode();
        buf[0] = b'X';
        let err = FileHeader::decode(&buf).unwrap_err();
        assert_eq!(err.code(), FormatErrorCode::RocketMalformedHeader);
    }

    #[test]
    fn test_bit_flip_fails_checksum() {
        let mut buf = header().encode();
        buf[13] ^= 0x40;
        let err = FileHeader::decode(&buf).unwrap_err();
        assert_eq!(err.code(), FormatErrorCode::RocketMalformedHeader);
        assert!(err.message().contains("checksum"));
    }

    #[test]
    fn test_reserved_version_is_unsupported() {
        let mut buf = header().encode();
        buf[4..8].copy_from_slice(&103u32.to_le_bytes());
        reseal(&mut buf);
        let err = FileHeader::decode(&buf).unwrap_err();
        assert_eq!(err.code(), FormatErrorCode::RocketUnsupportedVersion);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let mut buf = header().encode();
        buf[8] |= 0x80;
        reseal(&mut buf);
        let err = FileHeader::decode(&buf).unwrap_err();
        assert_eq!(err.code(), FormatErrorCode::RocketMalformedHeader);
    }

    #[test]
    fn test_reserved_bytes_rejected_with_own_message() {
        let mut buf = header().encode();
        buf[10] = 0x2a;
        reseal(&mut buf);
        let err = FileHeader::decode(&buf).unwrap_err();
        assert_eq!(err.code(), FormatErrorCode::RocketMalformedHeader);
        assert_eq!(err.message(), "reserved header bytes not zero: 00 2a 00");
    }

    #[test]
    fn test_short_read_is_malformed() {
        let bytes = header().encode();
        let mut short = &bytes[..10];
        let err = FileHeader::read_from(&mut short).unwrap_err();
        assert_eq!(err.code(), FormatErrorCode::RocketMalformedHeader);
    }
}
