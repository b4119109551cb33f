//! On-disk format versions
//!
//! Known versions are 100, 101, 104, 105, 106, 107 and 108. The gaps are
//! reserved and are never written. Each version is strictly additive over
//! the previous one.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A format version this implementation can read and write.
///
/// Variant declaration order is the numeric order, so the derived `Ord`
/// matches "supports at least".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum FileVersion {
    #[default]
    V100 = 100,
    V101 = 101,
    V104 = 104,
    V105 = 105,
    V106 = 106,
    V107 = 107,
    V108 = 108,
}

impl FileVersion {
    /// Every known version in ascending order.
    pub const ALL: [FileVersion; 7] = [
        FileVersion::V100,
        FileVersion::V101,
        FileVersion::V104,
        FileVersion::V105,
        FileVersion::V106,
        FileVersion::V107,
        FileVersion::V108,
    ];

    /// Version written for documents using no optional feature.
    pub const BASELINE: FileVersion = FileVersion::V100;

    pub const LATEST: FileVersion = FileVersion::V108;

    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Maps a raw header value to a known version; reserved gaps yield `None`.
    pub fn from_u32(raw: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_u32() == raw)
    }

    /// True if a file at this version can carry something introduced at `other`.
    pub fn supports(self, other: FileVersion) -> bool {
        self >= other
    }

    /// Major.minor display form used in messages, e.g. `1.8`.
    pub fn dotted(self) -> String {
        let raw = self.as_u32();
        format!("{}.{}", raw / 100, raw % 100)
    }
}

impl fmt::Display for FileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

impl Serialize for FileVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_u32())
    }
}

impl<'de> Deserialize<'de> for FileVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        FileVersion::from_u32(raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown file version {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_strictly_ascending() {
        for pair in FileVersion::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].as_u32() < pair[1].as_u32());
        }
    }

    #[test]
    fn test_reserved_gaps_are_unknown() {
        assert_eq!(FileVersion::from_u32(102), None);
        assert_eq!(FileVersion::from_u32(103), None);
        assert_eq!(FileVersion::from_u32(99), None);
        assert_eq!(FileVersion::from_u32(109), None);
        assert_eq!(FileVersion::from_u32(104), Some(FileVersion::V104));
    }

    #[test]
    fn test_supports_is_ordering() {
        assert!(FileVersion::V106.supports(FileVersion::V101));
        assert!(FileVersion::V106.supports(FileVersion::V106));
        assert!(!FileVersion::V105.supports(FileVersion::V106));
    }

    #[test]
    fn test_dotted_form() {
        assert_eq!(FileVersion::V108.dotted(), "1.8");
        assert_eq!(FileVersion::V100.dotted(), "1.0");
    }

    #[test]
    fn test_serde_uses_integer() {
        assert_eq!(serde_json::to_string(&FileVersion::V105).unwrap(), "105");
        let v: FileVersion = serde_json::from_str("107").unwrap();
        assert_eq!(v, FileVersion::V107);
        assert!(serde_json::from_str::<FileVersion>("103").is_err());
    }
}
