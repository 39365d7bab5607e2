//! Version keys for ordering vendored package copies.

use std::fmt;

const SEGMENT_WEIGHTS: [i64; 4] = [1_000_000_000, 1_000_000, 1_000, 1];

/// An encoded package version.
///
/// `Version` packs up to four dotted numeric segments into one integer
/// (`major·10⁹ + minor·10⁶ + patch·10³ + build`) so versions compare and
/// subtract as plain numbers. Build one with [`Version::encode`].
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Version(i64);

impl Version {
    /// The zero version, also the encoding of empty or garbage input.
    pub const ZERO: Version = Version(0);

    /// Get the encoded key.
    #[inline]
    pub const fn key(self) -> i64 {
        self.0
    }

    /// Encode a version string.
    ///
    /// A single leading `v` is stripped. Segments are read left to right;
    /// the first segment that is not all ASCII digits (or does not fit in
    /// 64 bits) and every segment after it count as zero, so `1.2.3-alpha`
    /// encodes like `1.2.0`. Missing segments are zero and anything past
    /// the fourth segment is ignored. Never fails.
    pub fn encode(raw: &str) -> Self {
        let trimmed = raw.strip_prefix('v').unwrap_or(raw);

        let mut key: i64 = 0;
        for (segment, weight) in trimmed.split('.').zip(SEGMENT_WEIGHTS) {
            let Some(value) = parse_segment(segment) else {
                break;
            };
            key = key.saturating_add(value.saturating_mul(weight));
        }

        Self(key)
    }
}

fn parse_segment(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<i64>().ok()
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.0;
        write!(
            f,
            "{}.{}.{}.{}",
            key / 1_000_000_000,
            key / 1_000_000 % 1_000,
            key / 1_000 % 1_000,
            key % 1_000
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_plain() {
        assert_eq!(Version::encode("1.2.3").key(), 1_002_003_000);
        assert_eq!(Version::encode("1.2.3.4").key(), 1_002_003_004);
        assert_eq!(Version::encode("2").key(), 2_000_000_000);
    }

    #[test]
    fn test_encode_strips_single_v() {
        assert_eq!(Version::encode("v1.0.0"), Version::encode("1.0.0"));
        // only one prefix is stripped
        assert_eq!(Version::encode("vv1.0.0"), Version::ZERO);
    }

    #[test]
    fn test_encode_downgrades_after_marker() {
        assert_eq!(Version::encode("1.2.3-alpha").key(), 1_002_000_000);
        assert_eq!(Version::encode("1.2.3-alpha"), Version::encode("1.2.0"));
        assert_eq!(Version::encode("2.3.4-beta.1").key(), 2_003_000_000);
        assert_eq!(Version::encode("1.x.5").key(), 1_000_000_000);
    }

    #[test]
    fn test_encode_garbage_is_zero() {
        assert_eq!(Version::encode(""), Version::ZERO);
        assert_eq!(Version::encode("v"), Version::ZERO);
        assert_eq!(Version::encode("dev-main"), Version::ZERO);
        assert_eq!(Version::encode("..."), Version::ZERO);
    }

    #[test]
    fn test_encode_extra_segments_ignored() {
        assert_eq!(Version::encode("1.2.3.4.5"), Version::encode("1.2.3.4"));
    }

    #[test]
    fn test_encode_saturates() {
        let huge = Version::encode("99999999999999999999.1");
        assert_eq!(huge, Version::ZERO);

        let big = Version::encode("9223372036854775807.9");
        assert_eq!(big.key(), i64::MAX);
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::encode("1.2.3").to_string(), "1.2.3.0");
        assert_eq!(Version::encode("v10.20.30.40").to_string(), "10.20.30.40");
    }
}
