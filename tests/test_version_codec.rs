//! Version encoding cases.

use arbiter::Version;
use rstest::rstest;

#[rstest]
#[case("", 0)]
#[case("v", 0)]
#[case("1", 1_000_000_000)]
#[case("1.2", 1_002_000_000)]
#[case("1.2.3", 1_002_003_000)]
#[case("v1.2.3", 1_002_003_000)]
#[case("1.2.3.4", 1_002_003_004)]
#[case("1.2.3-alpha", 1_002_000_000)]
#[case("1.2.0", 1_002_000_000)]
#[case("2.3.4-beta.1", 2_003_000_000)]
#[case("dev-master", 0)]
#[case("1.0.x-dev", 1_000_000_000)]
#[case("10.0.0.0", 10_000_000_000)]
fn test_encode(#[case] raw: &str, #[case] key: i64) {
    assert_eq!(Version::encode(raw).key(), key);
}

#[rstest]
#[case("1.0.0", "1.0.1")]
#[case("1.9.9", "2.0.0")]
#[case("0.0.9", "0.1.0")]
#[case("4.17.999", "4.18.0")]
#[case("1.2.3.4", "1.2.3.5")]
fn test_monotonic(#[case] lower: &str, #[case] higher: &str) {
    assert!(Version::encode(lower) < Version::encode(higher));
}

#[rstest]
#[case("1.2.3-rc1", "1.2.3")]
#[case("2.0.1-beta", "2.0.1")]
#[case("1.2.3.0-RC1", "1.2.3.1")]
fn test_prerelease_sorts_below_release(#[case] pre: &str, #[case] release: &str) {
    assert!(Version::encode(pre) < Version::encode(release));
}

// A suffix only zeroes its own segment, so it is invisible when that
// segment is already zero.
#[rstest]
#[case("2.0.0-beta", "2.0.0")]
#[case("1.2.3.0-RC1", "1.2.3")]
fn test_prerelease_on_zero_segment_equals_release(#[case] pre: &str, #[case] release: &str) {
    assert_eq!(Version::encode(pre), Version::encode(release));
}
