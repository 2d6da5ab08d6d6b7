//! Composite link keys
//!
//! A key is exactly [`KEY_LEN`] bytes: a 4-byte `YYMM` creation bucket
//! followed by an 8-byte window holding the base-36 XXH64 digest of the URL.
//! Keys compare as raw bytes, so the store keeps links grouped by month.

use std::fmt;

use chrono::{DateTime, Utc};
use xxhash_rust::xxh64::xxh64;

/// Total key width in bytes.
pub const KEY_LEN: usize = 12;

/// Width of the time bucket prefix (`YYMM`).
pub const BUCKET_LEN: usize = 4;

/// Width of the hash window that follows the bucket.
pub const HASH_LEN: usize = KEY_LEN - BUCKET_LEN;

/// Filler for hash windows shorter than [`HASH_LEN`].
pub const HASH_PAD: u8 = b'0';

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Fixed-width link key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkKey([u8; KEY_LEN]);

impl LinkKey {
    /// Derive the key for `url` created at `now`.
    pub fn derive(url: &str, now: DateTime<Utc>) -> Self {
        Self::derive_at_bucket(url, &time_bucket(now))
    }

    /// Derive the key for `url` inside an explicit bucket.
    ///
    /// The buffer is built fresh on every call. The encoded digest is copied
    /// into the hash window and cut at [`HASH_LEN`] bytes; any window bytes
    /// it does not reach hold [`HASH_PAD`].
    pub fn derive_at_bucket(url: &str, bucket: &[u8; BUCKET_LEN]) -> Self {
        Self::pack(bucket, &content_hash(url))
    }

    /// Lay out `bucket` and an encoded digest into a key.
    ///
    /// `encoded` is cut at [`HASH_LEN`] bytes; a shorter one is followed by
    /// [`HASH_PAD`] up to the end of the key.
    pub fn pack(bucket: &[u8; BUCKET_LEN], encoded: &str) -> Self {
        let mut buf = [HASH_PAD; KEY_LEN];
        buf[..BUCKET_LEN].copy_from_slice(bucket);

        let n = encoded.len().min(HASH_LEN);
        buf[BUCKET_LEN..BUCKET_LEN + n].copy_from_slice(&encoded.as_bytes()[..n]);

        LinkKey(buf)
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        LinkKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    pub fn bucket(&self) -> &[u8] {
        &self.0[..BUCKET_LEN]
    }

    pub fn hash_part(&self) -> &[u8] {
        &self.0[BUCKET_LEN..]
    }
}

impl AsRef<[u8]> for LinkKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 派生出来的 key 全是 ASCII；from_bytes 传入的任意字节按 lossy 显示
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinkKey({})", self)
    }
}

/// `YYMM` bucket for a timestamp, e.g. `2401` for January 2024.
pub fn time_bucket(now: DateTime<Utc>) -> [u8; BUCKET_LEN] {
    let stamp = now.format("%y%m").to_string();
    let mut bucket = [b'0'; BUCKET_LEN];
    bucket.copy_from_slice(&stamp.as_bytes()[..BUCKET_LEN]);
    bucket
}

/// Base-36 text of the URL's XXH64 digest (seed 0).
pub fn content_hash(url: &str) -> String {
    base36(xxh64(url.as_bytes(), 0))
}

/// Lowercase base-36 rendering of `value` without leading zeros.
pub fn base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    // u64::MAX 在 36 进制下是 13 位
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jan_2024() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_base36_known_values() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(u64::MAX), "3w5e11264sgsf");
    }

    #[test]
    fn test_time_bucket_is_yymm() {
        assert_eq!(&time_bucket(jan_2024()), b"2401");
        let dec = Utc.with_ymd_and_hms(2031, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(&time_bucket(dec), b"3112");
    }

    #[test]
    fn test_derive_is_deterministic() {
        let a = LinkKey::derive("https://example.com/a", jan_2024());
        let b = LinkKey::derive("https://example.com/a", jan_2024());
        assert_eq!(a, b);
        assert_eq!(a.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn test_derive_same_month_same_key() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        assert_eq!(
            LinkKey::derive("https://example.com/a", early),
            LinkKey::derive("https://example.com/a", late)
        );
    }

    #[test]
    fn test_derive_bucket_prefix() {
        let key = LinkKey::derive("https://example.com/a", jan_2024());
        assert_eq!(key.bucket(), b"2401");
    }

    #[test]
    fn test_hash_window_is_truncated_prefix() {
        for url in [
            "https://example.com/a",
            "https://example.com/b",
            "https://rust-lang.org/",
            "",
        ] {
            let encoded = content_hash(url);
            let key = LinkKey::derive_at_bucket(url, b"2401");
            if encoded.len() >= HASH_LEN {
                assert_eq!(key.hash_part(), &encoded.as_bytes()[..HASH_LEN]);
            } else {
                assert_eq!(&key.hash_part()[..encoded.len()], encoded.as_bytes());
            }
        }
    }

    #[test]
    fn test_pack_pads_short_encoding() {
        let key = LinkKey::pack(b"2401", "k3x9p2");
        assert_eq!(key.to_string(), "2401k3x9p200");
        assert_eq!(key.hash_part(), b"k3x9p200");
    }

    #[test]
    fn test_pack_single_digit_encoding() {
        let key = LinkKey::pack(b"2401", "x");
        assert_eq!(key.as_bytes(), b"2401x0000000");
    }

    #[test]
    fn test_pack_truncates_long_encoding() {
        let key = LinkKey::pack(b"2401", "3w5e11264sgsf");
        assert_eq!(key.as_bytes(), b"24013w5e1126");
    }

    #[test]
    fn test_pack_exact_width_encoding() {
        let key = LinkKey::pack(b"2512", "abcdefgh");
        assert_eq!(key.as_bytes(), b"2512abcdefgh");
    }

    #[test]
    fn test_derive_matches_pack_of_content_hash() {
        for url in ["https://example.com/a", "https://rust-lang.org/", ""] {
            assert_eq!(
                LinkKey::derive_at_bucket(url, b"2401"),
                LinkKey::pack(b"2401", &content_hash(url))
            );
        }
    }

    #[test]
    fn test_short_then_long_has_no_stale_bytes() {
        // 先写长摘要再写短摘要，短的那次只能看到补位字符
        let long = LinkKey::pack(b"2401", "zzzzzzzzzzzz");
        let short = LinkKey::pack(b"2401", "ab");
        assert_eq!(long.as_bytes(), b"2401zzzzzzzz");
        assert_eq!(short.as_bytes(), b"2401ab000000");
    }

    #[test]
    fn test_keys_sort_by_bucket_first() {
        let jan = LinkKey::derive_at_bucket("https://zzz.example", b"2401");
        let feb = LinkKey::derive_at_bucket("https://aaa.example", b"2402");
        assert!(jan < feb);
        assert!(jan.as_bytes().as_slice() < feb.as_bytes().as_slice());
    }

    #[test]
    fn test_display_is_ascii() {
        let key = LinkKey::derive("https://example.com/a", jan_2024());
        let text = key.to_string();
        assert_eq!(text.len(), KEY_LEN);
        assert!(text.bytes().all(|b| b.is_ascii_alphanumeric()));
    }
}
