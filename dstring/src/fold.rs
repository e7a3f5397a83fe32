//! Byte folding used by comparison, search and replacement.
//!
//! [`Exact`] compares bytes as they are, [`IgnoreAsciiCase`] folds ASCII
//! letters to lower case first. Non-ASCII bytes are never folded.

use core::cmp::Ordering;

/// Maps a byte to the value it is compared by.
pub trait CaseFold: Copy {
    fn fold(self, byte: u8) -> u8;
}

/// Byte-for-byte comparison.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Exact;

impl CaseFold for Exact {
    #[inline]
    fn fold(self, byte: u8) -> u8 {
        byte
    }
}

/// ASCII case-insensitive comparison.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IgnoreAsciiCase;

impl CaseFold for IgnoreAsciiCase {
    #[inline]
    fn fold(self, byte: u8) -> u8 {
        byte.to_ascii_lowercase()
    }
}

/// Lexicographic comparison of the folded bytes. A proper prefix orders
/// before the longer sequence.
pub(crate) fn compare<F: CaseFold>(fold: F, left: &[u8], right: &[u8]) -> Ordering {
    left.iter()
        .map(|&b| fold.fold(b))
        .cmp(right.iter().map(|&b| fold.fold(b)))
}

/// Index of the first occurrence of `needle` in `haystack`.
///
/// An empty needle is found at index 0.
pub(crate) fn find<F: CaseFold>(fold: F, haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|window| {
        window
            .iter()
            .zip(needle)
            .all(|(&a, &b)| fold.fold(a) == fold.fold(b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_orders_prefix_first() {
        assert_eq!(compare(Exact, b"abc", b"abd"), Ordering::Less);
        assert_eq!(compare(Exact, b"ab", b"abc"), Ordering::Less);
        assert_eq!(compare(Exact, b"abc", b"abc"), Ordering::Equal);
        assert_eq!(compare(Exact, b"b", b"abc"), Ordering::Greater);
        assert_eq!(compare(Exact, b"", b""), Ordering::Equal);
    }

    #[test]
    fn test_compare_ignoring_case() {
        assert_eq!(compare(Exact, b"ABC", b"abc"), Ordering::Less);
        assert_eq!(compare(IgnoreAsciiCase, b"ABC", b"abc"), Ordering::Equal);
        // '_' (0x5F) sits between the upper and lower case letters
        assert_eq!(compare(IgnoreAsciiCase, b"A", b"_"), Ordering::Greater);
    }

    #[test]
    fn test_find() {
        assert_eq!(find(Exact, b"hello world", b"o"), Some(4));
        assert_eq!(find(Exact, b"hello world", b"world"), Some(6));
        assert_eq!(find(Exact, b"hello world", b"World"), None);
        assert_eq!(find(IgnoreAsciiCase, b"hello world", b"WORLD"), Some(6));
        assert_eq!(find(Exact, b"abc", b"abcd"), None);
        assert_eq!(find(Exact, b"abc", b""), Some(0));
        assert_eq!(find(Exact, b"", b""), Some(0));
        assert_eq!(find(Exact, b"", b"a"), None);
    }

    #[test]
    fn test_non_ascii_bytes_are_not_folded() {
        assert_eq!(find(IgnoreAsciiCase, "Ä".as_bytes(), "ä".as_bytes()), None);
        assert_eq!(IgnoreAsciiCase.fold(0xC4), 0xC4);
    }
}
