use core::cmp::Ordering;
use core::fmt::{self, Write as _};
use core::hash::{Hash, Hasher};
use core::str::{self, FromStr, Utf8Error};

use darray::{DArray, Global, RawAllocator};

use crate::error::{DStringError, Result};
use crate::fold::{self, CaseFold, Exact, IgnoreAsciiCase};

/// Byte that ends the stored text.
const TERMINATOR: u8 = 0;

/// `isspace` in the C locale.
fn is_c_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// A growable byte string stored in a `DArray<u8>` followed by a zero byte.
///
/// The underlying array always holds `len() + 1` bytes and its last byte is
/// `0`, so [`as_bytes_with_nul`](Self::as_bytes_with_nul) can be handed to
/// code expecting a C string. Every operation keeps that layout, including
/// the ones that fail.
///
/// The text is not required to be UTF-8. Interior zero bytes are stored and
/// counted like any other byte.
pub struct DString<A: RawAllocator = Global> {
    bytes: DArray<u8, A>,
}

impl DString {
    /// Creates the empty string.
    ///
    /// # Errors
    ///
    /// Returns `DStringError::Array` if the heap refuses the block.
    pub fn new() -> Result<Self> {
        Self::new_in(Global)
    }

    /// Creates a string holding a copy of `text`.
    ///
    /// # Errors
    ///
    /// Returns `DStringError::Array` if the heap refuses the block.
    pub fn from_bytes(text: &[u8]) -> Result<Self> {
        Self::from_bytes_in(text, Global)
    }

    /// Creates a string from formatting arguments, usually through the
    /// [`dformat!`](crate::dformat) macro.
    ///
    /// # Errors
    ///
    /// Returns `DStringError::Array` if the string could not grow, or
    /// `DStringError::Format` if a formatting trait implementation failed.
    pub fn from_fmt(args: fmt::Arguments<'_>) -> Result<Self> {
        let mut text = Self::new()?;
        text.push_fmt(args)?;
        Ok(text)
    }
}

impl<A: RawAllocator> DString<A> {
    /// Creates the empty string in `alloc`.
    ///
    /// # Errors
    ///
    /// Returns `DStringError::Array` if the allocator refuses the block.
    pub fn new_in(alloc: A) -> Result<Self> {
        Self::from_bytes_in(b"", alloc)
    }

    /// Creates a string holding a copy of `text` in `alloc`.
    ///
    /// # Errors
    ///
    /// Returns `DStringError::Array` if the allocator refuses the block.
    pub fn from_bytes_in(text: &[u8], alloc: A) -> Result<Self> {
        let mut bytes = DArray::filled_in(TERMINATOR, text.len() + 1, alloc)?;
        bytes[..text.len()].copy_from_slice(text);
        Ok(Self { bytes })
    }

    /// Copies the string into a new block of the same capacity.
    ///
    /// # Errors
    ///
    /// Returns `DStringError::Array` if the new block is refused.
    pub fn try_clone(&self) -> Result<Self>
    where
        A: Clone,
    {
        Ok(Self {
            bytes: self.bytes.try_clone()?,
        })
    }

    /// Number of bytes of text, the terminator excluded. O(1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of text bytes the current block holds without relocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity() - 1
    }

    /// Ensures `capacity() >= len() + additional`.
    ///
    /// # Errors
    ///
    /// Returns `DStringError::Array` if the string could not grow; it is
    /// unchanged in that case.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.bytes.reserve(additional)?;
        Ok(())
    }

    /// The text, without the terminator.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// The text followed by the terminator.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Pointer to the first byte of the zero-terminated text.
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    /// The text as `&str`.
    ///
    /// # Errors
    ///
    /// Returns the UTF-8 error if the text is not valid UTF-8.
    pub fn to_str(&self) -> core::result::Result<&str, Utf8Error> {
        str::from_utf8(self.as_bytes())
    }

    /// Appends a copy of `text`.
    ///
    /// # Errors
    ///
    /// Returns `DStringError::Array` if the string could not grow; it is
    /// unchanged in that case.
    pub fn push_bytes(&mut self, text: &[u8]) -> Result<()> {
        // The terminator shifts behind the inserted bytes
        self.bytes.insert_slice(self.len(), text)?;
        Ok(())
    }

    /// Appends a copy of `text`.
    ///
    /// # Errors
    ///
    /// Same as [`push_bytes`](Self::push_bytes).
    pub fn push_str(&mut self, text: &str) -> Result<()> {
        self.push_bytes(text.as_bytes())
    }

    /// Appends a copy of the text of `other`.
    ///
    /// # Errors
    ///
    /// Same as [`push_bytes`](Self::push_bytes).
    pub fn push_dstring<B: RawAllocator>(&mut self, other: &DString<B>) -> Result<()> {
        self.push_bytes(other.as_bytes())
    }

    /// Appends formatted text.
    ///
    /// On failure the text is restored to what it was before the call. The
    /// capacity may have grown.
    ///
    /// # Errors
    ///
    /// Returns `DStringError::Array` if the string could not grow, or
    /// `DStringError::Format` if a formatting trait implementation failed.
    pub fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let old_len = self.len();
        let mut sink = FmtSink {
            target: &mut *self,
            error: None,
        };
        match sink.write_fmt(args) {
            Ok(()) => Ok(()),
            Err(fmt::Error) => {
                let error = sink.error.unwrap_or(DStringError::Format);
                self.truncate_text(old_len);
                Err(error)
            }
        }
    }

    /// Lexicographic byte comparison, like `strcmp`.
    #[must_use]
    pub fn compare(&self, other: impl AsRef<[u8]>) -> Ordering {
        fold::compare(Exact, self.as_bytes(), other.as_ref())
    }

    /// Lexicographic comparison with ASCII letters folded to lower case,
    /// like `strcasecmp`.
    #[must_use]
    pub fn compare_ignore_case(&self, other: impl AsRef<[u8]>) -> Ordering {
        fold::compare(IgnoreAsciiCase, self.as_bytes(), other.as_ref())
    }

    /// Index of the first occurrence of `pattern`, or `None`.
    ///
    /// An empty pattern is found at index 0.
    #[must_use]
    pub fn find(&self, pattern: impl AsRef<[u8]>) -> Option<usize> {
        fold::find(Exact, self.as_bytes(), pattern.as_ref())
    }

    /// Like [`find`](Self::find), ignoring ASCII case.
    #[must_use]
    pub fn find_ignore_case(&self, pattern: impl AsRef<[u8]>) -> Option<usize> {
        fold::find(IgnoreAsciiCase, self.as_bytes(), pattern.as_ref())
    }

    /// Replaces every non-overlapping occurrence of `pattern`, scanning left
    /// to right, and returns the number of replacements.
    ///
    /// The scan resumes after each inserted replacement, so a replacement
    /// that contains the pattern is not replaced again. An empty pattern
    /// replaces nothing.
    ///
    /// # Errors
    ///
    /// Returns `DStringError::Array` if the string could not grow. The
    /// occurrences replaced before the failure stay replaced.
    pub fn replace_all(
        &mut self,
        pattern: impl AsRef<[u8]>,
        replacement: impl AsRef<[u8]>,
    ) -> Result<usize> {
        self.replace_all_by(Exact, pattern.as_ref(), replacement.as_ref())
    }

    /// Like [`replace_all`](Self::replace_all), matching the pattern
    /// regardless of ASCII case.
    ///
    /// # Errors
    ///
    /// Same as [`replace_all`](Self::replace_all).
    pub fn replace_all_ignore_case(
        &mut self,
        pattern: impl AsRef<[u8]>,
        replacement: impl AsRef<[u8]>,
    ) -> Result<usize> {
        self.replace_all_by(IgnoreAsciiCase, pattern.as_ref(), replacement.as_ref())
    }

    fn replace_all_by<F: CaseFold>(
        &mut self,
        fold: F,
        pattern: &[u8],
        replacement: &[u8],
    ) -> Result<usize> {
        if pattern.is_empty() {
            return Ok(0);
        }
        let growth = replacement.len().saturating_sub(pattern.len());
        let mut from = 0;
        let mut count = 0;
        while let Some(found) = fold::find(fold, &self.as_bytes()[from..], pattern) {
            let at = from + found;
            // Grow first: the insert below then cannot fail after the removal
            self.bytes.reserve(growth)?;
            self.bytes.remove_range(at, pattern.len())?;
            self.bytes.insert_slice(at, replacement)?;
            from = at + replacement.len();
            count += 1;
        }
        tracing::trace!(replacements = count, length = self.len(), "dstring replace_all");
        Ok(count)
    }

    /// Converts ASCII letters to lower case in place.
    pub fn make_ascii_lowercase(&mut self) {
        let len = self.len();
        self.bytes[..len].make_ascii_lowercase();
    }

    /// Converts ASCII letters to upper case in place.
    pub fn make_ascii_uppercase(&mut self) {
        let len = self.len();
        self.bytes[..len].make_ascii_uppercase();
    }

    /// Removes leading and trailing whitespace (space, `\t`, `\n`, `\v`,
    /// `\f`, `\r`).
    ///
    /// # Errors
    ///
    /// Returns `DStringError::Array` if the underlying array rejects the
    /// removal. It does not happen for a well-formed string.
    pub fn trim(&mut self) -> Result<()> {
        let text = self.as_bytes();
        let len = text.len();
        let end = text
            .iter()
            .rposition(|&b| !is_c_space(b))
            .map_or(0, |last| last + 1);
        let start = text[..end]
            .iter()
            .position(|&b| !is_c_space(b))
            .unwrap_or(end);

        // Trailing run first, the terminator stays in place
        self.bytes.remove_range(end, len - end)?;
        self.bytes.remove_range(0, start)?;
        Ok(())
    }

    /// Empties the string. The capacity is kept.
    pub fn clear(&mut self) {
        self.truncate_text(0);
    }

    /// Drops the text past `len` bytes and moves the terminator there.
    fn truncate_text(&mut self, len: usize) {
        self.bytes.truncate(len + 1);
        self.bytes[len] = TERMINATOR;
    }
}

/// Routes `fmt::Write` output into a string and keeps the allocation error
/// that `fmt::Error` cannot carry.
struct FmtSink<'a, A: RawAllocator> {
    target: &'a mut DString<A>,
    error: Option<DStringError>,
}

impl<A: RawAllocator> fmt::Write for FmtSink<'_, A> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.target.push_str(s).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

impl<A: RawAllocator> fmt::Write for DString<A> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s).map_err(|_| fmt::Error)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.push_fmt(args).map_err(|_| fmt::Error)
    }
}

impl<A: RawAllocator> fmt::Display for DString<A> {
    /// Invalid UTF-8 sequences are shown as U+FFFD.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_char(char::REPLACEMENT_CHARACTER)?;
            }
        }
        Ok(())
    }
}

impl<A: RawAllocator> fmt::Debug for DString<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.as_bytes().escape_ascii())
    }
}

impl<A: RawAllocator> AsRef<[u8]> for DString<A> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<A: RawAllocator, B: RawAllocator> PartialEq<DString<B>> for DString<A> {
    fn eq(&self, other: &DString<B>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: RawAllocator> Eq for DString<A> {}

impl<A: RawAllocator> PartialEq<[u8]> for DString<A> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl<A: RawAllocator> PartialEq<&[u8]> for DString<A> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl<A: RawAllocator, const N: usize> PartialEq<&[u8; N]> for DString<A> {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.as_bytes() == other.as_slice()
    }
}

impl<A: RawAllocator> PartialEq<str> for DString<A> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: RawAllocator> PartialEq<&str> for DString<A> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: RawAllocator> PartialOrd for DString<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: RawAllocator> Ord for DString<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other.as_bytes())
    }
}

impl<A: RawAllocator> Hash for DString<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl FromStr for DString {
    type Err = DStringError;

    fn from_str(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes())
    }
}

impl TryFrom<&str> for DString {
    type Error = DStringError;

    fn try_from(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes())
    }
}

impl TryFrom<&[u8]> for DString {
    type Error = DStringError;

    fn try_from(text: &[u8]) -> Result<Self> {
        Self::from_bytes(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_terminated<A: RawAllocator>(text: &DString<A>) {
        assert_eq!(text.bytes.len(), text.len() + 1);
        assert_eq!(text.bytes[text.len()], TERMINATOR);
    }

    #[test]
    fn test_empty_string_holds_only_the_terminator() {
        let text = DString::new().unwrap();
        assert_eq!(text.len(), 0);
        assert_eq!(text.as_bytes_with_nul(), b"\0");
        assert_terminated(&text);
    }

    #[test]
    fn test_push_moves_the_terminator() {
        let mut text = DString::from_bytes(b"ab").unwrap();
        text.push_bytes(b"cd").unwrap();
        assert_eq!(text.as_bytes_with_nul(), b"abcd\0");
        text.push_bytes(b"").unwrap();
        assert_terminated(&text);
    }

    #[test]
    fn test_trim_keeps_the_terminator() {
        for input in ["", " ", " \t\r\n\x0B\x0C", "x", "  x", "x  ", " a b "] {
            let mut text = DString::from_bytes(input.as_bytes()).unwrap();
            text.trim().unwrap();
            assert_eq!(text.as_bytes(), input.trim_matches(|c| is_c_space(c as u8)).as_bytes());
            assert_terminated(&text);
        }
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut text = DString::from_bytes(b"some text").unwrap();
        let capacity = text.capacity();
        text.clear();
        assert!(text.is_empty());
        assert_eq!(text.capacity(), capacity);
        assert_terminated(&text);
    }

    #[test]
    fn test_replacement_containing_pattern_is_not_rescanned() {
        let mut text = DString::from_bytes(b"aa").unwrap();
        assert_eq!(text.replace_all("a", "aa").unwrap(), 2);
        assert_eq!(text.as_bytes(), b"aaaa");
        assert_terminated(&text);
    }
}
