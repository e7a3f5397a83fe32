#![no_std]

//! `DString`: a growable, zero-terminated byte string stored in a
//! [`darray::DArray<u8>`].
//!
//! The array always holds the text followed by one `0` byte. The length is
//! read from the array header, so `len()` is O(1) and never scans for the
//! terminator.
//!
//! ```
//! # use dstring::DString;
//! let mut text = DString::from_bytes(b"foobar").unwrap();
//! text.push_str("baz").unwrap();
//! assert_eq!(text, "foobarbaz");
//! assert_eq!(text.len(), 9);
//! assert_eq!(text.as_bytes_with_nul(), b"foobarbaz\0");
//! ```
//!
//! # Text Operations
//!
//! ```
//! # use dstring::DString;
//! # use core::cmp::Ordering;
//! let mut text: DString = "  Hello, World  ".parse().unwrap();
//! text.trim().unwrap();
//! assert_eq!(text, "Hello, World");
//!
//! assert_eq!(text.find("World"), Some(7));
//! assert_eq!(text.find("world"), None);
//! assert_eq!(text.find_ignore_case("world"), Some(7));
//!
//! assert_eq!(text.replace_all_ignore_case("o", "0").unwrap(), 2);
//! assert_eq!(text, "Hell0, W0rld");
//!
//! text.make_ascii_uppercase();
//! assert_eq!(text.compare("HELL0, W0RLD"), Ordering::Equal);
//! assert_eq!(text.compare_ignore_case("hell0, w0rld"), Ordering::Equal);
//! ```
//!
//! # Formatting
//!
//! [`dformat!`] builds a string like `format!`, reporting allocation
//! failure instead of aborting:
//!
//! ```
//! # use dstring::dformat;
//! let text = dformat!("{}-{:03}", "id", 7).unwrap();
//! assert_eq!(text, "id-007");
//! ```

mod dstring;
mod error;
pub mod fold;

pub use crate::dstring::DString;
pub use crate::error::{DStringError, Result};

/// Creates a [`DString`] from a format string and arguments.
///
/// Expands to `DString::from_fmt(format_args!(...))` and returns its
/// `Result`.
#[macro_export]
macro_rules! dformat {
    ($($arg:tt)*) => {
        $crate::DString::from_fmt(::core::format_args!($($arg)*))
    };
}
