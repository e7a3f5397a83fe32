//! Header/handle translation.
//!
//! ```text
//! +--------+---------+---------+-----+------------------+
//! | header | elem[0] | elem[1] | ... | elem[capacity-1] |
//! +--------+---------+---------+-----+------------------+
//!          ^
//!          handle = header + data_offset::<T>()
//! ```
//!
//! The header is padded so that the handle is aligned for `T`. Everything in
//! this module is address arithmetic and performs no checks on the pointers it
//! is given.

use core::alloc::Layout;
use core::mem::{align_of, size_of};
use core::ptr::NonNull;

use crate::error::{DArrayError, Result};

/// Bookkeeping stored in front of the elements.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) len: usize,
    pub(crate) cap: usize,
}

/// Alignment of the whole block for element type `T`.
pub(crate) const fn block_align<T>() -> usize {
    if align_of::<T>() > align_of::<Header>() {
        align_of::<T>()
    } else {
        align_of::<Header>()
    }
}

/// Distance in bytes from the start of the block to element 0.
pub(crate) const fn data_offset<T>() -> usize {
    let align = block_align::<T>();
    (size_of::<Header>() + align - 1) & !(align - 1)
}

/// Layout of a block holding a header and `cap` elements of `T`.
pub(crate) fn layout_for<T>(cap: usize) -> Result<Layout> {
    let size = size_of::<T>()
        .checked_mul(cap)
        .and_then(|bytes| bytes.checked_add(data_offset::<T>()))
        .ok_or(DArrayError::CapacityOverflow)?;
    Layout::from_size_align(size, block_align::<T>()).map_err(|_| DArrayError::CapacityOverflow)
}

/// Returns the header address for a handle.
///
/// # Safety
///
/// `handle` must point `data_offset::<T>()` bytes into a block laid out by
/// `layout_for::<T>`.
#[allow(unsafe_code)]
#[inline]
pub(crate) unsafe fn header_of<T>(handle: NonNull<T>) -> NonNull<Header> {
    NonNull::new_unchecked(handle.as_ptr().cast::<u8>().sub(data_offset::<T>())).cast()
}

/// Returns the handle for a header address.
///
/// # Safety
///
/// `header` must be the start of a block laid out by `layout_for::<T>`.
#[allow(unsafe_code)]
#[inline]
pub(crate) unsafe fn handle_of<T>(header: NonNull<Header>) -> NonNull<T> {
    NonNull::new_unchecked(header.as_ptr().cast::<u8>().add(data_offset::<T>())).cast()
}
