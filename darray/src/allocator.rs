//! The allocator seam.
//!
//! `DArray` only ever asks its allocator for three things: a fresh block, a
//! resized block, and the release of a block. A refused request is reported
//! with `None` and never disturbs memory that was already handed out.

use core::alloc::Layout;
use core::ptr::NonNull;

/// Minimal allocator interface consumed by `DArray`.
///
/// # Safety
///
/// Implementations must return blocks that are valid for reads and writes of
/// `layout.size()` bytes and aligned to `layout.align()`. A block returned by
/// `allocate` or `reallocate` must stay valid until it is passed to
/// `reallocate` (successfully) or `release`.
#[allow(unsafe_code)]
pub unsafe trait RawAllocator {
    /// Allocates a block described by `layout`. `layout.size()` is never zero.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Grows or shrinks the block at `ptr` to `new_size` bytes, keeping the
    /// alignment of `old_layout` and the first `min(old, new)` bytes.
    ///
    /// On `None` the block at `ptr` is still valid and still owned by the
    /// caller.
    ///
    /// # Safety
    ///
    /// `ptr` must denote a block currently allocated by this allocator with
    /// `old_layout`, and `new_size` must be non-zero and, rounded up to the
    /// alignment, not exceed `isize::MAX`.
    #[allow(unsafe_code)]
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>>;

    /// Releases the block at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must denote a block currently allocated by this allocator with
    /// `layout`. The block must not be used afterwards.
    #[allow(unsafe_code)]
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The global heap, through `alloc::alloc`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

#[allow(unsafe_code)]
unsafe impl RawAllocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() != 0);
        // Safe: layout size is non-zero, the header is always part of the block
        #[allow(unsafe_code)]
        let block = unsafe { ::alloc::alloc::alloc(layout) };
        NonNull::new(block)
    }

    #[allow(unsafe_code)]
    #[inline]
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        NonNull::new(::alloc::alloc::realloc(ptr.as_ptr(), old_layout, new_size))
    }

    #[allow(unsafe_code)]
    #[inline]
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        ::alloc::alloc::dealloc(ptr.as_ptr(), layout);
    }
}

#[allow(unsafe_code)]
unsafe impl<A: RawAllocator + ?Sized> RawAllocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    #[allow(unsafe_code)]
    #[inline]
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        (**self).reallocate(ptr, old_layout, new_size)
    }

    #[allow(unsafe_code)]
    #[inline]
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).release(ptr, layout);
    }
}
