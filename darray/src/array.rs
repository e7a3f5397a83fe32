use core::alloc::Layout;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::mem::size_of;
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};
use core::slice;

use crate::allocator::{Global, RawAllocator};
use crate::error::{DArrayError, Result};
use crate::growth;
use crate::header::{self, Header};
use crate::iter::{DArrayIter, DArrayRevIter};

/// Largest element, in bytes, that `remove` rotates out through a scratch
/// value and one block move. Bigger elements take the swap-only rotation,
/// which needs no scratch slot and never allocates. Both rotations produce
/// the same order.
const SCRATCH_LIMIT: usize = 4096;

/// A growable array whose length and capacity live in a header placed in
/// front of the elements, inside the same allocation.
///
/// The array owns its block exclusively. Operations that may relocate the
/// block update the internal handle, so callers never observe a stale
/// address. Every operation that can allocate returns a `Result` and leaves
/// the array untouched when it fails.
pub struct DArray<T: Copy, A: RawAllocator = Global> {
    handle: NonNull<T>,
    alloc: A,
    _owns: PhantomData<T>,
}

// Safe: the block is owned uniquely, like a `Box<[T]>`
#[allow(unsafe_code)]
unsafe impl<T: Copy + Send, A: RawAllocator + Send> Send for DArray<T, A> {}
#[allow(unsafe_code)]
unsafe impl<T: Copy + Sync, A: RawAllocator + Sync> Sync for DArray<T, A> {}

impl<T: Copy> DArray<T> {
    /// Creates an empty array with the policy's minimum capacity.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` if the heap refuses the block.
    pub fn new() -> Result<Self> {
        Self::new_in(Global)
    }

    /// Creates an array of `n` copies of `value`, with slack from the growth
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`.
    pub fn filled(value: T, n: usize) -> Result<Self> {
        Self::filled_in(value, n, Global)
    }

    /// Creates an array of `n` copies of `value` with capacity exactly `n`.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`.
    pub fn filled_exact(value: T, n: usize) -> Result<Self> {
        Self::filled_exact_in(value, n, Global)
    }

    /// Creates an array holding a copy of `items`, with slack from the growth
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`.
    pub fn from_slice(items: &[T]) -> Result<Self> {
        Self::from_slice_in(items, Global)
    }

    /// Creates an array holding a copy of `items` with no spare capacity.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`.
    pub fn from_slice_exact(items: &[T]) -> Result<Self> {
        Self::from_slice_exact_in(items, Global)
    }

    /// Creates an empty array able to hold exactly `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`.
    pub fn with_capacity_exact(capacity: usize) -> Result<Self> {
        Self::with_capacity_exact_in(capacity, Global)
    }
}

impl<T: Copy, A: RawAllocator> DArray<T, A> {
    /// Creates an empty array in `alloc`.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` if `alloc` refuses the block.
    pub fn new_in(alloc: A) -> Result<Self> {
        Self::allocate(alloc, growth::new_capacity(0)?)
    }

    /// Creates an array of `n` copies of `value` in `alloc`.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`.
    pub fn filled_in(value: T, n: usize, alloc: A) -> Result<Self> {
        let mut array = Self::allocate(alloc, growth::new_capacity(n)?)?;
        array.write_tail(n, value);
        Ok(array)
    }

    /// Creates an array of `n` copies of `value` in `alloc`, capacity exactly `n`.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`.
    pub fn filled_exact_in(value: T, n: usize, alloc: A) -> Result<Self> {
        let mut array = Self::allocate(alloc, n)?;
        array.write_tail(n, value);
        Ok(array)
    }

    /// Creates an array holding a copy of `items` in `alloc`.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`.
    pub fn from_slice_in(items: &[T], alloc: A) -> Result<Self> {
        let mut array = Self::allocate(alloc, growth::new_capacity(items.len())?)?;
        array.append_unchecked(items);
        Ok(array)
    }

    /// Creates an array holding a copy of `items` in `alloc`, capacity exactly
    /// `items.len()`.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`.
    pub fn from_slice_exact_in(items: &[T], alloc: A) -> Result<Self> {
        let mut array = Self::allocate(alloc, items.len())?;
        array.append_unchecked(items);
        Ok(array)
    }

    /// Creates an empty array in `alloc` able to hold exactly `capacity`
    /// elements.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`.
    pub fn with_capacity_exact_in(capacity: usize, alloc: A) -> Result<Self> {
        Self::allocate(alloc, capacity)
    }

    fn allocate(alloc: A, cap: usize) -> Result<Self> {
        let layout = header::layout_for::<T>(cap)?;
        let Some(block) = alloc.allocate(layout) else {
            tracing::debug!(requested_bytes = layout.size(), "darray allocation refused");
            return Err(DArrayError::AllocationFailed {
                requested_bytes: layout.size(),
            });
        };

        let header = block.cast::<Header>();
        // Safe: the block is fresh, aligned for `Header` and large enough for it
        #[allow(unsafe_code)]
        let handle = unsafe {
            header.as_ptr().write(Header { len: 0, cap });
            header::handle_of::<T>(header)
        };

        Ok(Self {
            handle,
            alloc,
            _owns: PhantomData,
        })
    }

    #[allow(unsafe_code)]
    fn header(&self) -> &Header {
        // Safe: the handle always sits `data_offset` bytes into a live block
        unsafe { header::header_of(self.handle).as_ref() }
    }

    #[allow(unsafe_code)]
    fn header_mut(&mut self) -> &mut Header {
        // Safe: as in `header`, and `&mut self` guarantees exclusivity
        unsafe { header::header_of(self.handle).as_mut() }
    }

    #[allow(unsafe_code)]
    fn current_layout(&self) -> Layout {
        let cap = self.capacity();
        // Safe: the same size and alignment were validated by `layout_for`
        // when the block reached this capacity
        unsafe {
            Layout::from_size_align_unchecked(
                header::data_offset::<T>() + size_of::<T>() * cap,
                header::block_align::<T>(),
            )
        }
    }

    /// Moves the array into a block of exactly `new_cap` elements.
    ///
    /// Length is clamped to `new_cap`. On failure nothing changes.
    fn relocate(&mut self, new_cap: usize) -> Result<()> {
        let old_cap = self.capacity();
        let new_layout = header::layout_for::<T>(new_cap)?;
        let old_layout = self.current_layout();

        // Safe: the block was obtained from `self.alloc` with `old_layout`
        #[allow(unsafe_code)]
        let moved = unsafe {
            let block = header::header_of(self.handle).cast::<u8>();
            self.alloc.reallocate(block, old_layout, new_layout.size())
        };
        let Some(block) = moved else {
            tracing::debug!(
                requested_bytes = new_layout.size(),
                "darray relocation refused"
            );
            return Err(DArrayError::AllocationFailed {
                requested_bytes: new_layout.size(),
            });
        };

        // Safe: the allocator preserved the header bytes at the block start
        #[allow(unsafe_code)]
        unsafe {
            let header = block.cast::<Header>();
            let fields = &mut *header.as_ptr();
            fields.cap = new_cap;
            fields.len = fields.len.min(new_cap);
            self.handle = header::handle_of(header);
        }

        tracing::trace!(
            old_capacity = old_cap,
            new_capacity = new_cap,
            "darray relocated"
        );
        Ok(())
    }

    /// Grows the block, following the growth policy, until `required`
    /// elements fit. Does nothing if they already do.
    fn ensure_capacity(&mut self, required: usize) -> Result<()> {
        if self.capacity() >= required {
            return Ok(());
        }
        self.relocate(growth::new_capacity(required)?)
    }

    /// Writes `value` into the slots `[len, new_len)` and sets the length.
    fn write_tail(&mut self, new_len: usize, value: T) {
        let len = self.len();
        debug_assert!(new_len <= self.capacity());
        if new_len > len {
            // Safe: slots below `new_len` are inside the block
            #[allow(unsafe_code)]
            unsafe {
                let base = self.handle.as_ptr();
                for i in len..new_len {
                    base.add(i).write(value);
                }
            }
        }
        self.header_mut().len = new_len;
    }

    /// Copies `items` behind the last element. Capacity must already suffice.
    fn append_unchecked(&mut self, items: &[T]) {
        let len = self.len();
        debug_assert!(len + items.len() <= self.capacity());
        // Safe: capacity checked by the caller, `items` cannot alias the
        // spare slots of a block we own exclusively
        #[allow(unsafe_code)]
        unsafe {
            ptr::copy_nonoverlapping(items.as_ptr(), self.handle.as_ptr().add(len), items.len());
        }
        self.header_mut().len = len + items.len();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.header().len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements the current block holds without relocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.header().cap
    }

    /// Size in bytes of one element.
    #[must_use]
    pub const fn element_size() -> usize {
        size_of::<T>()
    }

    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Address of element 0. Only meaningful until the next operation that
    /// may relocate the array.
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.handle.as_ptr()
    }

    #[must_use]
    #[allow(unsafe_code)]
    pub fn as_slice(&self) -> &[T] {
        // Safe: the first `len` slots are initialized
        unsafe { slice::from_raw_parts(self.handle.as_ptr(), self.len()) }
    }

    #[must_use]
    #[allow(unsafe_code)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // Safe: the first `len` slots are initialized
        unsafe { slice::from_raw_parts_mut(self.handle.as_ptr(), self.len()) }
    }

    /// Sets the length to `n`, growing capacity by the growth policy when
    /// `n` exceeds it. New slots are set to `value`; elements below
    /// `min(len, n)` are kept.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`;
    /// the array is unchanged in that case.
    pub fn resize(&mut self, n: usize, value: T) -> Result<()> {
        self.ensure_capacity(n)?;
        self.write_tail(n, value);
        Ok(())
    }

    /// Like `resize`, but the block is reallocated to hold exactly `n`
    /// elements, shrinking it if needed.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`;
    /// the array is unchanged in that case.
    pub fn resize_exact(&mut self, n: usize, value: T) -> Result<()> {
        if self.capacity() != n {
            self.relocate(n)?;
        }
        self.write_tail(n, value);
        Ok(())
    }

    /// Ensures `capacity() >= len() + additional` without changing the
    /// length. Returns without relocating if that already holds.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`;
    /// the array is unchanged in that case.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len()
            .checked_add(additional)
            .ok_or(DArrayError::CapacityOverflow)?;
        self.ensure_capacity(required)
    }

    /// Reallocates the block so that no spare capacity remains.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed`; the array is unchanged in
    /// that case.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        let len = self.len();
        if self.capacity() == len {
            return Ok(());
        }
        self.relocate(len)
    }

    /// Appends `value` to the back of the array.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` if the array was full and could
    /// not grow; the array is unchanged in that case.
    pub fn push(&mut self, value: T) -> Result<()> {
        let len = self.len();
        if len == self.capacity() {
            self.reserve(1)?;
        }
        // Safe: `len < capacity` after the reserve above
        #[allow(unsafe_code)]
        unsafe {
            self.handle.as_ptr().add(len).write(value);
        }
        self.header_mut().len = len + 1;
        Ok(())
    }

    /// Removes and returns the last element. Never reallocates.
    ///
    /// Returns `None` if the array is empty.
    pub fn pop(&mut self) -> Option<T> {
        let value = *self.as_slice().last()?;
        self.header_mut().len -= 1;
        Some(value)
    }

    /// Inserts `value` at `index`, shifting the elements at `[index, len)`
    /// one slot toward the back.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::IndexOutOfBounds` if `index > len()`, or
    /// `DArrayError::AllocationFailed` if the array could not grow.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        self.insert_slice(index, slice::from_ref(&value))
    }

    /// Inserts a copy of `items` at `index`, shifting the elements at
    /// `[index, len)` toward the back by `items.len()` slots.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::IndexOutOfBounds` if `index > len()`, or
    /// `DArrayError::AllocationFailed` if the array could not grow.
    pub fn insert_slice(&mut self, index: usize, items: &[T]) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(DArrayError::IndexOutOfBounds { index, length: len });
        }
        self.reserve(items.len())?;

        let count = items.len();
        // Safe: `len + count <= capacity`, the tail move stays inside the block
        #[allow(unsafe_code)]
        unsafe {
            let at = self.handle.as_ptr().add(index);
            ptr::copy(at, at.add(count), len - index);
            ptr::copy_nonoverlapping(items.as_ptr(), at, count);
        }
        self.header_mut().len = len + count;
        Ok(())
    }

    /// Removes and returns the element at `index`.
    ///
    /// The element is rotated to the last slot, keeping the order of the
    /// others, and read from there once the length drops. Elements up to
    /// 4096 bytes rotate through a scratch value and one block
    /// move of the tail. Larger ones rotate with in-place swaps. Neither
    /// path allocates.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::EmptyArray` on an empty array and
    /// `DArrayError::IndexOutOfBounds` if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        let len = self.check_index(index)?;
        if size_of::<T>() <= SCRATCH_LIMIT {
            self.rotate_out_with_scratch(index);
        } else {
            self.rotate_out_by_swaps(index);
        }
        self.header_mut().len = len - 1;
        // Safe: slot `len - 1` is inside the block and holds the parked element
        #[allow(unsafe_code)]
        let removed = unsafe { self.handle.as_ptr().add(len - 1).read() };
        Ok(removed)
    }

    /// `[0][1][2][3][rest..] => [0][2][3][rest..][1]`
    pub(crate) fn rotate_out_with_scratch(&mut self, index: usize) {
        let items = self.as_mut_slice();
        let last = items.len() - 1;
        let scratch = items[index];
        items.copy_within(index + 1.., index);
        items[last] = scratch;
    }

    /// Same transform as `rotate_out_with_scratch`, with in-place swaps only.
    pub(crate) fn rotate_out_by_swaps(&mut self, index: usize) {
        let items = self.as_mut_slice();
        let last = items.len() - 1;
        // [0][1][2][3][4] => [0][4][2][3][1]
        items.swap(index, last);
        // [0][4][2][3][1] => [0][2][4][3][1] => [0][2][3][4][1]
        for i in index + 1..last {
            items.swap(i, i - 1);
        }
    }

    /// Removes and returns the element at `index` by moving the last element
    /// into its place. O(1), does not keep the order of the remaining
    /// elements.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::EmptyArray` on an empty array and
    /// `DArrayError::IndexOutOfBounds` if `index >= len()`.
    pub fn swap_remove(&mut self, index: usize) -> Result<T> {
        let len = self.check_index(index)?;
        let items = self.as_mut_slice();
        let removed = items[index];
        items[index] = items[len - 1];
        self.header_mut().len = len - 1;
        Ok(removed)
    }

    /// Removes `count` elements starting at `index`, keeping the order of the
    /// remaining elements. Never reallocates.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::RangeOutOfBounds` if the range reaches past the end.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Result<()> {
        let len = self.len();
        let end = index
            .checked_add(count)
            .filter(|&end| end <= len)
            .ok_or(DArrayError::RangeOutOfBounds {
                start: index,
                count,
                length: len,
            })?;
        self.as_mut_slice().copy_within(end.., index);
        self.header_mut().len = len - count;
        Ok(())
    }

    /// Exchanges the elements at `a` and `b`. `a == b` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::IndexOutOfBounds` if either index is out of range.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        let len = self.len();
        for index in [a, b] {
            if index >= len {
                return Err(DArrayError::IndexOutOfBounds { index, length: len });
            }
        }
        self.as_mut_slice().swap(a, b);
        Ok(())
    }

    /// Appends a copy of `items`, growing by the growth policy.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` or `DArrayError::CapacityOverflow`;
    /// the array is unchanged in that case.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<()> {
        let required = self
            .len()
            .checked_add(items.len())
            .ok_or(DArrayError::CapacityOverflow)?;
        self.ensure_capacity(required)?;
        self.append_unchecked(items);
        Ok(())
    }

    /// Overwrites every element with `value`. Never reallocates.
    pub fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }

    /// Shortens the array to `n` elements. No effect if `n >= len()`.
    pub fn truncate(&mut self, n: usize) {
        if n < self.len() {
            self.header_mut().len = n;
        }
    }

    pub fn clear(&mut self) {
        self.header_mut().len = 0;
    }

    /// Copies the array, capacity included, into a new block.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::AllocationFailed` if the new block is refused.
    pub fn try_clone(&self) -> Result<Self>
    where
        A: Clone,
    {
        let mut copy = Self::allocate(self.alloc.clone(), self.capacity())?;
        copy.append_unchecked(self.as_slice());
        Ok(copy)
    }

    /// Returns an iterator over the elements, front to back.
    #[must_use]
    pub fn iter(&self) -> DArrayIter<'_, T> {
        DArrayIter::new(self.as_slice())
    }

    /// Returns an iterator over the elements, back to front.
    #[must_use]
    pub fn iter_rev(&self) -> DArrayRevIter<'_, T> {
        DArrayRevIter::new(self.as_slice())
    }

    /// Returns an iterator that allows modifying each element in place.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    fn check_index(&self, index: usize) -> Result<usize> {
        let len = self.len();
        if len == 0 {
            return Err(DArrayError::EmptyArray);
        }
        if index >= len {
            return Err(DArrayError::IndexOutOfBounds { index, length: len });
        }
        Ok(len)
    }
}

impl<T: Copy, A: RawAllocator> Drop for DArray<T, A> {
    fn drop(&mut self) {
        let layout = self.current_layout();
        // Safe: the block came from `self.alloc` with this layout and is
        // not touched again
        #[allow(unsafe_code)]
        unsafe {
            let block = header::header_of(self.handle).cast::<u8>();
            self.alloc.release(block, layout);
        }
    }
}

impl<T: Copy, A: RawAllocator> Deref for DArray<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy, A: RawAllocator> DerefMut for DArray<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Copy, A: RawAllocator> AsRef<[T]> for DArray<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy, A: RawAllocator> AsMut<[T]> for DArray<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Copy + fmt::Debug, A: RawAllocator> fmt::Debug for DArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T, A, B> PartialEq<DArray<T, B>> for DArray<T, A>
where
    T: Copy + PartialEq,
    A: RawAllocator,
    B: RawAllocator,
{
    fn eq(&self, other: &DArray<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + Eq, A: RawAllocator> Eq for DArray<T, A> {}

impl<T: Copy + PartialEq, A: RawAllocator> PartialEq<[T]> for DArray<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Copy + PartialEq, A: RawAllocator> PartialEq<&[T]> for DArray<T, A> {
    fn eq(&self, other: &&[T]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: Copy + PartialEq, A: RawAllocator, const N: usize> PartialEq<[T; N]> for DArray<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + Hash, A: RawAllocator> Hash for DArray<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: Copy> TryFrom<&[T]> for DArray<T> {
    type Error = DArrayError;

    fn try_from(items: &[T]) -> Result<Self> {
        Self::from_slice(items)
    }
}

impl<'a, T: Copy, A: RawAllocator> IntoIterator for &'a DArray<T, A> {
    type Item = &'a T;
    type IntoIter = DArrayIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Copy, A: RawAllocator> IntoIterator for &'a mut DArray<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
