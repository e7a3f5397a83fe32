use thiserror::Error;

/// Error types for `DArray` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DArrayError {
    /// The allocator refused the request; the array is left untouched
    #[error("Allocation failed: {requested_bytes} bytes could not be obtained")]
    AllocationFailed {
        /// Total size of the refused allocation, header included
        requested_bytes: usize,
    },
    /// Computing the allocation size overflowed
    #[error("Capacity overflow: the requested size exceeds isize::MAX bytes")]
    CapacityOverflow,
    /// Index is beyond the current array length
    #[error("Index out of bounds: index {index} is beyond array length {length}")]
    IndexOutOfBounds {
        /// Index that was accessed
        index: usize,
        /// Current length of the array
        length: usize,
    },
    /// A range of elements reaches beyond the current array length
    #[error("Range out of bounds: {count} elements from {start} exceed array length {length}")]
    RangeOutOfBounds {
        /// First index of the range
        start: usize,
        /// Number of elements in the range
        count: usize,
        /// Current length of the array
        length: usize,
    },
    /// Removal was requested from an empty array
    #[error("Operation on empty array")]
    EmptyArray,
}

pub type Result<T> = core::result::Result<T, DArrayError>;
