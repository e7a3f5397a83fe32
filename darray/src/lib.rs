#![no_std]

//! `DArray`: a growable array with its bookkeeping stored in the same
//! allocation as its elements.
//!
//! Block layout: `[header][elem 0][elem 1]...[elem capacity-1]`.
//! The header holds the length and the capacity. The array itself is a
//! single pointer to element 0 (plus the allocator value, zero-sized for the
//! global heap), so `size_of::<DArray<T>>() == size_of::<usize>()`.
//!
//! This crate is `no_std` compatible; it only needs `alloc`.
//!
//! # Fallible Allocation
//!
//! Every operation that may allocate returns a `Result`. When the allocator
//! refuses a request the array is left exactly as it was, so the caller still
//! owns valid data and can decide what to do:
//!
//! ```
//! # use darray::{DArray, DArrayError};
//! let mut array = DArray::<i32>::new().unwrap();
//! for i in 0..16 {
//!     array.push(i).unwrap();
//! }
//! assert_eq!(array.len(), 16);
//! assert!(array.capacity() >= 16);
//! assert_eq!(array[15], 15);
//!
//! // Contract violations are reported, not undefined
//! assert_eq!(
//!     array.remove(16),
//!     Err(DArrayError::IndexOutOfBounds { index: 16, length: 16 })
//! );
//! ```
//!
//! # Growth Policy
//!
//! Growing operations request `max(10, ceil(required * 1.3))` elements, see
//! [`growth::new_capacity`]. The `_exact` variants request precisely the
//! number of elements needed:
//!
//! ```
//! # use darray::DArray;
//! let mut array = DArray::filled_exact(0u8, 4).unwrap();
//! assert_eq!(array.capacity(), 4);
//!
//! array.resize(20, 7).unwrap();
//! assert_eq!(array.capacity(), 26);
//!
//! array.resize_exact(5, 0).unwrap();
//! assert_eq!(array.capacity(), 5);
//! assert_eq!(array, [0, 0, 0, 0, 7]);
//! ```
//!
//! # Removal
//!
//! Three removal operations are provided:
//! - `remove()`: moves the tail down by one block move, never allocates
//! - `swap_remove()`: O(1), the last element fills the hole, order is not kept
//! - `remove_range()`: removes a run of elements, order is kept
//!
//! ```
//! # use darray::DArray;
//! let mut array = DArray::from_slice(&[3, 5, 7, 9]).unwrap();
//! assert_eq!(array.swap_remove(1), Ok(5));
//! assert_eq!(array, [3, 9, 7]);
//!
//! let mut array = DArray::from_slice(&[3, 5, 7, 9]).unwrap();
//! assert_eq!(array.remove(1), Ok(5));
//! assert_eq!(array, [3, 7, 9]);
//! ```
//!
//! # Iterator Support
//!
//! ```
//! # use darray::DArray;
//! let mut array = DArray::from_slice(&[1, 2, 3]).unwrap();
//!
//! for value in &mut array {
//!     *value *= 10;
//! }
//!
//! let forward: Vec<_> = array.iter().copied().collect();
//! let backward: Vec<_> = array.iter_rev().copied().collect();
//! assert_eq!(forward, [10, 20, 30]);
//! assert_eq!(backward, [30, 20, 10]);
//! ```
//!
//! # Custom Allocators
//!
//! The allocator is a type parameter implementing [`RawAllocator`]; the
//! default is [`Global`]. `DArray::new_in` and the other `_in` constructors
//! take an allocator value.

extern crate alloc;

mod allocator;
mod array;
mod error;
pub mod growth;
mod header;
mod iter;

// Re-export public types and traits
pub use crate::allocator::{Global, RawAllocator};
pub use crate::array::DArray;
pub use crate::error::{DArrayError, Result};
pub use crate::iter::{DArrayIter, DArrayRevIter};
