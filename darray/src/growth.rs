//! Capacity growth policy.
//!
//! A growing array asks for `max(MIN_CAPACITY, ceil(required * 1.3))`
//! elements. The factor is kept as the integer ratio
//! `GROWTH_NUMERATOR / GROWTH_DENOMINATOR`.

use crate::error::{DArrayError, Result};

/// Smallest capacity handed out by the policy.
pub const MIN_CAPACITY: usize = 10;
/// Numerator of the growth factor (1.3).
pub const GROWTH_NUMERATOR: usize = 13;
/// Denominator of the growth factor (1.3).
pub const GROWTH_DENOMINATOR: usize = 10;

/// Returns the capacity to request when at least `min_required` elements
/// must fit.
///
/// # Errors
///
/// Returns `DArrayError::CapacityOverflow` if the scaled capacity does not
/// fit in a `usize`.
pub fn new_capacity(min_required: usize) -> Result<usize> {
    let scaled = min_required
        .checked_mul(GROWTH_NUMERATOR)
        .ok_or(DArrayError::CapacityOverflow)?
        .div_ceil(GROWTH_DENOMINATOR);
    Ok(scaled.max(MIN_CAPACITY))
}
