use crate::{Error, Result};
use portable_atomic::{AtomicI32, Ordering};

/// A wrapping 32-bit signed sequence counter.
///
/// Every call to [`Sequence::next`] yields the previous value plus one, with
/// two's-complement wraparound: after `i32::MAX` comes `i32::MIN`. The
/// counter is not persisted and starts from zero for every generator.
#[derive(Debug, Default)]
pub struct Sequence {
    value: AtomicI32,
}

impl Sequence {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a counter whose first [`Sequence::next`] returns
    /// `value.wrapping_add(1)`.
    pub const fn starting_at(value: i32) -> Self {
        Self {
            value: AtomicI32::new(value),
        }
    }

    /// Advances the counter and returns the new value.
    pub fn next(&self) -> i32 {
        // fetch_add wraps on overflow
        next_sequence(self.value.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the most recently issued value.
    pub fn current(&self) -> i32 {
        self.value.load(Ordering::Relaxed)
    }
}

/// The value following `current`, wrapping from `i32::MAX` to `i32::MIN`.
///
/// ```
/// assert_eq!(base64id::next_sequence(0x7FFF_FFFF), -0x8000_0000);
/// ```
pub const fn next_sequence(current: i32) -> i32 {
    current.wrapping_add(1)
}

/// Writes `value` as a big-endian `i32` into `block[offset..offset + 4]`.
///
/// # Errors
/// Returns [`Error::RangeViolation`] if `value` does not fit in an `i32` or
/// the four bytes starting at `offset` do not fit in `block`.
pub fn write_i32_be(block: &mut [u8], value: i64, offset: usize) -> Result<()> {
    let len = block.len();
    let violation = || Error::RangeViolation { value, offset, len };
    let value = i32::try_from(value).map_err(|_| violation())?;
    let end = offset
        .checked_add(4)
        .filter(|&end| end <= len)
        .ok_or_else(violation)?;

    block[offset..end].copy_from_slice(&value.to_be_bytes());
    Ok(())
}
