// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire footprint calculation.
//!
//! Values are laid out back to back with no alignment padding, so the
//! footprint of a composite is the plain sum of its parts in field order.

use crate::core::{AdsError, Result};

use super::scalar::{
    AdsScalar, SIZE_BYTE, SIZE_DOUBLE, SIZE_FLOAT, SIZE_INT, SIZE_LONG, SIZE_SHORT,
};

/// Computes the footprint of a value of type `T` before a transfer.
///
/// Implementations must walk exactly the fields the matching visitor
/// walks, in the same order.
pub trait MemorySizeCalculator<T: ?Sized> {
    /// Bytes `value` occupies on the wire.
    fn calculate(&self, value: &T) -> Result<usize>;
}

/// Running footprint accumulator.
///
/// # Example
///
/// ```
/// use adscodec::encoding::SizeCalculator;
///
/// let mut calc = SizeCalculator::new();
/// calc.dint();       // 4 bytes
/// calc.lreal();      // 8 bytes
/// calc.string(10);   // 10 characters + terminator
/// calc.array(3, 2);  // 3 INTs
/// assert_eq!(calc.size(), 29);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SizeCalculator {
    offset: usize,
}

impl SizeCalculator {
    /// Create an empty calculator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total footprint so far.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.offset
    }

    /// Start over from zero.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Add an LREAL.
    pub fn lreal(&mut self) -> usize {
        self.increment_and_return(SIZE_DOUBLE)
    }

    /// Add a REAL.
    pub fn real(&mut self) -> usize {
        self.increment_and_return(SIZE_FLOAT)
    }

    /// Add an LINT.
    pub fn lint(&mut self) -> usize {
        self.increment_and_return(SIZE_LONG)
    }

    /// Add a ULINT.
    pub fn ulint(&mut self) -> usize {
        self.lint()
    }

    /// Add a DINT.
    pub fn dint(&mut self) -> usize {
        self.increment_and_return(SIZE_INT)
    }

    /// Add a UDINT.
    pub fn udint(&mut self) -> usize {
        self.dint()
    }

    /// Add an INT.
    pub fn int(&mut self) -> usize {
        self.increment_and_return(SIZE_SHORT)
    }

    /// Add a UINT.
    pub fn uint(&mut self) -> usize {
        self.int()
    }

    /// Add a SINT.
    pub fn sint(&mut self) -> usize {
        self.increment_and_return(SIZE_BYTE)
    }

    /// Add a USINT.
    pub fn usint(&mut self) -> usize {
        self.sint()
    }

    /// Add a string field holding up to `capacity` characters.
    pub fn string(&mut self, capacity: usize) -> usize {
        self.increment_and_return(capacity + 1)
    }

    /// Add `count` elements of `width` bytes each.
    pub fn array(&mut self, count: usize, width: usize) -> usize {
        self.increment_and_return(count * width)
    }

    /// Add `count` elements of `width` bytes each, failing instead of
    /// wrapping when the footprint does not fit in `usize`.
    pub fn try_array(&mut self, count: usize, width: usize) -> Result<usize> {
        let bytes = array_footprint(count, width)?;
        let end = self
            .offset
            .checked_add(bytes)
            .ok_or_else(|| AdsError::Other(format!("footprint exceeds {} bytes", usize::MAX)))?;
        self.offset = end;
        Ok(end)
    }

    /// Add `count` elements of scalar type `E`.
    pub fn array_of<E: AdsScalar>(&mut self, count: usize) -> usize {
        self.array(count, E::WIDTH)
    }

    /// Add one scalar of type `E`.
    pub fn scalar<E: AdsScalar>(&mut self) -> usize {
        self.increment_and_return(E::WIDTH)
    }

    /// Add `bytes` raw bytes.
    pub fn bytes(&mut self, bytes: usize) -> usize {
        self.increment_and_return(bytes)
    }

    fn increment_and_return(&mut self, bytes: usize) -> usize {
        self.offset += bytes;
        self.offset
    }
}

/// Byte size of `count` elements of `width` bytes each.
pub(crate) fn array_footprint(count: usize, width: usize) -> Result<usize> {
    count.checked_mul(width).ok_or_else(|| {
        AdsError::Other(format!("array of {count} x {width}-byte elements is too large"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(SizeCalculator::new().size(), 0);
    }

    #[test]
    fn test_scalar_widths() {
        let mut calc = SizeCalculator::new();
        assert_eq!(calc.lreal(), 8);
        assert_eq!(calc.real(), 12);
        assert_eq!(calc.ulint(), 20);
        assert_eq!(calc.udint(), 24);
        assert_eq!(calc.uint(), 26);
        assert_eq!(calc.usint(), 27);
    }

    #[test]
    fn test_no_padding() {
        let mut calc = SizeCalculator::new();
        calc.sint();
        calc.lreal();
        assert_eq!(calc.size(), 9);
    }

    #[test]
    fn test_array_and_string() {
        let mut calc = SizeCalculator::new();
        calc.array_of::<f64>(3);
        assert_eq!(calc.size(), 24);
        calc.string(80);
        assert_eq!(calc.size(), 105);
        calc.array_of::<u16>(0);
        assert_eq!(calc.size(), 105);
    }

    #[test]
    fn test_try_array_overflow() {
        let mut calc = SizeCalculator::new();
        assert_eq!(calc.try_array(4, 2).unwrap(), 8);
        assert!(calc.try_array(usize::MAX, 8).is_err());
        assert!(calc.try_array(usize::MAX, 1).is_err());
        assert_eq!(calc.size(), 8);
    }

    #[test]
    fn test_reset() {
        let mut calc = SizeCalculator::new();
        calc.dint();
        calc.reset();
        assert_eq!(calc.size(), 0);
    }
}
