// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Memory buffer with a position-advancing typed cursor.
//!
//! A [`MemoryBuffer`] is sized to exactly the bytes of one transfer. Every
//! typed access advances the cursor by the wire width of its type and is
//! bounds-checked: an access past the end fails with
//! [`AdsError::BufferOverflow`] and leaves the cursor where it was.
//!
//! All multi-byte values are little endian, the byte order of the device.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::{AdsError, Result};

use super::scalar::{SIZE_BYTE, SIZE_DOUBLE, SIZE_FLOAT, SIZE_INT, SIZE_LONG, SIZE_SHORT};

/// Fixed-size byte region with a read/write cursor.
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use adscodec::encoding::MemoryBuffer;
///
/// let mut mem = MemoryBuffer::new(6);
/// mem.set_dint(-2)?;
/// mem.set_uint(65535)?;
/// assert_eq!(mem.position(), 6);
///
/// mem.rewind();
/// assert_eq!(mem.get_dint()?, -2);
/// assert_eq!(mem.get_uint()?, 65535);
/// assert!(mem.get_usint().is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBuffer {
    data: Vec<u8>,
    position: usize,
}

impl MemoryBuffer {
    /// Allocate a zeroed buffer of `size` bytes with the cursor at 0.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0u8; size],
            position: 0,
        }
    }

    /// Wrap existing bytes, cursor at 0.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data, position: 0 }
    }

    /// Total size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer has zero size.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Check if the cursor reached the end.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Move the cursor back to 0.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Whole buffer contents, independent of the cursor.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whole buffer contents for a transport to fill.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Advance over `count` bytes and return them.
    fn take(&mut self, count: usize) -> Result<&[u8]> {
        let start = self.claim(count)?;
        Ok(&self.data[start..start + count])
    }

    /// Advance over `count` bytes and return them for writing.
    fn take_mut(&mut self, count: usize) -> Result<&mut [u8]> {
        let start = self.claim(count)?;
        Ok(&mut self.data[start..start + count])
    }

    fn claim(&mut self, count: usize) -> Result<usize> {
        if count > self.remaining() {
            return Err(AdsError::buffer_overflow(
                count,
                self.remaining(),
                self.position,
            ));
        }
        let start = self.position;
        self.position += count;
        Ok(start)
    }

    /// Skip `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.claim(count).map(|_| ())
    }

    /// Read raw bytes.
    pub fn get_bytes(&mut self, count: usize) -> Result<&[u8]> {
        self.take(count)
    }

    /// Write raw bytes.
    pub fn set_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.take_mut(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    // ========================================================================
    // Scalars
    // ========================================================================

    /// Read an LREAL (f64).
    pub fn get_lreal(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(SIZE_DOUBLE)?))
    }

    /// Write an LREAL (f64).
    pub fn set_lreal(&mut self, value: f64) -> Result<()> {
        LittleEndian::write_f64(self.take_mut(SIZE_DOUBLE)?, value);
        Ok(())
    }

    /// Read a REAL (f32).
    pub fn get_real(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(SIZE_FLOAT)?))
    }

    /// Write a REAL (f32).
    pub fn set_real(&mut self, value: f32) -> Result<()> {
        LittleEndian::write_f32(self.take_mut(SIZE_FLOAT)?, value);
        Ok(())
    }

    /// Read an LINT (i64).
    pub fn get_lint(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.take(SIZE_LONG)?))
    }

    /// Write an LINT (i64).
    pub fn set_lint(&mut self, value: i64) -> Result<()> {
        LittleEndian::write_i64(self.take_mut(SIZE_LONG)?, value);
        Ok(())
    }

    /// Read a ULINT.
    ///
    /// The eight bytes are an unsigned little-endian magnitude; values with
    /// the top bit set decode to `2^63..=u64::MAX`, never to a negative.
    pub fn get_ulint(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(SIZE_LONG)?))
    }

    /// Write a ULINT.
    pub fn set_ulint(&mut self, value: u64) -> Result<()> {
        LittleEndian::write_u64(self.take_mut(SIZE_LONG)?, value);
        Ok(())
    }

    /// Read a DINT (i32).
    pub fn get_dint(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(SIZE_INT)?))
    }

    /// Write a DINT (i32).
    pub fn set_dint(&mut self, value: i32) -> Result<()> {
        LittleEndian::write_i32(self.take_mut(SIZE_INT)?, value);
        Ok(())
    }

    /// Read a UDINT (u32).
    pub fn get_udint(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(SIZE_INT)?))
    }

    /// Write a UDINT (u32).
    pub fn set_udint(&mut self, value: u32) -> Result<()> {
        LittleEndian::write_u32(self.take_mut(SIZE_INT)?, value);
        Ok(())
    }

    /// Read an INT (i16).
    pub fn get_int(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.take(SIZE_SHORT)?))
    }

    /// Write an INT (i16).
    pub fn set_int(&mut self, value: i16) -> Result<()> {
        LittleEndian::write_i16(self.take_mut(SIZE_SHORT)?, value);
        Ok(())
    }

    /// Read a UINT (u16).
    pub fn get_uint(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(SIZE_SHORT)?))
    }

    /// Write a UINT (u16).
    pub fn set_uint(&mut self, value: u16) -> Result<()> {
        LittleEndian::write_u16(self.take_mut(SIZE_SHORT)?, value);
        Ok(())
    }

    /// Read a SINT (i8).
    pub fn get_sint(&mut self) -> Result<i8> {
        Ok(self.take(SIZE_BYTE)?[0] as i8)
    }

    /// Write a SINT (i8).
    pub fn set_sint(&mut self, value: i8) -> Result<()> {
        self.take_mut(SIZE_BYTE)?[0] = value as u8;
        Ok(())
    }

    /// Read a USINT (u8).
    pub fn get_usint(&mut self) -> Result<u8> {
        Ok(self.take(SIZE_BYTE)?[0])
    }

    /// Write a USINT (u8).
    pub fn set_usint(&mut self, value: u8) -> Result<()> {
        self.take_mut(SIZE_BYTE)?[0] = value;
        Ok(())
    }

    /// Read a string field of `field_size` bytes.
    ///
    /// Decoding stops at the first zero byte; the cursor always advances by
    /// the whole field. Invalid UTF-8 is replaced, not rejected.
    pub fn get_string(&mut self, field_size: usize) -> Result<String> {
        let raw = self.take(field_size)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    /// Write a string into a field of `field_size` bytes.
    ///
    /// Writes the string bytes, a zero terminator and zero padding up to the
    /// field size. Fails if the string plus terminator does not fit, or if
    /// the string holds a zero byte, which a reader would take as the end.
    pub fn set_string(&mut self, value: &str, field_size: usize) -> Result<()> {
        let bytes = value.as_bytes();
        if bytes.contains(&0) {
            return Err(AdsError::type_mismatch("STRING", "string with interior NUL"));
        }
        if bytes.len() + 1 > field_size {
            return Err(AdsError::buffer_overflow(
                bytes.len() + 1,
                field_size,
                self.position,
            ));
        }
        let field = self.take_mut(field_size)?;
        field[..bytes.len()].copy_from_slice(bytes);
        field[bytes.len()..].fill(0);
        Ok(())
    }

    // ========================================================================
    // Bulk arrays: one cursor advance of `len * width`
    // ========================================================================

    /// Read `values.len()` LREALs.
    pub fn get_lreal_array(&mut self, values: &mut [f64]) -> Result<()> {
        let raw = self.take(values.len() * SIZE_DOUBLE)?;
        LittleEndian::read_f64_into(raw, values);
        Ok(())
    }

    /// Write LREALs.
    pub fn set_lreal_array(&mut self, values: &[f64]) -> Result<()> {
        let raw = self.take_mut(values.len() * SIZE_DOUBLE)?;
        LittleEndian::write_f64_into(values, raw);
        Ok(())
    }

    /// Read `values.len()` REALs.
    pub fn get_real_array(&mut self, values: &mut [f32]) -> Result<()> {
        let raw = self.take(values.len() * SIZE_FLOAT)?;
        LittleEndian::read_f32_into(raw, values);
        Ok(())
    }

    /// Write REALs.
    pub fn set_real_array(&mut self, values: &[f32]) -> Result<()> {
        let raw = self.take_mut(values.len() * SIZE_FLOAT)?;
        LittleEndian::write_f32_into(values, raw);
        Ok(())
    }

    /// Read `values.len()` LINTs.
    pub fn get_lint_array(&mut self, values: &mut [i64]) -> Result<()> {
        let raw = self.take(values.len() * SIZE_LONG)?;
        LittleEndian::read_i64_into(raw, values);
        Ok(())
    }

    /// Write LINTs.
    pub fn set_lint_array(&mut self, values: &[i64]) -> Result<()> {
        let raw = self.take_mut(values.len() * SIZE_LONG)?;
        LittleEndian::write_i64_into(values, raw);
        Ok(())
    }

    /// Read `values.len()` ULINTs.
    pub fn get_ulint_array(&mut self, values: &mut [u64]) -> Result<()> {
        let raw = self.take(values.len() * SIZE_LONG)?;
        LittleEndian::read_u64_into(raw, values);
        Ok(())
    }

    /// Write ULINTs.
    pub fn set_ulint_array(&mut self, values: &[u64]) -> Result<()> {
        let raw = self.take_mut(values.len() * SIZE_LONG)?;
        LittleEndian::write_u64_into(values, raw);
        Ok(())
    }

    /// Read `values.len()` DINTs.
    pub fn get_dint_array(&mut self, values: &mut [i32]) -> Result<()> {
        let raw = self.take(values.len() * SIZE_INT)?;
        LittleEndian::read_i32_into(raw, values);
        Ok(())
    }

    /// Write DINTs.
    pub fn set_dint_array(&mut self, values: &[i32]) -> Result<()> {
        let raw = self.take_mut(values.len() * SIZE_INT)?;
        LittleEndian::write_i32_into(values, raw);
        Ok(())
    }

    /// Read `values.len()` UDINTs.
    pub fn get_udint_array(&mut self, values: &mut [u32]) -> Result<()> {
        let raw = self.take(values.len() * SIZE_INT)?;
        LittleEndian::read_u32_into(raw, values);
        Ok(())
    }

    /// Write UDINTs.
    pub fn set_udint_array(&mut self, values: &[u32]) -> Result<()> {
        let raw = self.take_mut(values.len() * SIZE_INT)?;
        LittleEndian::write_u32_into(values, raw);
        Ok(())
    }

    /// Read `values.len()` INTs.
    pub fn get_int_array(&mut self, values: &mut [i16]) -> Result<()> {
        let raw = self.take(values.len() * SIZE_SHORT)?;
        LittleEndian::read_i16_into(raw, values);
        Ok(())
    }

    /// Write INTs.
    pub fn set_int_array(&mut self, values: &[i16]) -> Result<()> {
        let raw = self.take_mut(values.len() * SIZE_SHORT)?;
        LittleEndian::write_i16_into(values, raw);
        Ok(())
    }

    /// Read `values.len()` UINTs.
    pub fn get_uint_array(&mut self, values: &mut [u16]) -> Result<()> {
        let raw = self.take(values.len() * SIZE_SHORT)?;
        LittleEndian::read_u16_into(raw, values);
        Ok(())
    }

    /// Write UINTs.
    pub fn set_uint_array(&mut self, values: &[u16]) -> Result<()> {
        let raw = self.take_mut(values.len() * SIZE_SHORT)?;
        LittleEndian::write_u16_into(values, raw);
        Ok(())
    }

    /// Read `values.len()` SINTs.
    pub fn get_sint_array(&mut self, values: &mut [i8]) -> Result<()> {
        let raw = self.take(values.len() * SIZE_BYTE)?;
        for (dst, &src) in values.iter_mut().zip(raw) {
            *dst = src as i8;
        }
        Ok(())
    }

    /// Write SINTs.
    pub fn set_sint_array(&mut self, values: &[i8]) -> Result<()> {
        let raw = self.take_mut(values.len() * SIZE_BYTE)?;
        for (dst, &src) in raw.iter_mut().zip(values) {
            *dst = src as u8;
        }
        Ok(())
    }

    /// Read `values.len()` USINTs.
    pub fn get_usint_array(&mut self, values: &mut [u8]) -> Result<()> {
        values.copy_from_slice(self.take(values.len() * SIZE_BYTE)?);
        Ok(())
    }

    /// Write USINTs.
    pub fn set_usint_array(&mut self, values: &[u8]) -> Result<()> {
        self.set_bytes(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let mem = MemoryBuffer::new(4);
        assert_eq!(mem.as_bytes(), &[0, 0, 0, 0]);
        assert_eq!(mem.position(), 0);
        assert_eq!(mem.remaining(), 4);
    }

    #[test]
    fn test_dint_little_endian() {
        let mut mem = MemoryBuffer::new(4);
        mem.set_dint(0x1234_5678).unwrap();
        assert_eq!(mem.as_bytes(), &[0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_lreal_bit_pattern() {
        let mut mem = MemoryBuffer::new(8);
        mem.set_lreal(1.5).unwrap();
        assert_eq!(mem.as_bytes(), &[0, 0, 0, 0, 0, 0, 0xF8, 0x3F]);
    }

    #[test]
    fn test_uint_never_negative() {
        let mut mem = MemoryBuffer::from_bytes(vec![0xFF, 0xFF]);
        assert_eq!(mem.get_uint().unwrap(), 65535);
    }

    #[test]
    fn test_usint_never_negative() {
        let mut mem = MemoryBuffer::from_bytes(vec![0x9C]);
        assert_eq!(mem.get_usint().unwrap(), 156);
        mem.rewind();
        assert_eq!(mem.get_sint().unwrap(), -100);
    }

    #[test]
    fn test_ulint_top_bit_set() {
        let mut mem = MemoryBuffer::from_bytes(vec![0xFF; 8]);
        assert_eq!(mem.get_ulint().unwrap(), u64::MAX);

        let mut mem = MemoryBuffer::from_bytes(vec![0, 0, 0, 0, 0, 0, 0, 0x80]);
        assert_eq!(mem.get_ulint().unwrap(), 1u64 << 63);
    }

    #[test]
    fn test_overflow_leaves_cursor() {
        let mut mem = MemoryBuffer::new(6);
        mem.set_dint(1).unwrap();
        let err = mem.set_dint(2).unwrap_err();
        assert_eq!(err, AdsError::buffer_overflow(4, 2, 4));
        assert_eq!(mem.position(), 4);
        mem.set_int(3).unwrap();
        assert!(mem.is_at_end());
    }

    #[test]
    fn test_string_stops_at_terminator() {
        let mut mem = MemoryBuffer::from_bytes(b"abc\0xyz\0".to_vec());
        assert_eq!(mem.get_string(8).unwrap(), "abc");
        assert_eq!(mem.position(), 8);
    }

    #[test]
    fn test_string_without_terminator() {
        let mut mem = MemoryBuffer::from_bytes(b"abcd".to_vec());
        assert_eq!(mem.get_string(4).unwrap(), "abcd");
    }

    #[test]
    fn test_set_string_pads_field() {
        let mut mem = MemoryBuffer::from_bytes(vec![0xAA; 6]);
        mem.set_string("hi", 6).unwrap();
        assert_eq!(mem.as_bytes(), b"hi\0\0\0\0");
    }

    #[test]
    fn test_set_string_too_long() {
        let mut mem = MemoryBuffer::new(3);
        assert!(matches!(
            mem.set_string("abc", 3),
            Err(AdsError::BufferOverflow { .. })
        ));
        assert_eq!(mem.position(), 0);
    }

    #[test]
    fn test_set_string_rejects_interior_nul() {
        let mut mem = MemoryBuffer::from_bytes(vec![0xAA; 8]);
        assert!(matches!(
            mem.set_string("ab\0cd", 8),
            Err(AdsError::TypeMismatch { .. })
        ));
        assert_eq!(mem.position(), 0);
        assert_eq!(mem.as_bytes(), &[0xAA; 8]);
    }

    #[test]
    fn test_bulk_array_single_advance() {
        let mut mem = MemoryBuffer::new(12);
        mem.set_dint_array(&[1, -2, 3]).unwrap();
        assert!(mem.is_at_end());

        mem.rewind();
        let mut out = [0i32; 3];
        mem.get_dint_array(&mut out).unwrap();
        assert_eq!(out, [1, -2, 3]);
    }

    #[test]
    fn test_bulk_array_overflow() {
        let mut mem = MemoryBuffer::new(7);
        let mut out = [0u16; 4];
        assert!(mem.get_uint_array(&mut out).is_err());
        assert_eq!(mem.position(), 0);
    }

    #[test]
    fn test_sint_array() {
        let mut mem = MemoryBuffer::new(3);
        mem.set_sint_array(&[-1, 0, 127]).unwrap();
        assert_eq!(mem.as_bytes(), &[0xFF, 0x00, 0x7F]);
        mem.rewind();
        let mut out = [0i8; 3];
        mem.get_sint_array(&mut out).unwrap();
        assert_eq!(out, [-1, 0, 127]);
    }

    #[test]
    fn test_empty_array() {
        let mut mem = MemoryBuffer::new(0);
        mem.set_lreal_array(&[]).unwrap();
        let mut out: [f64; 0] = [];
        mem.get_lreal_array(&mut out).unwrap();
        assert!(mem.is_at_end());
    }
}
