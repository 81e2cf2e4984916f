// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Read and write visitors for composite transfers.
//!
//! A visitor issues a fixed sequence of typed `get`/`set` calls on a
//! [`MemoryBuffer`]. Paired with a [`MemorySizeCalculator`] that walks the
//! same sequence, it moves one composite value in a single request.

use std::marker::PhantomData;

use crate::core::{AdsError, Result};

use super::buffer::MemoryBuffer;
use super::calculator::{array_footprint, MemorySizeCalculator, SizeCalculator};
use super::scalar::AdsScalar;

/// Encodes a value of type `T` into a buffer.
pub trait WriteVisitor<T: ?Sized> {
    /// Write every field of `value` at the cursor, in wire order.
    fn write(&self, mem: &mut MemoryBuffer, value: &T) -> Result<()>;
}

/// Decodes a value of type `T` from a buffer.
pub trait ReadVisitor<T: ?Sized> {
    /// Prepare `value` for extraction before the read request is issued.
    ///
    /// Only called by bound reads. Containers that must be pre-sized do it
    /// here; the default does nothing.
    fn bind(&self, _mem: &MemoryBuffer, _value: &mut T) -> Result<()> {
        Ok(())
    }

    /// Read every field of `value` at the cursor, in wire order.
    fn read(&self, mem: &mut MemoryBuffer, value: &mut T) -> Result<()>;
}

/// Bulk codec for an array of one scalar type.
///
/// The whole array moves in one cursor advance of `len * width`. With a
/// fixed length the destination is resized to it on read; otherwise the
/// runtime length of the value decides the footprint.
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use adscodec::encoding::{
///     ArrayCodec, MemoryBuffer, MemorySizeCalculator, ReadVisitor, WriteVisitor,
/// };
///
/// let codec = ArrayCodec::<f64>::new();
/// let values = vec![0.0, 1234215343.343, 75474564234.3245];
///
/// let mut mem = MemoryBuffer::new(codec.calculate(&values)?);
/// codec.write(&mut mem, &values)?;
///
/// mem.rewind();
/// let mut out = vec![0.0; 3];
/// codec.read(&mut mem, &mut out)?;
/// assert_eq!(out, values);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ArrayCodec<E> {
    fixed_len: Option<usize>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: AdsScalar> Default for ArrayCodec<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: AdsScalar> ArrayCodec<E> {
    /// Codec sized by the runtime length of the value.
    pub fn new() -> Self {
        Self {
            fixed_len: None,
            _marker: PhantomData,
        }
    }

    /// Codec for an array declared with exactly `len` elements.
    pub fn with_len(len: usize) -> Self {
        Self {
            fixed_len: Some(len),
            _marker: PhantomData,
        }
    }

    /// Declared element count, if fixed.
    pub fn fixed_len(&self) -> Option<usize> {
        self.fixed_len
    }

    fn check_len(&self, actual: usize) -> Result<()> {
        match self.fixed_len {
            Some(len) if len != actual => Err(AdsError::type_mismatch(
                format!("ARRAY[0..{}] OF {}", len.saturating_sub(1), E::TYPE),
                format!("{actual} elements"),
            )),
            _ => Ok(()),
        }
    }
}

impl<E: AdsScalar> MemorySizeCalculator<[E]> for ArrayCodec<E> {
    fn calculate(&self, value: &[E]) -> Result<usize> {
        let count = self.fixed_len.unwrap_or(value.len());
        array_footprint(count, E::WIDTH)
    }
}

impl<E: AdsScalar> WriteVisitor<[E]> for ArrayCodec<E> {
    fn write(&self, mem: &mut MemoryBuffer, value: &[E]) -> Result<()> {
        self.check_len(value.len())?;
        E::set_slice(mem, value)
    }
}

impl<E: AdsScalar> MemorySizeCalculator<Vec<E>> for ArrayCodec<E> {
    fn calculate(&self, value: &Vec<E>) -> Result<usize> {
        MemorySizeCalculator::<[E]>::calculate(self, value)
    }
}

impl<E: AdsScalar> WriteVisitor<Vec<E>> for ArrayCodec<E> {
    fn write(&self, mem: &mut MemoryBuffer, value: &Vec<E>) -> Result<()> {
        WriteVisitor::<[E]>::write(self, mem, value)
    }
}

impl<E: AdsScalar> ReadVisitor<Vec<E>> for ArrayCodec<E> {
    fn bind(&self, _mem: &MemoryBuffer, value: &mut Vec<E>) -> Result<()> {
        if let Some(len) = self.fixed_len {
            value.resize(len, E::default());
        }
        Ok(())
    }

    fn read(&self, mem: &mut MemoryBuffer, value: &mut Vec<E>) -> Result<()> {
        if let Some(len) = self.fixed_len {
            value.resize(len, E::default());
        }
        E::get_slice(mem, value)
    }
}

/// A Rust struct with a hand-declared wire layout.
///
/// The three methods must visit the same fields in the same order as the
/// PLC declaration.
///
/// # Example
///
/// ```
/// use adscodec::encoding::{MemoryBuffer, PlcStruct, SizeCalculator};
/// use adscodec::Result;
///
/// #[derive(Default)]
/// struct Axis {
///     position: f64,
///     state: u16,
/// }
///
/// impl PlcStruct for Axis {
///     fn size_fields(&self, calc: &mut SizeCalculator) {
///         calc.lreal();
///         calc.uint();
///     }
///
///     fn write_fields(&self, mem: &mut MemoryBuffer) -> Result<()> {
///         mem.set_lreal(self.position)?;
///         mem.set_uint(self.state)
///     }
///
///     fn read_fields(&mut self, mem: &mut MemoryBuffer) -> Result<()> {
///         self.position = mem.get_lreal()?;
///         self.state = mem.get_uint()?;
///         Ok(())
///     }
/// }
///
/// assert_eq!(Axis::default().wire_size(), 10);
/// ```
pub trait PlcStruct {
    /// Add every field's footprint to `calc`.
    fn size_fields(&self, calc: &mut SizeCalculator);

    /// Write every field at the cursor.
    fn write_fields(&self, mem: &mut MemoryBuffer) -> Result<()>;

    /// Read every field at the cursor.
    fn read_fields(&mut self, mem: &mut MemoryBuffer) -> Result<()>;

    /// Total footprint of this value.
    fn wire_size(&self) -> usize {
        let mut calc = SizeCalculator::new();
        self.size_fields(&mut calc);
        calc.size()
    }
}

/// Calculator and visitor pair for any [`PlcStruct`].
#[derive(Debug, Clone, Copy)]
pub struct StructCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: PlcStruct> Default for StructCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PlcStruct> StructCodec<T> {
    /// Create the codec.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: PlcStruct> MemorySizeCalculator<T> for StructCodec<T> {
    fn calculate(&self, value: &T) -> Result<usize> {
        Ok(value.wire_size())
    }
}

impl<T: PlcStruct> WriteVisitor<T> for StructCodec<T> {
    fn write(&self, mem: &mut MemoryBuffer, value: &T) -> Result<()> {
        value.write_fields(mem)
    }
}

impl<T: PlcStruct> ReadVisitor<T> for StructCodec<T> {
    fn read(&self, mem: &mut MemoryBuffer, value: &mut T) -> Result<()> {
        value.read_fields(mem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Recipe {
        id: i32,
        speed: f64,
        name: String,
        limits: [u16; 3],
    }

    impl PlcStruct for Recipe {
        fn size_fields(&self, calc: &mut SizeCalculator) {
            calc.dint();
            calc.lreal();
            calc.string(10);
            calc.array_of::<u16>(3);
        }

        fn write_fields(&self, mem: &mut MemoryBuffer) -> Result<()> {
            mem.set_dint(self.id)?;
            mem.set_lreal(self.speed)?;
            mem.set_string(&self.name, 11)?;
            mem.set_uint_array(&self.limits)
        }

        fn read_fields(&mut self, mem: &mut MemoryBuffer) -> Result<()> {
            self.id = mem.get_dint()?;
            self.speed = mem.get_lreal()?;
            self.name = mem.get_string(11)?;
            mem.get_uint_array(&mut self.limits)
        }
    }

    #[test]
    fn test_struct_codec_round_trip() {
        let codec = StructCodec::<Recipe>::new();
        let value = Recipe {
            id: -7,
            speed: 2.5,
            name: "mix".to_string(),
            limits: [1, 65535, 300],
        };

        let size = codec.calculate(&value).unwrap();
        assert_eq!(size, 4 + 8 + 11 + 6);

        let mut mem = MemoryBuffer::new(size);
        codec.write(&mut mem, &value).unwrap();
        assert!(mem.is_at_end());

        mem.rewind();
        let mut out = Recipe::default();
        codec.read(&mut mem, &mut out).unwrap();
        assert_eq!(out, value);
    }

    #[test]
    fn test_array_codec_runtime_length() {
        let codec = ArrayCodec::<i16>::new();
        assert_eq!(codec.calculate(&vec![1i16, 2, 3]).unwrap(), 6);
        assert_eq!(codec.calculate(&[7i16][..]).unwrap(), 2);
        assert_eq!(codec.calculate(&Vec::<i16>::new()).unwrap(), 0);
    }

    #[test]
    fn test_array_codec_oversized_length_is_error() {
        let codec = ArrayCodec::<f64>::with_len(usize::MAX);
        assert!(matches!(
            codec.calculate(&Vec::<f64>::new()),
            Err(AdsError::Other(_))
        ));
    }

    #[test]
    fn test_array_codec_fixed_length_rejects_other_length() {
        let codec = ArrayCodec::<u32>::with_len(2);
        let mut mem = MemoryBuffer::new(8);
        assert!(matches!(
            codec.write(&mut mem, &vec![1u32, 2, 3]),
            Err(AdsError::TypeMismatch { .. })
        ));
        assert_eq!(mem.position(), 0);
    }

    #[test]
    fn test_array_codec_bind_presizes() {
        let codec = ArrayCodec::<u8>::with_len(4);
        let mem = MemoryBuffer::new(4);
        let mut out = Vec::new();
        codec.bind(&mem, &mut out).unwrap();
        assert_eq!(out, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_array_codec_fixed_length_read_resizes() {
        let codec = ArrayCodec::<u8>::with_len(2);
        let mut mem = MemoryBuffer::from_bytes(vec![9, 8]);
        let mut out = vec![1, 2, 3, 4];
        codec.read(&mut mem, &mut out).unwrap();
        assert_eq!(out, vec![9, 8]);
    }
}
