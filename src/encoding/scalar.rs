// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Scalar wire types.
//!
//! Maps each supported PLC elementary type to its byte width and to the
//! Rust type that carries it. Unsigned wire types decode to native unsigned
//! integers, so every value in the full unsigned range round-trips.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{AdsError, PlcValue, Result};

use super::buffer::MemoryBuffer;

/// Width of a byte-sized value.
pub const SIZE_BYTE: usize = 1;
/// Width of a short (INT/UINT).
pub const SIZE_SHORT: usize = 2;
/// Width of an int (DINT/UDINT).
pub const SIZE_INT: usize = 4;
/// Width of a long (LINT/ULINT).
pub const SIZE_LONG: usize = 8;
/// Width of a REAL.
pub const SIZE_FLOAT: usize = 4;
/// Width of an LREAL.
pub const SIZE_DOUBLE: usize = 8;

/// Buffer size used to read a string variable by name.
pub const STRING_READ_SIZE: usize = 1024;

/// Capacity of a `STRING` declared without an explicit length.
pub const DEFAULT_STRING_LENGTH: usize = 80;

/// Elementary PLC types with a wire mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScalarType {
    /// 8-byte IEEE 754 double
    LReal,
    /// 4-byte IEEE 754 single
    Real,
    /// 8-byte signed
    LInt,
    /// 8-byte unsigned
    ULInt,
    /// 4-byte signed
    DInt,
    /// 4-byte unsigned
    UDInt,
    /// 2-byte signed
    Int,
    /// 2-byte unsigned
    UInt,
    /// 1-byte signed
    SInt,
    /// 1-byte unsigned
    USInt,
    /// Zero-terminated byte string
    String,
}

impl ScalarType {
    /// All scalar types, widest first.
    pub const ALL: [ScalarType; 11] = [
        ScalarType::LReal,
        ScalarType::Real,
        ScalarType::LInt,
        ScalarType::ULInt,
        ScalarType::DInt,
        ScalarType::UDInt,
        ScalarType::Int,
        ScalarType::UInt,
        ScalarType::SInt,
        ScalarType::USInt,
        ScalarType::String,
    ];

    /// Fixed wire width in bytes. `None` for STRING.
    pub fn width(self) -> Option<usize> {
        match self {
            ScalarType::LReal => Some(SIZE_DOUBLE),
            ScalarType::Real => Some(SIZE_FLOAT),
            ScalarType::LInt | ScalarType::ULInt => Some(SIZE_LONG),
            ScalarType::DInt | ScalarType::UDInt => Some(SIZE_INT),
            ScalarType::Int | ScalarType::UInt => Some(SIZE_SHORT),
            ScalarType::SInt | ScalarType::USInt => Some(SIZE_BYTE),
            ScalarType::String => None,
        }
    }

    /// Check if this is a signed integer or floating point type.
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            ScalarType::LReal
                | ScalarType::Real
                | ScalarType::LInt
                | ScalarType::DInt
                | ScalarType::Int
                | ScalarType::SInt
        )
    }

    /// Check if this is a floating point type.
    pub fn is_float(self) -> bool {
        matches!(self, ScalarType::LReal | ScalarType::Real)
    }

    /// IEC 61131-3 type name.
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::LReal => "LREAL",
            ScalarType::Real => "REAL",
            ScalarType::LInt => "LINT",
            ScalarType::ULInt => "ULINT",
            ScalarType::DInt => "DINT",
            ScalarType::UDInt => "UDINT",
            ScalarType::Int => "INT",
            ScalarType::UInt => "UINT",
            ScalarType::SInt => "SINT",
            ScalarType::USInt => "USINT",
            ScalarType::String => "STRING",
        }
    }

    /// Look up a type by IEC name, case-insensitive.
    ///
    /// Bit-string types map to the unsigned integer of the same width:
    /// BYTE to USINT, WORD to UINT, DWORD to UDINT and LWORD to ULINT.
    pub fn from_name(name: &str) -> Option<ScalarType> {
        let ty = match name.to_ascii_uppercase().as_str() {
            "LREAL" => ScalarType::LReal,
            "REAL" => ScalarType::Real,
            "LINT" => ScalarType::LInt,
            "ULINT" | "LWORD" => ScalarType::ULInt,
            "DINT" => ScalarType::DInt,
            "UDINT" | "DWORD" => ScalarType::UDInt,
            "INT" => ScalarType::Int,
            "UINT" | "WORD" => ScalarType::UInt,
            "SINT" => ScalarType::SInt,
            "USINT" | "BYTE" => ScalarType::USInt,
            "STRING" => ScalarType::String,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarType {
    type Err = AdsError;

    fn from_str(s: &str) -> Result<Self> {
        ScalarType::from_name(s).ok_or_else(|| AdsError::unsupported(format!("scalar type {s}")))
    }
}

/// A Rust type carrying one fixed-width PLC scalar.
///
/// Implemented for the ten numeric types. Provides single and bulk access on
/// a [`MemoryBuffer`] plus strict conversion out of a [`PlcValue`].
pub trait AdsScalar: Copy + Default + Into<PlcValue> {
    /// Wire type of this Rust type.
    const TYPE: ScalarType;
    /// Wire width in bytes.
    const WIDTH: usize;

    /// Read one value at the cursor.
    fn get(mem: &mut MemoryBuffer) -> Result<Self>;

    /// Write one value at the cursor.
    fn set(self, mem: &mut MemoryBuffer) -> Result<()>;

    /// Read `out.len()` values in one cursor advance.
    fn get_slice(mem: &mut MemoryBuffer, out: &mut [Self]) -> Result<()>;

    /// Write `values` in one cursor advance.
    fn set_slice(mem: &mut MemoryBuffer, values: &[Self]) -> Result<()>;

    /// Extract from a dynamic value of exactly this wire type.
    fn from_value(value: &PlcValue) -> Result<Self>;
}

macro_rules! impl_ads_scalar {
    ($ty:ty, $variant:ident, $get:ident, $set:ident, $get_arr:ident, $set_arr:ident) => {
        impl AdsScalar for $ty {
            const TYPE: ScalarType = ScalarType::$variant;
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn get(mem: &mut MemoryBuffer) -> Result<Self> {
                mem.$get()
            }

            fn set(self, mem: &mut MemoryBuffer) -> Result<()> {
                mem.$set(self)
            }

            fn get_slice(mem: &mut MemoryBuffer, out: &mut [Self]) -> Result<()> {
                mem.$get_arr(out)
            }

            fn set_slice(mem: &mut MemoryBuffer, values: &[Self]) -> Result<()> {
                mem.$set_arr(values)
            }

            fn from_value(value: &PlcValue) -> Result<Self> {
                match value {
                    PlcValue::$variant(v) => Ok(*v),
                    other => Err(AdsError::type_mismatch(
                        ScalarType::$variant.name(),
                        other.type_name(),
                    )),
                }
            }
        }
    };
}

impl_ads_scalar!(f64, LReal, get_lreal, set_lreal, get_lreal_array, set_lreal_array);
impl_ads_scalar!(f32, Real, get_real, set_real, get_real_array, set_real_array);
impl_ads_scalar!(i64, LInt, get_lint, set_lint, get_lint_array, set_lint_array);
impl_ads_scalar!(u64, ULInt, get_ulint, set_ulint, get_ulint_array, set_ulint_array);
impl_ads_scalar!(i32, DInt, get_dint, set_dint, get_dint_array, set_dint_array);
impl_ads_scalar!(u32, UDInt, get_udint, set_udint, get_udint_array, set_udint_array);
impl_ads_scalar!(i16, Int, get_int, set_int, get_int_array, set_int_array);
impl_ads_scalar!(u16, UInt, get_uint, set_uint, get_uint_array, set_uint_array);
impl_ads_scalar!(i8, SInt, get_sint, set_sint, get_sint_array, set_sint_array);
impl_ads_scalar!(u8, USInt, get_usint, set_usint, get_usint_array, set_usint_array);

/// Bytes a scalar value occupies when sent on its own.
///
/// Strings take their byte length plus the terminator. Returns `None` for
/// arrays and structs.
pub fn wire_size(value: &PlcValue) -> Option<usize> {
    match value {
        PlcValue::String(s) => Some(s.len() + 1),
        other => other.scalar_type().and_then(ScalarType::width),
    }
}

/// Read one scalar of type `ty` at the cursor.
///
/// A STRING takes the rest of the buffer and stops at the first zero byte.
pub fn read_scalar(ty: ScalarType, mem: &mut MemoryBuffer) -> Result<PlcValue> {
    let value = match ty {
        ScalarType::LReal => PlcValue::LReal(mem.get_lreal()?),
        ScalarType::Real => PlcValue::Real(mem.get_real()?),
        ScalarType::LInt => PlcValue::LInt(mem.get_lint()?),
        ScalarType::ULInt => PlcValue::ULInt(mem.get_ulint()?),
        ScalarType::DInt => PlcValue::DInt(mem.get_dint()?),
        ScalarType::UDInt => PlcValue::UDInt(mem.get_udint()?),
        ScalarType::Int => PlcValue::Int(mem.get_int()?),
        ScalarType::UInt => PlcValue::UInt(mem.get_uint()?),
        ScalarType::SInt => PlcValue::SInt(mem.get_sint()?),
        ScalarType::USInt => PlcValue::USInt(mem.get_usint()?),
        ScalarType::String => {
            let rest = mem.remaining();
            PlcValue::String(mem.get_string(rest)?)
        }
    };
    Ok(value)
}

/// Write one scalar value at the cursor.
///
/// A STRING writes its bytes and one zero terminator.
pub fn write_scalar(value: &PlcValue, mem: &mut MemoryBuffer) -> Result<()> {
    match value {
        PlcValue::LReal(v) => mem.set_lreal(*v),
        PlcValue::Real(v) => mem.set_real(*v),
        PlcValue::LInt(v) => mem.set_lint(*v),
        PlcValue::ULInt(v) => mem.set_ulint(*v),
        PlcValue::DInt(v) => mem.set_dint(*v),
        PlcValue::UDInt(v) => mem.set_udint(*v),
        PlcValue::Int(v) => mem.set_int(*v),
        PlcValue::UInt(v) => mem.set_uint(*v),
        PlcValue::SInt(v) => mem.set_sint(*v),
        PlcValue::USInt(v) => mem.set_usint(*v),
        PlcValue::String(s) => mem.set_string(s, s.len() + 1),
        other => Err(AdsError::type_mismatch("scalar", other.type_name())),
    }
}

/// Encode a scalar value into a buffer of exactly its wire size.
pub fn encode_scalar(value: &PlcValue) -> Result<Vec<u8>> {
    let size = wire_size(value)
        .ok_or_else(|| AdsError::type_mismatch("scalar", value.type_name()))?;
    let mut mem = MemoryBuffer::new(size);
    write_scalar(value, &mut mem)?;
    Ok(mem.into_bytes())
}

/// Decode a scalar of type `ty` from the front of `bytes`.
pub fn decode_scalar(ty: ScalarType, bytes: &[u8]) -> Result<PlcValue> {
    let mut mem = MemoryBuffer::from_bytes(bytes.to_vec());
    read_scalar(ty, &mut mem)
}

/// Parse a textual literal as a value of type `ty`.
pub fn parse_scalar(ty: ScalarType, text: &str) -> Result<PlcValue> {
    fn num<T: FromStr>(ty: ScalarType, text: &str) -> Result<T>
    where
        T::Err: fmt::Display,
    {
        text.trim()
            .parse::<T>()
            .map_err(|e| AdsError::parse(format!("{ty} literal '{text}'"), e.to_string()))
    }

    let value = match ty {
        ScalarType::LReal => PlcValue::LReal(num(ty, text)?),
        ScalarType::Real => PlcValue::Real(num(ty, text)?),
        ScalarType::LInt => PlcValue::LInt(num(ty, text)?),
        ScalarType::ULInt => PlcValue::ULInt(num(ty, text)?),
        ScalarType::DInt => PlcValue::DInt(num(ty, text)?),
        ScalarType::UDInt => PlcValue::UDInt(num(ty, text)?),
        ScalarType::Int => PlcValue::Int(num(ty, text)?),
        ScalarType::UInt => PlcValue::UInt(num(ty, text)?),
        ScalarType::SInt => PlcValue::SInt(num(ty, text)?),
        ScalarType::USInt => PlcValue::USInt(num(ty, text)?),
        ScalarType::String => PlcValue::String(text.to_string()),
    };
    Ok(value)
}
