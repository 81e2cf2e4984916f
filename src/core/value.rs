// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dynamic PLC value type.
//!
//! [`PlcValue`] carries a value of any supported wire type without a Rust
//! struct declared for it. The reflective marshalling path walks these
//! values against a declared struct layout.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::encoding::ScalarType;

/// Field name -> value mapping of a struct value.
pub type FieldMap = HashMap<String, PlcValue>;

/// Unified value type for PLC variables.
///
/// Each scalar variant corresponds to exactly one wire type, so a value
/// never needs a width hint to be encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlcValue {
    /// LREAL, 8 bytes
    LReal(f64),
    /// REAL, 4 bytes
    Real(f32),
    /// LINT, 8 bytes signed
    LInt(i64),
    /// ULINT, 8 bytes unsigned
    ULInt(u64),
    /// DINT, 4 bytes signed
    DInt(i32),
    /// UDINT, 4 bytes unsigned
    UDInt(u32),
    /// INT, 2 bytes signed
    Int(i16),
    /// UINT, 2 bytes unsigned
    UInt(u16),
    /// SINT, 1 byte signed
    SInt(i8),
    /// USINT, 1 byte unsigned
    USInt(u8),
    /// STRING, zero-terminated
    String(String),
    /// Array of values of one element type
    Array(Vec<PlcValue>),
    /// Struct instance
    Struct(FieldMap),
}

impl PlcValue {
    /// Check if this value is a scalar (not an array or struct).
    pub fn is_scalar(&self) -> bool {
        !self.is_container()
    }

    /// Check if this value is a container type (array or struct).
    pub fn is_container(&self) -> bool {
        matches!(self, PlcValue::Array(_) | PlcValue::Struct(_))
    }

    /// Check if this value is an unsigned integer.
    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            PlcValue::ULInt(_) | PlcValue::UDInt(_) | PlcValue::UInt(_) | PlcValue::USInt(_)
        )
    }

    /// Wire type of a scalar value.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            PlcValue::LReal(_) => Some(ScalarType::LReal),
            PlcValue::Real(_) => Some(ScalarType::Real),
            PlcValue::LInt(_) => Some(ScalarType::LInt),
            PlcValue::ULInt(_) => Some(ScalarType::ULInt),
            PlcValue::DInt(_) => Some(ScalarType::DInt),
            PlcValue::UDInt(_) => Some(ScalarType::UDInt),
            PlcValue::Int(_) => Some(ScalarType::Int),
            PlcValue::UInt(_) => Some(ScalarType::UInt),
            PlcValue::SInt(_) => Some(ScalarType::SInt),
            PlcValue::USInt(_) => Some(ScalarType::USInt),
            PlcValue::String(_) => Some(ScalarType::String),
            PlcValue::Array(_) | PlcValue::Struct(_) => None,
        }
    }

    /// Try to convert this value to f64 (numeric values only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PlcValue::LReal(v) => Some(*v),
            PlcValue::Real(v) => Some(*v as f64),
            PlcValue::LInt(v) => Some(*v as f64),
            PlcValue::ULInt(v) => Some(*v as f64),
            PlcValue::DInt(v) => Some(*v as f64),
            PlcValue::UDInt(v) => Some(*v as f64),
            PlcValue::Int(v) => Some(*v as f64),
            PlcValue::UInt(v) => Some(*v as f64),
            PlcValue::SInt(v) => Some(*v as f64),
            PlcValue::USInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to convert this value to i64 (integer types only).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PlcValue::LInt(v) => Some(*v),
            PlcValue::ULInt(v) => i64::try_from(*v).ok(),
            PlcValue::DInt(v) => Some(*v as i64),
            PlcValue::UDInt(v) => Some(*v as i64),
            PlcValue::Int(v) => Some(*v as i64),
            PlcValue::UInt(v) => Some(*v as i64),
            PlcValue::SInt(v) => Some(*v as i64),
            PlcValue::USInt(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Try to get the inner string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlcValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the inner array.
    pub fn as_array(&self) -> Option<&[PlcValue]> {
        match self {
            PlcValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get a mutable reference to the inner array.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<PlcValue>> {
        match self {
            PlcValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get the inner struct.
    pub fn as_struct(&self) -> Option<&FieldMap> {
        match self {
            PlcValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get a mutable reference to the inner struct.
    pub fn as_struct_mut(&mut self) -> Option<&mut FieldMap> {
        match self {
            PlcValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Get the type name of this value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            PlcValue::Array(_) => "ARRAY",
            PlcValue::Struct(_) => "STRUCT",
            other => other
                .scalar_type()
                .map(ScalarType::name)
                .unwrap_or("UNKNOWN"),
        }
    }
}

impl fmt::Display for PlcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlcValue::LReal(v) => write!(f, "{v}"),
            PlcValue::Real(v) => write!(f, "{v}"),
            PlcValue::LInt(v) => write!(f, "{v}"),
            PlcValue::ULInt(v) => write!(f, "{v}"),
            PlcValue::DInt(v) => write!(f, "{v}"),
            PlcValue::UDInt(v) => write!(f, "{v}"),
            PlcValue::Int(v) => write!(f, "{v}"),
            PlcValue::UInt(v) => write!(f, "{v}"),
            PlcValue::SInt(v) => write!(f, "{v}"),
            PlcValue::USInt(v) => write!(f, "{v}"),
            PlcValue::String(v) => write!(f, "{v:?}"),
            PlcValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            PlcValue::Struct(fields) => {
                let mut names: Vec<&String> = fields.keys().collect();
                names.sort();
                write!(f, "{{")?;
                for (i, name) in names.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {}", fields[name])?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<f64> for PlcValue {
    fn from(v: f64) -> Self {
        PlcValue::LReal(v)
    }
}

impl From<f32> for PlcValue {
    fn from(v: f32) -> Self {
        PlcValue::Real(v)
    }
}

impl From<i64> for PlcValue {
    fn from(v: i64) -> Self {
        PlcValue::LInt(v)
    }
}

impl From<u64> for PlcValue {
    fn from(v: u64) -> Self {
        PlcValue::ULInt(v)
    }
}

impl From<i32> for PlcValue {
    fn from(v: i32) -> Self {
        PlcValue::DInt(v)
    }
}

impl From<u32> for PlcValue {
    fn from(v: u32) -> Self {
        PlcValue::UDInt(v)
    }
}

impl From<i16> for PlcValue {
    fn from(v: i16) -> Self {
        PlcValue::Int(v)
    }
}

impl From<u16> for PlcValue {
    fn from(v: u16) -> Self {
        PlcValue::UInt(v)
    }
}

impl From<i8> for PlcValue {
    fn from(v: i8) -> Self {
        PlcValue::SInt(v)
    }
}

impl From<u8> for PlcValue {
    fn from(v: u8) -> Self {
        PlcValue::USInt(v)
    }
}

impl From<String> for PlcValue {
    fn from(v: String) -> Self {
        PlcValue::String(v)
    }
}

impl From<&str> for PlcValue {
    fn from(v: &str) -> Self {
        PlcValue::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_type_mapping() {
        assert_eq!(PlcValue::LReal(1.0).scalar_type(), Some(ScalarType::LReal));
        assert_eq!(PlcValue::UInt(7).scalar_type(), Some(ScalarType::UInt));
        assert_eq!(PlcValue::Array(vec![]).scalar_type(), None);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(PlcValue::DInt(1).type_name(), "DINT");
        assert_eq!(PlcValue::String("a".into()).type_name(), "STRING");
        assert_eq!(PlcValue::Struct(FieldMap::new()).type_name(), "STRUCT");
        assert_eq!(PlcValue::Array(vec![]).type_name(), "ARRAY");
    }

    #[test]
    fn test_as_i64_rejects_large_ulint() {
        assert_eq!(PlcValue::ULInt(42).as_i64(), Some(42));
        assert_eq!(PlcValue::ULInt(u64::MAX).as_i64(), None);
        assert_eq!(PlcValue::LReal(1.0).as_i64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(PlcValue::DInt(-5).to_string(), "-5");
        assert_eq!(PlcValue::String("a b".into()).to_string(), "\"a b\"");
        let arr = PlcValue::Array(vec![PlcValue::Int(1), PlcValue::Int(2)]);
        assert_eq!(arr.to_string(), "[1, 2]");
        let mut fields = FieldMap::new();
        fields.insert("y".into(), PlcValue::USInt(2));
        fields.insert("x".into(), PlcValue::USInt(1));
        assert_eq!(PlcValue::Struct(fields).to_string(), "{x: 1, y: 2}");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(PlcValue::from(5u16), PlcValue::UInt(5));
        assert_eq!(PlcValue::from(-5i8), PlcValue::SInt(-5));
        assert_eq!(PlcValue::from("x"), PlcValue::String("x".into()));
        assert!(PlcValue::from(1u8).is_unsigned_integer());
        assert!(!PlcValue::from(1i8).is_unsigned_integer());
    }
}
