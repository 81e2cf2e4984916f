// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire encoding of PLC values.
//!
//! This module provides the marshalling layer between Rust values and the
//! device's packed little-endian memory layout:
//! - [`scalar`] - Scalar wire types and widths
//! - [`buffer`] - Memory buffer with a typed cursor
//! - [`calculator`] - Footprint calculation
//! - [`visitor`] - Read/write visitors, array codecs and explicit struct layouts
//! - [`reflect`] - Schema-driven visitor and calculator over dynamic values

pub mod buffer;
pub mod calculator;
pub mod reflect;
pub mod scalar;
pub mod visitor;

pub use buffer::MemoryBuffer;
pub use calculator::{MemorySizeCalculator, SizeCalculator};
pub use reflect::{FieldLayout, ReflectiveSizeCalculator, ReflectiveStructVisitor};
pub use scalar::{
    decode_scalar, encode_scalar, parse_scalar, read_scalar, wire_size, write_scalar, AdsScalar,
    ScalarType, DEFAULT_STRING_LENGTH, STRING_READ_SIZE,
};
pub use visitor::{ArrayCodec, PlcStruct, ReadVisitor, StructCodec, WriteVisitor};
