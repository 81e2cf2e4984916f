// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Struct layouts for the reflective marshalling path.
//!
//! Layouts are either built in code with [`StructType`] or parsed from the
//! IEC 61131-3 declarations a PLC project exports.

pub mod ast;
pub mod parser;

pub use ast::{Field, FieldType, InheritanceOrder, StructType, TypeRegistry};
pub use parser::{parse_declarations, parse_into};
