// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! IEC 61131-3 struct declaration parser using Pest.
//!
//! Accepts the `TYPE ... STRUCT ... END_STRUCT END_TYPE` blocks a PLC
//! project exports for its data unit types:
//!
//! ```text
//! TYPE ST_Axis EXTENDS ST_Device :
//! STRUCT
//!     fPosition : LREAL;
//!     aLimits   : ARRAY[0..1] OF REAL;
//!     sName     : STRING(20);
//!     bEnabled  : BOOL := TRUE;
//! END_STRUCT
//! END_TYPE
//! ```
//!
//! Comments `(* *)` and `//`, and `{attribute ...}` pragmas are ignored.
//! Initial values are accepted and dropped. Bit-string types map to the
//! unsigned integer of their width. Elementary types with no wire mapping
//! (BOOL, TIME, DATE, ...) become [`FieldType::Unmapped`]; any other name is
//! a nested struct reference.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::core::{AdsError, Result};
use crate::encoding::scalar::{ScalarType, DEFAULT_STRING_LENGTH};
use crate::schema::ast::{Field, FieldType, StructType, TypeRegistry};

/// Pest parser for IEC struct declarations.
#[derive(Parser)]
#[grammar = "schema/parser/iec.pest"]
pub struct IecParser;

/// Elementary types that have no wire mapping in this crate.
const UNMAPPED_ELEMENTARY: &[&str] = &[
    "BOOL",
    "BIT",
    "CHAR",
    "WCHAR",
    "WSTRING",
    "TIME",
    "LTIME",
    "DATE",
    "LDATE",
    "TIME_OF_DAY",
    "TOD",
    "LTOD",
    "DATE_AND_TIME",
    "DT",
    "LDT",
];

/// Parse every struct declaration in `source`, in source order.
pub fn parse_declarations(source: &str) -> Result<Vec<StructType>> {
    let mut pairs = IecParser::parse(Rule::file, source)
        .map_err(|e| AdsError::parse("IEC declaration", format!("{e}")))?;

    let mut types = Vec::new();
    let Some(file) = pairs.next() else {
        return Ok(types);
    };

    for block in file.into_inner() {
        if block.as_rule() != Rule::type_block {
            continue;
        }
        for decl in block.into_inner() {
            if decl.as_rule() == Rule::type_decl {
                types.push(parse_type_decl(decl)?);
            }
        }
    }
    Ok(types)
}

/// Parse `source` and register every declared type.
///
/// Returns the number of types registered.
pub fn parse_into(registry: &mut TypeRegistry, source: &str) -> Result<usize> {
    let types = parse_declarations(source)?;
    let count = types.len();
    registry.extend(types);
    Ok(count)
}

fn parse_type_decl(pair: Pair<Rule>) -> Result<StructType> {
    let mut ty = StructType::new(String::new());

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::ident => ty.name = item.as_str().to_string(),
            Rule::extends => {
                if let Some(base) = item.into_inner().find(|p| p.as_rule() == Rule::qualified) {
                    ty.base = Some(base.as_str().to_string());
                }
            }
            Rule::field => ty.add_field(parse_field(item)?),
            _ => {}
        }
    }
    Ok(ty)
}

fn parse_field(pair: Pair<Rule>) -> Result<Field> {
    let mut name = String::new();
    let mut field_type = None;

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::ident => name = item.as_str().to_string(),
            Rule::type_spec => field_type = Some(parse_type_spec(item)?),
            _ => {}
        }
    }

    let field_type =
        field_type.ok_or_else(|| AdsError::parse("IEC declaration", format!("field '{name}' has no type")))?;
    Ok(Field::new(name, field_type))
}

fn parse_type_spec(pair: Pair<Rule>) -> Result<FieldType> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| AdsError::parse("IEC declaration", "empty type"))?;

    match inner.as_rule() {
        Rule::array_spec => parse_array_spec(inner),
        Rule::string_spec => {
            let capacity = match inner.into_inner().find(|p| p.as_rule() == Rule::int_lit) {
                Some(lit) => parse_int(&lit)?,
                None => DEFAULT_STRING_LENGTH as i64,
            };
            let capacity = usize::try_from(capacity).map_err(|_| {
                AdsError::parse("IEC declaration", format!("invalid STRING length {capacity}"))
            })?;
            Ok(FieldType::String { capacity })
        }
        Rule::type_ref => Ok(resolve_type_name(inner.as_str())),
        other => Err(AdsError::parse(
            "IEC declaration",
            format!("unexpected {other:?} in type"),
        )),
    }
}

fn parse_array_spec(pair: Pair<Rule>) -> Result<FieldType> {
    let mut len: usize = 1;
    let mut elem = None;

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::range => {
                let mut bounds = item.into_inner();
                let (Some(lo), Some(hi)) = (bounds.next(), bounds.next()) else {
                    return Err(AdsError::parse("IEC declaration", "incomplete array range"));
                };
                let (lo, hi) = (parse_int(&lo)?, parse_int(&hi)?);
                if hi < lo {
                    return Err(AdsError::parse(
                        "IEC declaration",
                        format!("empty array range {lo}..{hi}"),
                    ));
                }
                len = hi
                    .checked_sub(lo)
                    .and_then(|span| span.checked_add(1))
                    .and_then(|count| usize::try_from(count).ok())
                    .and_then(|count| len.checked_mul(count))
                    .ok_or_else(|| AdsError::parse("IEC declaration", "array range too large"))?;
            }
            Rule::type_spec => elem = Some(parse_type_spec(item)?),
            _ => {}
        }
    }

    let elem = elem.ok_or_else(|| AdsError::parse("IEC declaration", "array without element type"))?;
    Ok(FieldType::array(elem, len))
}

fn parse_int(pair: &Pair<Rule>) -> Result<i64> {
    pair.as_str()
        .parse()
        .map_err(|e| AdsError::parse("IEC declaration", format!("integer '{}': {e}", pair.as_str())))
}

fn resolve_type_name(name: &str) -> FieldType {
    if let Some(ty) = ScalarType::from_name(name) {
        return FieldType::scalar(ty);
    }
    let upper = name.to_ascii_uppercase();
    if UNMAPPED_ELEMENTARY.contains(&upper.as_str()) {
        FieldType::Unmapped(upper)
    } else {
        FieldType::Nested(name.to_string())
    }
}
