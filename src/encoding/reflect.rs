// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema-driven struct marshalling over [`PlcValue`].
//!
//! The reflective pair walks the flattened field list of a registered
//! [`StructType`](crate::schema::StructType): own fields in declaration
//! order, then the parent's (or the reverse, see [`InheritanceOrder`]).
//! Both walk the same list, so footprint and traversal never diverge.
//!
//! Fields whose type has no wire mapping are skipped with a warning. The
//! result is only as correct as the declared layout: it must match the
//! field order the device declares.

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{AdsError, FieldMap, PlcValue, Result};
use crate::schema::{FieldType, InheritanceOrder, TypeRegistry};

use super::buffer::MemoryBuffer;
use super::calculator::{MemorySizeCalculator, SizeCalculator};
use super::scalar::{read_scalar, write_scalar, AdsScalar, ScalarType};
use super::visitor::{ReadVisitor, WriteVisitor};

/// Nesting limit for struct walks.
const MAX_DEPTH: usize = 32;

/// Placement of one field in a declared layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLayout {
    /// Field name
    pub name: String,
    /// Declared type
    pub type_name: String,
    /// Byte offset from the start of the struct
    pub offset: usize,
    /// Bytes on the wire
    pub size: usize,
    /// False for fields skipped by the walk
    pub mapped: bool,
}

/// Footprint calculator for a registered struct type.
#[derive(Debug, Clone, Copy)]
pub struct ReflectiveSizeCalculator<'a> {
    registry: &'a TypeRegistry,
    type_name: &'a str,
    order: InheritanceOrder,
}

impl<'a> ReflectiveSizeCalculator<'a> {
    /// Calculator for `type_name`, derived fields first.
    pub fn new(registry: &'a TypeRegistry, type_name: &'a str) -> Self {
        Self {
            registry,
            type_name,
            order: InheritanceOrder::default(),
        }
    }

    /// Set the inheritance layout order.
    pub fn with_order(mut self, order: InheritanceOrder) -> Self {
        self.order = order;
        self
    }

    /// Footprint from the declaration alone.
    ///
    /// Fails for arrays without a declared length.
    pub fn declared_size(&self) -> Result<usize> {
        self.struct_size(self.type_name, None, 0)
    }

    /// Top-level fields with their byte offsets, in wire order.
    ///
    /// Unmapped fields are listed with zero size and `mapped == false`.
    pub fn declared_layout(&self) -> Result<Vec<FieldLayout>> {
        let mut layout = Vec::new();
        let mut offset = 0;
        for field in self.registry.flatten_fields(self.type_name, self.order)? {
            let mapped = !is_unmapped(&field.field_type);
            let mut calc = SizeCalculator::new();
            if mapped {
                self.field_size(&field.name, &field.field_type, None, &mut calc, 0)?;
            }
            layout.push(FieldLayout {
                name: field.name.clone(),
                type_name: field.field_type.type_name(),
                offset,
                size: calc.size(),
                mapped,
            });
            offset += calc.size();
        }
        Ok(layout)
    }

    fn struct_size(&self, type_name: &str, value: Option<&FieldMap>, depth: usize) -> Result<usize> {
        check_depth(type_name, depth)?;
        let mut calc = SizeCalculator::new();
        for field in self.registry.flatten_fields(type_name, self.order)? {
            if is_unmapped(&field.field_type) {
                debug!(field = %field.name, "no wire mapping, zero bytes");
                continue;
            }
            let field_value = value.and_then(|m| m.get(&field.name));
            self.field_size(&field.name, &field.field_type, field_value, &mut calc, depth)?;
        }
        Ok(calc.size())
    }

    fn field_size(
        &self,
        name: &str,
        field_type: &FieldType,
        value: Option<&PlcValue>,
        calc: &mut SizeCalculator,
        depth: usize,
    ) -> Result<()> {
        match field_type {
            FieldType::Scalar(ty) => {
                calc.bytes(fixed_width(name, *ty)?);
            }
            FieldType::String { capacity } => {
                calc.string(*capacity);
            }
            FieldType::Array { elem, len } => {
                let items = value.and_then(PlcValue::as_array);
                let count = element_count(name, *len, items)?;
                match elem.as_ref() {
                    FieldType::Scalar(ty) => {
                        calc.try_array(count, fixed_width(name, *ty)?)?;
                    }
                    other => {
                        for i in 0..count {
                            let item = items.and_then(|it| it.get(i));
                            self.field_size(name, other, item, calc, depth)?;
                        }
                    }
                }
            }
            FieldType::Nested(type_name) => {
                let nested = value.and_then(PlcValue::as_struct);
                calc.bytes(self.struct_size(type_name, nested, depth + 1)?);
            }
            FieldType::Unmapped(_) => {}
        }
        Ok(())
    }
}

impl MemorySizeCalculator<PlcValue> for ReflectiveSizeCalculator<'_> {
    fn calculate(&self, value: &PlcValue) -> Result<usize> {
        self.struct_size(self.type_name, value.as_struct(), 0)
    }
}

/// Read/write visitor for a registered struct type.
///
/// Writes require every mapped field to be present with exactly its
/// declared type. Reads fill a [`PlcValue::Struct`], replacing any other
/// destination value.
#[derive(Debug, Clone, Copy)]
pub struct ReflectiveStructVisitor<'a> {
    registry: &'a TypeRegistry,
    type_name: &'a str,
    order: InheritanceOrder,
}

impl<'a> ReflectiveStructVisitor<'a> {
    /// Visitor for `type_name`, derived fields first.
    pub fn new(registry: &'a TypeRegistry, type_name: &'a str) -> Self {
        Self {
            registry,
            type_name,
            order: InheritanceOrder::default(),
        }
    }

    /// Set the inheritance layout order.
    pub fn with_order(mut self, order: InheritanceOrder) -> Self {
        self.order = order;
        self
    }

    /// The matching size calculator.
    pub fn size_calculator(&self) -> ReflectiveSizeCalculator<'a> {
        ReflectiveSizeCalculator::new(self.registry, self.type_name).with_order(self.order)
    }

    fn write_struct(
        &self,
        mem: &mut MemoryBuffer,
        type_name: &str,
        map: &FieldMap,
        depth: usize,
    ) -> Result<()> {
        check_depth(type_name, depth)?;
        for field in self.registry.flatten_fields(type_name, self.order)? {
            if is_unmapped(&field.field_type) {
                warn!(
                    type_name,
                    field = %field.name,
                    declared = %field.field_type.type_name(),
                    "skipping field with no wire mapping"
                );
                continue;
            }
            let value = map.get(&field.name).ok_or_else(|| {
                AdsError::type_mismatch(
                    format!("{}.{}", type_name, field.name),
                    "missing field",
                )
            })?;
            self.write_field(mem, &field.name, &field.field_type, value, depth)?;
        }
        Ok(())
    }

    fn write_field(
        &self,
        mem: &mut MemoryBuffer,
        name: &str,
        field_type: &FieldType,
        value: &PlcValue,
        depth: usize,
    ) -> Result<()> {
        match field_type {
            FieldType::Scalar(ty) => {
                if value.scalar_type() != Some(*ty) {
                    return Err(AdsError::type_mismatch(ty.name(), value.type_name()));
                }
                write_scalar(value, mem)
            }
            FieldType::String { capacity } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| AdsError::type_mismatch("STRING", value.type_name()))?;
                mem.set_string(s, capacity + 1)
            }
            FieldType::Array { elem, len } => {
                let items = value
                    .as_array()
                    .ok_or_else(|| AdsError::type_mismatch(field_type.type_name(), value.type_name()))?;
                if let Some(n) = len {
                    if *n != items.len() {
                        return Err(AdsError::type_mismatch(
                            field_type.type_name(),
                            format!("{} elements in '{name}'", items.len()),
                        ));
                    }
                }
                match elem.as_ref() {
                    FieldType::Scalar(ty) => write_scalar_array(*ty, items, mem),
                    other => items
                        .iter()
                        .try_for_each(|item| self.write_field(mem, name, other, item, depth)),
                }
            }
            FieldType::Nested(type_name) => {
                let map = value
                    .as_struct()
                    .ok_or_else(|| AdsError::type_mismatch(type_name.as_str(), value.type_name()))?;
                self.write_struct(mem, type_name, map, depth + 1)
            }
            FieldType::Unmapped(declared) => Err(AdsError::unsupported(declared.as_str())),
        }
    }

    fn read_struct(
        &self,
        mem: &mut MemoryBuffer,
        type_name: &str,
        map: &mut FieldMap,
        depth: usize,
    ) -> Result<()> {
        check_depth(type_name, depth)?;
        for field in self.registry.flatten_fields(type_name, self.order)? {
            if is_unmapped(&field.field_type) {
                warn!(
                    type_name,
                    field = %field.name,
                    declared = %field.field_type.type_name(),
                    "skipping field with no wire mapping"
                );
                continue;
            }
            let value =
                self.read_field(mem, &field.name, &field.field_type, map.get(&field.name), depth)?;
            map.insert(field.name.clone(), value);
        }
        Ok(())
    }

    fn read_field(
        &self,
        mem: &mut MemoryBuffer,
        name: &str,
        field_type: &FieldType,
        hint: Option<&PlcValue>,
        depth: usize,
    ) -> Result<PlcValue> {
        match field_type {
            FieldType::Scalar(ty) => {
                fixed_width(name, *ty)?;
                read_scalar(*ty, mem)
            }
            FieldType::String { capacity } => Ok(PlcValue::String(mem.get_string(capacity + 1)?)),
            FieldType::Array { elem, len } => {
                let items = hint.and_then(PlcValue::as_array);
                let count = element_count(name, *len, items)?;
                let values = match elem.as_ref() {
                    FieldType::Scalar(ty) => read_scalar_array(*ty, count, mem)?,
                    other => (0..count)
                        .map(|i| {
                            let item = items.and_then(|it| it.get(i));
                            self.read_field(mem, name, other, item, depth)
                        })
                        .collect::<Result<Vec<_>>>()?,
                };
                Ok(PlcValue::Array(values))
            }
            FieldType::Nested(type_name) => {
                let mut map = hint
                    .and_then(PlcValue::as_struct)
                    .cloned()
                    .unwrap_or_default();
                self.read_struct(mem, type_name, &mut map, depth + 1)?;
                Ok(PlcValue::Struct(map))
            }
            FieldType::Unmapped(declared) => Err(AdsError::unsupported(declared.as_str())),
        }
    }
}

impl WriteVisitor<PlcValue> for ReflectiveStructVisitor<'_> {
    fn write(&self, mem: &mut MemoryBuffer, value: &PlcValue) -> Result<()> {
        let map = value
            .as_struct()
            .ok_or_else(|| AdsError::type_mismatch(self.type_name, value.type_name()))?;
        self.write_struct(mem, self.type_name, map, 0)
    }
}

impl ReadVisitor<PlcValue> for ReflectiveStructVisitor<'_> {
    fn bind(&self, _mem: &MemoryBuffer, value: &mut PlcValue) -> Result<()> {
        if value.as_struct().is_none() {
            *value = PlcValue::Struct(FieldMap::new());
        }
        Ok(())
    }

    fn read(&self, mem: &mut MemoryBuffer, value: &mut PlcValue) -> Result<()> {
        self.bind(mem, value)?;
        match value.as_struct_mut() {
            Some(map) => self.read_struct(mem, self.type_name, map, 0),
            None => Err(AdsError::type_mismatch(self.type_name, "non-struct destination")),
        }
    }
}

fn check_depth(type_name: &str, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(AdsError::invalid_schema(
            type_name,
            format!("maximum nesting depth exceeded ({MAX_DEPTH}), possible circular reference"),
        ));
    }
    Ok(())
}

fn is_unmapped(field_type: &FieldType) -> bool {
    match field_type {
        FieldType::Unmapped(_) => true,
        FieldType::Array { elem, .. } => is_unmapped(elem),
        _ => false,
    }
}

fn fixed_width(name: &str, ty: ScalarType) -> Result<usize> {
    ty.width().ok_or_else(|| {
        AdsError::invalid_schema(name, format!("{ty} field must declare a capacity"))
    })
}

fn element_count(name: &str, declared: Option<usize>, items: Option<&[PlcValue]>) -> Result<usize> {
    match (declared, items) {
        (Some(n), _) => Ok(n),
        (None, Some(items)) => Ok(items.len()),
        (None, None) => Err(AdsError::unsupported(format!(
            "sizing unbounded array '{name}' without a value"
        ))),
    }
}

fn read_scalar_array(ty: ScalarType, count: usize, mem: &mut MemoryBuffer) -> Result<Vec<PlcValue>> {
    fn bulk<E: AdsScalar>(count: usize, mem: &mut MemoryBuffer) -> Result<Vec<PlcValue>> {
        let mut values = vec![E::default(); count];
        E::get_slice(mem, &mut values)?;
        Ok(values.into_iter().map(Into::into).collect())
    }

    match ty {
        ScalarType::LReal => bulk::<f64>(count, mem),
        ScalarType::Real => bulk::<f32>(count, mem),
        ScalarType::LInt => bulk::<i64>(count, mem),
        ScalarType::ULInt => bulk::<u64>(count, mem),
        ScalarType::DInt => bulk::<i32>(count, mem),
        ScalarType::UDInt => bulk::<u32>(count, mem),
        ScalarType::Int => bulk::<i16>(count, mem),
        ScalarType::UInt => bulk::<u16>(count, mem),
        ScalarType::SInt => bulk::<i8>(count, mem),
        ScalarType::USInt => bulk::<u8>(count, mem),
        ScalarType::String => Err(AdsError::unsupported("bulk STRING array")),
    }
}

fn write_scalar_array(ty: ScalarType, items: &[PlcValue], mem: &mut MemoryBuffer) -> Result<()> {
    fn bulk<E: AdsScalar>(items: &[PlcValue], mem: &mut MemoryBuffer) -> Result<()> {
        let values = items
            .iter()
            .map(E::from_value)
            .collect::<Result<Vec<E>>>()?;
        E::set_slice(mem, &values)
    }

    match ty {
        ScalarType::LReal => bulk::<f64>(items, mem),
        ScalarType::Real => bulk::<f32>(items, mem),
        ScalarType::LInt => bulk::<i64>(items, mem),
        ScalarType::ULInt => bulk::<u64>(items, mem),
        ScalarType::DInt => bulk::<i32>(items, mem),
        ScalarType::UDInt => bulk::<u32>(items, mem),
        ScalarType::Int => bulk::<i16>(items, mem),
        ScalarType::UInt => bulk::<u16>(items, mem),
        ScalarType::SInt => bulk::<i8>(items, mem),
        ScalarType::USInt => bulk::<u8>(items, mem),
        ScalarType::String => Err(AdsError::unsupported("bulk STRING array")),
    }
}
