// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Composite transfers.
//!
//! One composite value moves in one request: a calculator sizes the buffer,
//! a visitor fills or drains it. After every walk the cursor must sit
//! exactly at the end of the buffer, otherwise the calculator and the
//! visitor disagree and the transfer fails with [`AdsError::SizeMismatch`].

use crate::core::{AdsError, FieldMap, PlcValue, Result};
use crate::encoding::{
    AdsScalar, ArrayCodec, MemoryBuffer, MemorySizeCalculator, PlcStruct, ReadVisitor,
    ReflectiveStructVisitor, StructCodec, WriteVisitor,
};
use crate::schema::TypeRegistry;
use crate::transport::AdsTransport;

use super::AdsSession;

impl<T: AdsTransport> AdsSession<T> {
    /// Write a composite value in one request.
    pub fn write_struct_by_name<V, C, W>(
        &mut self,
        name: &str,
        value: &V,
        calculator: &C,
        visitor: &W,
    ) -> Result<()>
    where
        V: ?Sized,
        C: MemorySizeCalculator<V> + ?Sized,
        W: WriteVisitor<V> + ?Sized,
    {
        let size = calculator.calculate(value)?;
        let mut mem = MemoryBuffer::new(size);
        visitor.write(&mut mem, value)?;
        ensure_consumed(&mem)?;
        self.write_bytes(name, mem.as_bytes())
    }

    /// Read a composite value in one request.
    ///
    /// The request completes before the visitor touches `value`, so a
    /// failed request leaves the destination unchanged. Extraction writes
    /// in place: if the visitor fails or does not consume the buffer
    /// exactly, `value` may already hold part of the new data.
    pub fn read_struct_by_name<V, C, R>(
        &mut self,
        name: &str,
        value: &mut V,
        calculator: &C,
        visitor: &R,
    ) -> Result<()>
    where
        V: ?Sized,
        C: MemorySizeCalculator<V> + ?Sized,
        R: ReadVisitor<V> + ?Sized,
    {
        let size = calculator.calculate(value)?;
        let mut mem = MemoryBuffer::new(size);
        self.read_bytes_into(name, mem.as_bytes_mut())?;
        visitor.read(&mut mem, value)?;
        ensure_consumed(&mem)
    }

    /// Read a composite value, binding the visitor before the request.
    ///
    /// [`ReadVisitor::bind`] runs on the allocated buffer before the
    /// request and may pre-size the destination; extraction follows once
    /// the request succeeded. Neither step is undone on failure.
    pub fn read_struct_bound<V, C, R>(
        &mut self,
        name: &str,
        value: &mut V,
        calculator: &C,
        visitor: &R,
    ) -> Result<()>
    where
        V: ?Sized,
        C: MemorySizeCalculator<V> + ?Sized,
        R: ReadVisitor<V> + ?Sized,
    {
        let size = calculator.calculate(value)?;
        let mut mem = MemoryBuffer::new(size);
        visitor.bind(&mem, value)?;
        self.read_bytes_into(name, mem.as_bytes_mut())?;
        visitor.read(&mut mem, value)?;
        ensure_consumed(&mem)
    }

    /// Write a struct with a hand-declared layout.
    pub fn write_struct<S: PlcStruct>(&mut self, name: &str, value: &S) -> Result<()> {
        let codec = StructCodec::<S>::new();
        self.write_struct_by_name(name, value, &codec, &codec)
    }

    /// Read a struct with a hand-declared layout into `value`.
    pub fn read_struct<S: PlcStruct>(&mut self, name: &str, value: &mut S) -> Result<()> {
        let codec = StructCodec::<S>::new();
        self.read_struct_by_name(name, value, &codec, &codec)
    }

    /// Write an array of one scalar type.
    pub fn write_array<E: AdsScalar>(&mut self, name: &str, values: &[E]) -> Result<()> {
        let codec = ArrayCodec::<E>::new();
        self.write_struct_by_name(name, values, &codec, &codec)
    }

    /// Read an array of `len` elements of one scalar type.
    pub fn read_array<E: AdsScalar>(&mut self, name: &str, len: usize) -> Result<Vec<E>> {
        let codec = ArrayCodec::<E>::with_len(len);
        let mut values = Vec::new();
        self.read_struct_bound(name, &mut values, &codec, &codec)?;
        Ok(values)
    }

    /// Write a dynamic struct value laid out by a registered type.
    pub fn write_object_by_name(
        &mut self,
        name: &str,
        registry: &TypeRegistry,
        type_name: &str,
        value: &PlcValue,
    ) -> Result<()> {
        let visitor = ReflectiveStructVisitor::new(registry, type_name)
            .with_order(self.config().inheritance);
        self.write_struct_by_name(name, value, &visitor.size_calculator(), &visitor)
    }

    /// Read a dynamic struct value laid out by a registered type.
    ///
    /// Every array in the type must declare its length.
    pub fn read_object_by_name(
        &mut self,
        name: &str,
        registry: &TypeRegistry,
        type_name: &str,
    ) -> Result<PlcValue> {
        let mut value = PlcValue::Struct(FieldMap::new());
        self.read_object_into(name, registry, type_name, &mut value)?;
        Ok(value)
    }

    /// Read a registered struct type into an existing value.
    ///
    /// Fields already present in `value` size arrays declared without a
    /// length. The struct is decoded into a copy that replaces `value` only
    /// on success, so any failure leaves `value` as it was.
    pub fn read_object_into(
        &mut self,
        name: &str,
        registry: &TypeRegistry,
        type_name: &str,
        value: &mut PlcValue,
    ) -> Result<()> {
        let visitor = ReflectiveStructVisitor::new(registry, type_name)
            .with_order(self.config().inheritance);
        let mut scratch = value.clone();
        self.read_struct_bound(name, &mut scratch, &visitor.size_calculator(), &visitor)?;
        *value = scratch;
        Ok(())
    }
}

fn ensure_consumed(mem: &MemoryBuffer) -> Result<()> {
    if mem.is_at_end() {
        Ok(())
    } else {
        Err(AdsError::size_mismatch(mem.len(), mem.position()))
    }
}
