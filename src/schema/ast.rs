// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Declared struct layouts.
//!
//! A [`StructType`] lists its fields in declaration order and may extend one
//! parent type. A [`TypeRegistry`] holds every known type and flattens an
//! inheritance chain into the single field list both the size calculator and
//! the visitor walk.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::core::{AdsError, Result};
use crate::encoding::scalar::{ScalarType, DEFAULT_STRING_LENGTH};

/// A struct type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    /// Type name as declared
    pub name: String,
    /// Parent type named in `EXTENDS`
    pub base: Option<String>,
    /// Own fields, declaration order
    pub fields: Vec<Field>,
}

impl StructType {
    /// Create a type with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            fields: Vec::new(),
        }
    }

    /// Set the parent type.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Append a field.
    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.add_field(Field::new(name, field_type));
        self
    }

    /// Append a field.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Look up an own field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A named field of a struct type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type
    pub field_type: FieldType,
}

impl Field {
    /// Create a field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Wire shape of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Fixed-width numeric scalar. Never [`ScalarType::String`].
    Scalar(ScalarType),
    /// `STRING(capacity)`, occupying `capacity + 1` bytes
    String {
        /// Maximum characters
        capacity: usize,
    },
    /// Array of one element type
    Array {
        /// Element type
        elem: Box<FieldType>,
        /// Declared element count; `None` sizes by the runtime value
        len: Option<usize>,
    },
    /// Another struct type, by name
    Nested(String),
    /// A declared type with no wire mapping; skipped by the walk
    Unmapped(String),
}

impl FieldType {
    /// Field type for a scalar, routing STRING to the default capacity.
    pub fn scalar(ty: ScalarType) -> Self {
        match ty {
            ScalarType::String => FieldType::String {
                capacity: DEFAULT_STRING_LENGTH,
            },
            other => FieldType::Scalar(other),
        }
    }

    /// Array of `len` elements.
    pub fn array(elem: FieldType, len: usize) -> Self {
        FieldType::Array {
            elem: Box::new(elem),
            len: Some(len),
        }
    }

    /// Array sized by its runtime value.
    pub fn dynamic_array(elem: FieldType) -> Self {
        FieldType::Array {
            elem: Box::new(elem),
            len: None,
        }
    }

    /// Declared type name, for diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            FieldType::Scalar(ty) => ty.name().to_string(),
            FieldType::String { capacity } => format!("STRING({capacity})"),
            FieldType::Array { elem, len } => match len {
                Some(n) => format!("ARRAY[0..{}] OF {}", n.saturating_sub(1), elem.type_name()),
                None => format!("ARRAY[*] OF {}", elem.type_name()),
            },
            FieldType::Nested(name) | FieldType::Unmapped(name) => name.clone(),
        }
    }
}

/// Order in which an inheritance chain's fields are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceOrder {
    /// Own fields first, then the parent's, recursively
    #[default]
    DerivedFirst,
    /// The root ancestor's fields first, own fields last
    BaseFirst,
}

/// Registry of declared struct types.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, StructType>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type, returning the one it replaces.
    pub fn register(&mut self, ty: StructType) -> Option<StructType> {
        self.types.insert(ty.name.clone(), ty)
    }

    /// Look up a type by exact name.
    pub fn get(&self, name: &str) -> Option<&StructType> {
        self.types.get(name)
    }

    /// Look up a type, failing with [`AdsError::TypeNotFound`].
    pub fn require(&self, name: &str) -> Result<&StructType> {
        self.get(name).ok_or_else(|| AdsError::type_not_found(name))
    }

    /// Check if a type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Flatten a type and its ancestors into one field list.
    pub fn flatten_fields(&self, name: &str, order: InheritanceOrder) -> Result<Vec<&Field>> {
        let mut chain: Vec<&StructType> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = Some(name);

        while let Some(type_name) = current {
            if !seen.insert(type_name) {
                return Err(AdsError::invalid_schema(
                    name,
                    format!("inheritance cycle through '{type_name}'"),
                ));
            }
            let ty = self.require(type_name)?;
            chain.push(ty);
            current = ty.base.as_deref();
        }

        if order == InheritanceOrder::BaseFirst {
            chain.reverse();
        }
        Ok(chain.into_iter().flat_map(|ty| ty.fields.iter()).collect())
    }

    /// Check that every referenced parent and nested type is registered.
    pub fn validate(&self) -> Result<()> {
        for ty in self.types.values() {
            if let Some(base) = &ty.base {
                if !self.contains(base) {
                    return Err(AdsError::invalid_schema(
                        &ty.name,
                        format!("unknown base type '{base}'"),
                    ));
                }
            }
            for field in &ty.fields {
                if let Some(nested) = nested_name(&field.field_type) {
                    if !self.contains(nested) {
                        return Err(AdsError::invalid_schema(
                            &ty.name,
                            format!("field '{}' has unknown type '{nested}'", field.name),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Extend<StructType> for TypeRegistry {
    fn extend<I: IntoIterator<Item = StructType>>(&mut self, iter: I) {
        for ty in iter {
            self.register(ty);
        }
    }
}

fn nested_name(field_type: &FieldType) -> Option<&str> {
    match field_type {
        FieldType::Nested(name) => Some(name),
        FieldType::Array { elem, .. } => nested_name(elem),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TypeRegistry {
        let mut reg = TypeRegistry::new();
        reg.register(
            StructType::new("ST_Base")
                .with_field("id", FieldType::Scalar(ScalarType::DInt))
                .with_field("flags", FieldType::Scalar(ScalarType::UInt)),
        );
        reg.register(
            StructType::new("ST_Derived")
                .with_base("ST_Base")
                .with_field("speed", FieldType::Scalar(ScalarType::LReal)),
        );
        reg
    }

    fn names(fields: &[&Field]) -> Vec<String> {
        fields.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn test_flatten_derived_first() {
        let reg = registry();
        let fields = reg
            .flatten_fields("ST_Derived", InheritanceOrder::DerivedFirst)
            .unwrap();
        assert_eq!(names(&fields), ["speed", "id", "flags"]);
    }

    #[test]
    fn test_flatten_base_first() {
        let reg = registry();
        let fields = reg
            .flatten_fields("ST_Derived", InheritanceOrder::BaseFirst)
            .unwrap();
        assert_eq!(names(&fields), ["id", "flags", "speed"]);
    }

    #[test]
    fn test_flatten_unknown_type() {
        let reg = registry();
        assert!(matches!(
            reg.flatten_fields("ST_Missing", InheritanceOrder::default()),
            Err(AdsError::TypeNotFound { .. })
        ));
    }

    #[test]
    fn test_flatten_cycle() {
        let mut reg = TypeRegistry::new();
        reg.register(StructType::new("A").with_base("B"));
        reg.register(StructType::new("B").with_base("A"));
        assert!(matches!(
            reg.flatten_fields("A", InheritanceOrder::default()),
            Err(AdsError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_validate_nested_reference() {
        let mut reg = registry();
        assert!(reg.validate().is_ok());
        reg.register(
            StructType::new("ST_Outer")
                .with_field("inner", FieldType::array(FieldType::Nested("ST_Nope".into()), 2)),
        );
        assert!(reg.validate().is_err());
    }

    #[test]
    fn test_scalar_string_routes_to_default_capacity() {
        assert_eq!(
            FieldType::scalar(ScalarType::String),
            FieldType::String { capacity: 80 }
        );
        assert_eq!(
            FieldType::scalar(ScalarType::Real),
            FieldType::Scalar(ScalarType::Real)
        );
    }

    #[test]
    fn test_type_name() {
        let ty = FieldType::array(FieldType::String { capacity: 20 }, 4);
        assert_eq!(ty.type_name(), "ARRAY[0..3] OF STRING(20)");
    }
}
