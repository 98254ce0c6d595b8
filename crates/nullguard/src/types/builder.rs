// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for TypeDescriptor.

use crate::types::{
    ClassDescriptor, EnumDescriptor, FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind,
};
use std::sync::Arc;

/// Builder for record and object type descriptors.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    static_fields: Vec<String>,
    base: Option<Arc<TypeDescriptor>>,
}

impl TypeDescriptorBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            static_fields: Vec::new(),
            base: None,
        }
    }

    /// Add a primitive field.
    pub fn field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::primitive(kind)))
    }

    /// Add a field with a type descriptor.
    pub fn field_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::String)
    }

    /// Add an optional field around `inner`.
    pub fn optional_field(self, name: impl Into<String>, inner: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::optional(inner)))
    }

    /// Add a list field.
    pub fn list_field(self, name: impl Into<String>, element: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::list(element)))
    }

    /// Add a set field.
    pub fn set_field(self, name: impl Into<String>, element: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::set(element)))
    }

    /// Add a map field.
    pub fn map_field(
        self,
        name: impl Into<String>,
        key: Arc<TypeDescriptor>,
        value: Arc<TypeDescriptor>,
    ) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::map(key, value)))
    }

    /// Add an array field.
    pub fn array_field(self, name: impl Into<String>, element: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::array(element)))
    }

    /// Add an enum field.
    pub fn enum_field<I, S>(self, name: impl Into<String>, type_name: &str, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let desc = TypeDescriptor::new(type_name, TypeKind::Enum(EnumDescriptor::new(variants)));
        self.field_with_type(name, Arc::new(desc))
    }

    /// Add a nested type field.
    pub fn nested_field(self, name: impl Into<String>, nested: Arc<TypeDescriptor>) -> Self {
        let type_desc = Arc::new(TypeDescriptor::new(
            nested.name.clone(),
            TypeKind::Nested(nested),
        ));
        self.field_with_type(name, type_desc)
    }

    /// Declare a static field (object types only).
    pub fn static_field(mut self, name: impl Into<String>) -> Self {
        self.static_fields.push(name.into());
        self
    }

    /// Set the parent class (object types only).
    pub fn extends(mut self, base: Arc<TypeDescriptor>) -> Self {
        self.base = Some(base);
        self
    }

    /// Build a record descriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::record(self.name, self.fields)
    }

    /// Build a class-like object descriptor.
    pub fn build_object(self) -> TypeDescriptor {
        let class = ClassDescriptor {
            fields: self.fields,
            static_fields: self.static_fields,
            base: self.base,
        };
        TypeDescriptor::new(self.name, TypeKind::Object(class))
    }
}
