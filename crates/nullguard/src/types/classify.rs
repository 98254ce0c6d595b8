// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value categories and the opaque-type allow-list.

use crate::types::{TypeDescriptor, TypeKind};
use crate::value::Value;

/// Type-name prefixes of library-owned types that are never traversed.
pub const DEFAULT_OPAQUE_PREFIXES: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "chrono::",
    "uuid::",
    "url::",
    "time::",
    "rust_decimal::",
];

/// Closed set of value categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Scalars and strings.
    Terminal,
    /// Zero-or-one container.
    OptionalBox,
    /// List-like container.
    OrderedSequence,
    /// Set-like container.
    UnorderedSequence,
    /// Key/value container.
    Mapping,
    /// Fixed or bounded array.
    Array,
    /// Record with named components.
    Record,
    /// Enumeration constant.
    Enumeration,
    /// Library type on the allow-list.
    OpaqueLeaf,
    /// Any other class-like object, walked by reflection.
    Object,
    /// Plugged-in custom value.
    Custom,
}

impl Category {
    /// Check if the validator stops at this category.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Terminal | Self::Enumeration | Self::OpaqueLeaf)
    }

    /// Check if this is a collection-like category (sequence, mapping or array).
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Self::OrderedSequence | Self::UnorderedSequence | Self::Mapping | Self::Array
        )
    }
}

/// Allow-list of opaque library types, matched by type-name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueTypes {
    prefixes: Vec<String>,
}

impl Default for OpaqueTypes {
    fn default() -> Self {
        Self::new(DEFAULT_OPAQUE_PREFIXES.iter().copied())
    }
}

impl OpaqueTypes {
    /// Create an allow-list from prefixes.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix);
        }
        self
    }

    /// Check whether a type name is on the allow-list.
    pub fn contains(&self, type_name: &str) -> bool {
        self.prefixes.iter().any(|p| type_name.starts_with(p.as_str()))
    }

    /// Registered prefixes.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

/// Categorizes values and declared types.
#[derive(Debug, Clone, Default)]
pub struct TypeClassifier {
    opaque: OpaqueTypes,
}

impl TypeClassifier {
    /// Create a classifier with an explicit allow-list.
    pub fn new(opaque: OpaqueTypes) -> Self {
        Self { opaque }
    }

    /// Opaque allow-list in use.
    pub fn opaque_types(&self) -> &OpaqueTypes {
        &self.opaque
    }

    /// Classify a runtime value.
    ///
    /// A null value carries no shape of its own, so its category comes from
    /// `declared` when given.
    pub fn classify(&self, value: &Value, declared: Option<&TypeDescriptor>) -> Category {
        match value {
            Value::Null => declared.map_or(Category::Terminal, |d| self.classify_declared(d)),
            Value::Bool(_)
            | Value::Int(_)
            | Value::UInt(_)
            | Value::Float(_)
            | Value::Char(_)
            | Value::String(_) => Category::Terminal,
            Value::Optional(_) => Category::OptionalBox,
            Value::List(_) => Category::OrderedSequence,
            Value::Set(_) => Category::UnorderedSequence,
            Value::Map(_) => Category::Mapping,
            Value::Array(_) => Category::Array,
            Value::Record(_) => Category::Record,
            Value::Enum(_) => Category::Enumeration,
            Value::Object(obj) => self.named(&obj.type_name, Category::Object),
            Value::Shared(node) => match node.try_read() {
                Some(inner) => self.classify(&inner, declared),
                None => Category::Object,
            },
            Value::Custom(custom) => self.named(custom.type_name(), Category::Custom),
        }
    }

    /// Classify a declared type alone.
    pub fn classify_declared(&self, declared: &TypeDescriptor) -> Category {
        match &declared.kind {
            TypeKind::Primitive(_) | TypeKind::Any => Category::Terminal,
            TypeKind::Optional(_) => Category::OptionalBox,
            TypeKind::List(_) => Category::OrderedSequence,
            TypeKind::Set(_) => Category::UnorderedSequence,
            TypeKind::Map(_) => Category::Mapping,
            TypeKind::Array(_) => Category::Array,
            TypeKind::Record(_) => Category::Record,
            TypeKind::Enum(_) => Category::Enumeration,
            TypeKind::Opaque(_) => Category::OpaqueLeaf,
            TypeKind::Object(_) => self.named(&declared.name, Category::Object),
            TypeKind::Custom(name) => self.named(name, Category::Custom),
            TypeKind::Nested(inner) => self.classify_declared(inner),
        }
    }

    fn named(&self, type_name: &str, otherwise: Category) -> Category {
        if self.opaque.contains(type_name) {
            Category::OpaqueLeaf
        } else {
            otherwise
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OpaqueKind, TypeDescriptorBuilder};
    use crate::value::{Object, SharedNode};
    use std::sync::Arc;

    #[test]
    fn test_classify_values() {
        let c = TypeClassifier::default();
        assert_eq!(c.classify(&Value::from("s"), None), Category::Terminal);
        assert_eq!(c.classify(&Value::none(), None), Category::OptionalBox);
        assert_eq!(c.classify(&Value::List(vec![]), None), Category::OrderedSequence);
        assert_eq!(c.classify(&Value::Set(vec![]), None), Category::UnorderedSequence);
        assert_eq!(c.classify(&Value::Map(vec![]), None), Category::Mapping);
        assert_eq!(c.classify(&Value::Array(vec![]), None), Category::Array);
        assert_eq!(c.classify(&Value::Null, None), Category::Terminal);
    }

    #[test]
    fn test_null_uses_declared_type() {
        let c = TypeClassifier::default();
        let list = TypeDescriptor::list(Arc::new(TypeDescriptor::string()));
        assert_eq!(c.classify(&Value::Null, Some(&list)), Category::OrderedSequence);
    }

    #[test]
    fn test_library_objects_are_opaque() {
        let c = TypeClassifier::default();
        let id = Value::from(uuid::Uuid::nil());
        assert_eq!(c.classify(&id, None), Category::OpaqueLeaf);

        let user = Value::Object(Object::new("app::User").field("name", "n"));
        assert_eq!(c.classify(&user, None), Category::Object);

        let widened = TypeClassifier::new(OpaqueTypes::default().with_prefix("app::"));
        assert_eq!(widened.classify(&user, None), Category::OpaqueLeaf);
    }

    #[test]
    fn test_shared_classified_by_content() {
        let c = TypeClassifier::default();
        let node = SharedNode::new(Value::List(vec![]));
        assert_eq!(c.classify(&Value::Shared(node), None), Category::OrderedSequence);
    }

    #[test]
    fn test_classify_declared() {
        let c = TypeClassifier::default();
        assert_eq!(
            c.classify_declared(&TypeDescriptor::opaque(OpaqueKind::Uuid)),
            Category::OpaqueLeaf
        );
        let obj = TypeDescriptorBuilder::new("app::Pojo").build_object();
        assert_eq!(c.classify_declared(&obj), Category::Object);
        assert!(Category::Mapping.is_collection());
        assert!(!Category::OptionalBox.is_collection());
        assert!(Category::Enumeration.is_leaf());
    }
}
